//! Deployment smoke test: invoke `initialize` once and report the signature

use crate::{client::CollateralClient, error::Result};
use solana_sdk::signature::Signature;
use tracing::info;

/// Call `initialize` against the configured cluster and print the resulting
/// transaction signature. Any RPC or program failure is returned unchanged.
pub async fn run_initialize_test(client: &CollateralClient) -> Result<Signature> {
    let tx = client.initialize().await?;
    println!("Your transaction signature {tx}");
    info!(signature = %tx, program_id = %client.program_id(), "initialize smoke test passed");
    Ok(tx)
}
