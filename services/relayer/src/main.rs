//! Withdrawal relayer binary

use anyhow::Result;
use poc_relayer::{run, RelayerConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayerConfig::from_env()?;

    info!("Relayer configuration:");
    info!("  RPC URL: {}", config.sdk.rpc_url);
    info!("  Keypair: {}", config.sdk.wallet_path);
    info!("  Program: {}", config.sdk.program_id);
    info!("  Poll interval: {}s", config.poll_interval_secs);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        res = run(config) => {
            if let Err(e) = res {
                error!("Relayer exited: {:#}", e);
                return Err(e);
            }
        }
    }

    info!("Shutting down relayer");
    Ok(())
}
