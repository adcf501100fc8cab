//! Client configuration
//!
//! Reads the same variables `anchor test` exports for `AnchorProvider.env()`,
//! so a harness run under Anchor picks up the local validator and wallet.

use crate::error::{Result, SdkError};
use anchor_client::Cluster;
use anchor_lang::prelude::Pubkey;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Keypair},
};
use std::str::FromStr;

pub const DEFAULT_WALLET_PATH: &str = "~/.config/solana/id.json";

pub const RPC_URL_VAR: &str = "ANCHOR_PROVIDER_URL";
pub const WS_URL_VAR: &str = "ANCHOR_WS_URL";
pub const WALLET_VAR: &str = "ANCHOR_WALLET";
pub const PROGRAM_ID_VAR: &str = "POC_PROGRAM_ID";
pub const COMMITMENT_VAR: &str = "POC_COMMITMENT";

#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Solana RPC URL
    pub rpc_url: String,

    /// Solana WebSocket URL
    pub ws_url: String,

    /// Path to the signing keypair, tilde-expanded
    pub wallet_path: String,

    /// Deployed bridge program
    pub program_id: Pubkey,

    pub commitment: CommitmentConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        let cluster = Cluster::Localnet;
        Self {
            rpc_url: cluster.url().to_string(),
            ws_url: cluster.ws_url().to_string(),
            wallet_path: expand_path(DEFAULT_WALLET_PATH),
            program_id: proof_of_collateral::ID,
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl SdkConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cluster = match lookup(RPC_URL_VAR) {
            Some(value) => parse_cluster(&value)?,
            None => Cluster::Localnet,
        };
        let rpc_url = cluster.url().to_string();
        let ws_url = lookup(WS_URL_VAR).unwrap_or_else(|| cluster.ws_url().to_string());
        let wallet_path =
            expand_path(&lookup(WALLET_VAR).unwrap_or_else(|| DEFAULT_WALLET_PATH.to_string()));

        let program_id = match lookup(PROGRAM_ID_VAR) {
            Some(value) => value
                .parse()
                .map_err(|_| SdkError::Config(format!("Invalid {PROGRAM_ID_VAR}: {value}")))?,
            None => proof_of_collateral::ID,
        };

        let commitment = match lookup(COMMITMENT_VAR) {
            Some(value) => parse_commitment(&value)?,
            None => CommitmentConfig::confirmed(),
        };

        Ok(Self {
            rpc_url,
            ws_url,
            wallet_path,
            program_id,
            commitment,
        })
    }

    /// Point at another cluster; the WebSocket URL follows it
    pub fn with_rpc_url(mut self, rpc_url: &str) -> Result<Self> {
        let cluster = parse_cluster(rpc_url)?;
        self.rpc_url = cluster.url().to_string();
        self.ws_url = cluster.ws_url().to_string();
        Ok(self)
    }

    pub fn cluster(&self) -> Cluster {
        Cluster::Custom(self.rpc_url.clone(), self.ws_url.clone())
    }

    pub fn load_payer(&self) -> Result<Keypair> {
        read_keypair_file(&self.wallet_path).map_err(|e| SdkError::Keypair {
            path: self.wallet_path.clone(),
            reason: e.to_string(),
        })
    }
}

pub fn parse_commitment(value: &str) -> Result<CommitmentConfig> {
    match value.to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(SdkError::Config(format!("Unknown commitment level: {other}"))),
    }
}

/// Accepts an RPC URL or a cluster moniker (`localnet`, `devnet`, ...).
/// For URLs the WebSocket endpoint switches to ws(s) with the port plus one.
pub fn parse_cluster(value: &str) -> Result<Cluster> {
    Cluster::from_str(value)
        .map_err(|e| SdkError::Config(format!("Invalid {RPC_URL_VAR} {value}: {e}")))
}

fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}
