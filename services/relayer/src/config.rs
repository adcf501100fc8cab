//! Service configuration

use anyhow::{Context, Result};
use proof_of_collateral_sdk::SdkConfig;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RelayerConfig {
    /// Cluster, program and relayer wallet
    pub sdk: SdkConfig,

    /// How often to poll for new requests (in seconds)
    pub poll_interval_secs: u64,

    /// Attempts per withdrawal before giving up on it for this poll
    pub max_retries: u32,

    /// Delay between attempts (in milliseconds)
    pub retry_delay_ms: u64,

    /// Signatures requested per history page
    pub batch_limit: usize,

    /// Polls that may fail to read a transaction's logs before it is dropped
    pub max_log_attempts: u32,

    /// Number of processed deposit ids remembered to skip duplicates
    pub processed_capacity: usize,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            sdk: SdkConfig::default(),
            poll_interval_secs: 5,
            max_retries: 3,
            retry_delay_ms: 1_000,
            batch_limit: 100,
            max_log_attempts: 3,
            processed_capacity: 10_000,
        }
    }
}

impl RelayerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut sdk = SdkConfig::from_lookup(&lookup).context("Invalid cluster configuration")?;
        if let Some(path) = lookup("RELAYER_KEYPAIR") {
            sdk.wallet_path = shellexpand::tilde(&path).to_string();
        }

        let defaults = Self::default();

        Ok(Self {
            sdk,
            poll_interval_secs: parse_or(&lookup, "POLL_INTERVAL", defaults.poll_interval_secs)?,
            max_retries: parse_or(&lookup, "MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: parse_or(&lookup, "RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            batch_limit: parse_or(&lookup, "BATCH_LIMIT", defaults.batch_limit)?,
            max_log_attempts: parse_or(&lookup, "LOG_FETCH_ATTEMPTS", defaults.max_log_attempts)?,
            processed_capacity: parse_or(&lookup, "PROCESSED_CAPACITY", defaults.processed_capacity)?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value.parse().with_context(|| format!("Invalid {key}: {value}")),
        None => Ok(default),
    }
}
