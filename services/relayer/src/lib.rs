//! Withdrawal relayer service
//!
//! Watches the bridge for withdrawal requests and completes each one by
//! submitting `process_withdrawal` with the relayer's key.

pub mod config;
pub mod monitor;

pub use config::RelayerConfig;
pub use monitor::{ProgramHistory, RpcHistory, WithdrawalMonitor};

use anyhow::{Context, Result};
use async_trait::async_trait;
use proof_of_collateral_sdk::{CollateralClient, DepositInfo, SdkError, WithdrawalRequestEvent};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Result of handling one withdrawal request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Processed(Signature),
    /// Claimed on chain already, possibly by another relayer
    AlreadyClaimed,
    /// Handled earlier by this relayer
    Duplicate,
}

/// Bounded memory of deposit ids this relayer has finished with
#[derive(Debug)]
pub struct ProcessedSet {
    capacity: usize,
    order: VecDeque<u64>,
    ids: HashSet<u64>,
}

impl ProcessedSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            ids: HashSet::new(),
        }
    }

    pub fn contains(&self, deposit_id: u64) -> bool {
        self.ids.contains(&deposit_id)
    }

    /// Returns false if the id was already present. Evicts the oldest id
    /// once full.
    pub fn insert(&mut self, deposit_id: u64) -> bool {
        if !self.ids.insert(deposit_id) {
            return false;
        }
        self.order.push_back(deposit_id);
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Bridge calls the relayer makes
#[async_trait(?Send)]
pub trait BridgeClient {
    /// Key that signs `process_withdrawal`
    fn relayer(&self) -> Pubkey;

    async fn fetch_deposit(&self, deposit_id: u64) -> proof_of_collateral_sdk::Result<DepositInfo>;

    async fn release(
        &self,
        deposit_id: u64,
        recipient: Pubkey,
    ) -> proof_of_collateral_sdk::Result<Signature>;
}

#[async_trait(?Send)]
impl BridgeClient for CollateralClient {
    fn relayer(&self) -> Pubkey {
        self.payer()
    }

    async fn fetch_deposit(&self, deposit_id: u64) -> proof_of_collateral_sdk::Result<DepositInfo> {
        self.deposit_info(deposit_id).await
    }

    async fn release(
        &self,
        deposit_id: u64,
        recipient: Pubkey,
    ) -> proof_of_collateral_sdk::Result<Signature> {
        self.process_withdrawal(deposit_id, recipient).await
    }
}

pub struct Relayer<C = CollateralClient> {
    client: C,
    processed: ProcessedSet,
    max_retries: u32,
    retry_delay: Duration,
}

impl Relayer<CollateralClient> {
    pub fn new(config: &RelayerConfig) -> Result<Self> {
        let client = CollateralClient::from_config(&config.sdk)
            .context("Failed to create bridge client")?;
        Ok(Self::with_client(client, config))
    }
}

impl<C: BridgeClient> Relayer<C> {
    pub fn with_client(client: C, config: &RelayerConfig) -> Self {
        Self {
            client,
            processed: ProcessedSet::new(config.processed_capacity),
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Complete one request unless it is a duplicate or already claimed
    pub async fn handle_request(&mut self, request: &WithdrawalRequestEvent) -> Result<Outcome> {
        if self.processed.contains(request.deposit_id) {
            debug!("Skipping deposit {} (already handled)", request.deposit_id);
            return Ok(Outcome::Duplicate);
        }

        match self.client.fetch_deposit(request.deposit_id).await {
            Ok(deposit) if deposit.claimed => {
                self.processed.insert(request.deposit_id);
                return Ok(Outcome::AlreadyClaimed);
            }
            Ok(_) => {}
            Err(e @ SdkError::AccountNotFound(_)) => {
                return Err(e).context("Withdrawal request for unknown deposit");
            }
            Err(e) => return Err(e.into()),
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.release(request.deposit_id, request.recipient).await {
                Ok(signature) => {
                    self.processed.insert(request.deposit_id);
                    return Ok(Outcome::Processed(signature));
                }
                Err(e) if attempt < self.max_retries => {
                    warn!(
                        "Attempt {}/{} for deposit {} failed: {}",
                        attempt, self.max_retries, request.deposit_id, e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!(
                            "Giving up on deposit {} after {} attempts",
                            request.deposit_id, attempt
                        )
                    });
                }
            }
        }
    }
}

/// Main entry point for the relayer service
pub async fn run(config: RelayerConfig) -> Result<()> {
    let mut monitor = WithdrawalMonitor::new(&config);
    let mut relayer = Relayer::new(&config)?;

    info!(
        "Relayer {} watching program {} at {}",
        relayer.client().relayer(),
        config.sdk.program_id,
        config.sdk.rpc_url
    );

    loop {
        match monitor.poll_requests().await {
            Ok(requests) => {
                for request in requests {
                    info!(
                        "Withdrawal request: deposit {} -> {} ({} units)",
                        request.deposit_id, request.recipient, request.amount
                    );

                    match relayer.handle_request(&request).await {
                        Ok(Outcome::Processed(signature)) => {
                            info!("Deposit {} released: {}", request.deposit_id, signature);
                        }
                        Ok(Outcome::AlreadyClaimed) => {
                            info!("Deposit {} already claimed", request.deposit_id);
                        }
                        Ok(Outcome::Duplicate) => {}
                        Err(e) => {
                            error!("Failed to process deposit {}: {:#}", request.deposit_id, e);
                        }
                    }
                }
            }
            Err(e) => {
                error!("Error polling requests: {:#}", e);
            }
        }

        tokio::time::sleep(config.poll_interval()).await;
    }
}
