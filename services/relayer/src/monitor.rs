//! Monitor for withdrawal requests
//!
//! Walks the program's transaction history forward from the last seen
//! signature and extracts `WithdrawalRequestEvent`s from the logs.

use crate::config::RelayerConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use proof_of_collateral_sdk::{events::parse_logs, BridgeEvent, WithdrawalRequestEvent};
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_config::RpcTransactionConfig,
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};
use solana_transaction_status::{option_serializer::OptionSerializer, UiTransactionEncoding};
use std::str::FromStr;
use tracing::{debug, error, warn};

/// One program transaction as listed by the history source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub signature: Signature,
    /// The transaction failed on chain
    pub failed: bool,
}

/// Read access to the program's transaction history
#[async_trait(?Send)]
pub trait ProgramHistory {
    /// Signatures strictly older than `before` and strictly newer than
    /// `until`, newest first, at most `limit` of them.
    async fn signatures(
        &self,
        before: Option<Signature>,
        until: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>>;

    async fn logs(&self, signature: &Signature) -> Result<Vec<String>>;
}

/// `getSignaturesForAddress` and `getTransaction` reject `processed`
pub fn history_commitment(commitment: CommitmentConfig) -> CommitmentConfig {
    if commitment.is_at_least_confirmed() {
        commitment
    } else {
        CommitmentConfig::confirmed()
    }
}

pub struct RpcHistory {
    client: RpcClient,
    program_id: Pubkey,
    commitment: CommitmentConfig,
}

impl RpcHistory {
    pub fn new(rpc_url: String, program_id: Pubkey, commitment: CommitmentConfig) -> Self {
        let commitment = history_commitment(commitment);
        Self {
            client: RpcClient::new_with_commitment(rpc_url, commitment),
            program_id,
            commitment,
        }
    }
}

#[async_trait(?Send)]
impl ProgramHistory for RpcHistory {
    async fn signatures(
        &self,
        before: Option<Signature>,
        until: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>> {
        let statuses = self
            .client
            .get_signatures_for_address_with_config(
                &self.program_id,
                GetConfirmedSignaturesForAddress2Config {
                    before,
                    until,
                    limit: Some(limit),
                    commitment: Some(self.commitment),
                },
            )
            .await
            .context("Failed to fetch program signatures")?;

        statuses
            .into_iter()
            .map(|status| -> Result<HistoryEntry> {
                let signature = Signature::from_str(&status.signature)
                    .with_context(|| format!("Invalid signature from RPC: {}", status.signature))?;
                Ok(HistoryEntry {
                    signature,
                    failed: status.err.is_some(),
                })
            })
            .collect()
    }

    async fn logs(&self, signature: &Signature) -> Result<Vec<String>> {
        let tx = self
            .client
            .get_transaction_with_config(
                signature,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(self.commitment),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await
            .with_context(|| format!("Failed to fetch transaction {signature}"))?;

        let Some(meta) = tx.transaction.meta else {
            warn!("Transaction {} has no status meta", signature);
            return Ok(Vec::new());
        };

        Ok(match meta.log_messages {
            OptionSerializer::Some(logs) => logs,
            _ => Vec::new(),
        })
    }
}

pub struct WithdrawalMonitor<H = RpcHistory> {
    history: H,
    program_id: Pubkey,
    batch_limit: usize,
    max_log_attempts: u32,
    /// Newest signature already listed
    cursor: Option<Signature>,
    /// Transactions whose logs could not be read yet, with attempts so far
    retry: Vec<(Signature, u32)>,
}

impl WithdrawalMonitor<RpcHistory> {
    pub fn new(config: &RelayerConfig) -> Self {
        let history = RpcHistory::new(
            config.sdk.rpc_url.clone(),
            config.sdk.program_id,
            config.sdk.commitment,
        );
        Self::with_history(history, config)
    }
}

impl<H: ProgramHistory> WithdrawalMonitor<H> {
    pub fn with_history(history: H, config: &RelayerConfig) -> Self {
        Self {
            history,
            program_id: config.sdk.program_id,
            batch_limit: config.batch_limit.max(1),
            max_log_attempts: config.max_log_attempts.max(1),
            cursor: None,
            retry: Vec::new(),
        }
    }

    pub fn cursor(&self) -> Option<&Signature> {
        self.cursor.as_ref()
    }

    /// Transactions waiting for another log fetch
    pub fn pending_retries(&self) -> usize {
        self.retry.len()
    }

    /// Fetch withdrawal requests from transactions newer than the cursor,
    /// oldest first.
    ///
    /// With a cursor, pages back until the cursor is reached so no request is
    /// lost however many transactions landed since the last poll. The first
    /// poll only reads the newest page. The cursor moves only after the whole
    /// range has been listed.
    pub async fn poll_requests(&mut self) -> Result<Vec<WithdrawalRequestEvent>> {
        let fresh = self.new_signatures().await?;

        let mut requests = Vec::new();

        // Retries are older than anything just listed
        let retry = std::mem::take(&mut self.retry);
        for (signature, attempts) in retry {
            self.scan(signature, attempts, &mut requests).await;
        }

        for entry in fresh.iter().rev() {
            if entry.failed {
                continue;
            }
            self.scan(entry.signature, 0, &mut requests).await;
        }

        if let Some(newest) = fresh.first() {
            self.cursor = Some(newest.signature);
        }
        Ok(requests)
    }

    /// Every signature newer than the cursor, newest first
    async fn new_signatures(&self) -> Result<Vec<HistoryEntry>> {
        let mut listed: Vec<HistoryEntry> = Vec::new();
        let mut before = None;

        loop {
            let page = self
                .history
                .signatures(before, self.cursor, self.batch_limit)
                .await?;
            let exhausted = page.len() < self.batch_limit;
            before = page.last().map(|entry| entry.signature);
            listed.extend(page);

            if exhausted || self.cursor.is_none() {
                break;
            }
            debug!("Paging past {} signatures towards the cursor", listed.len());
        }

        Ok(listed)
    }

    async fn scan(
        &mut self,
        signature: Signature,
        attempts: u32,
        requests: &mut Vec<WithdrawalRequestEvent>,
    ) {
        match self.history.logs(&signature).await {
            Ok(logs) => {
                let found = withdrawal_requests(&self.program_id, &logs);
                if !found.is_empty() {
                    debug!("Found {} withdrawal request(s) in {}", found.len(), signature);
                }
                requests.extend(found);
            }
            Err(e) if attempts + 1 < self.max_log_attempts => {
                warn!("Could not read logs of {} (attempt {}): {:#}", signature, attempts + 1, e);
                self.retry.push((signature, attempts + 1));
            }
            Err(e) => {
                error!(
                    "Dropping transaction {} after {} failed log fetches: {:#}",
                    signature,
                    attempts + 1,
                    e
                );
            }
        }
    }
}

/// Withdrawal requests emitted by `program_id` in one transaction's logs
pub fn withdrawal_requests<S: AsRef<str>>(program_id: &Pubkey, logs: &[S]) -> Vec<WithdrawalRequestEvent> {
    parse_logs(program_id, logs)
        .into_iter()
        .filter_map(|event| match event {
            BridgeEvent::WithdrawalRequest(request) => Some(request),
            _ => None,
        })
        .collect()
}
