//! Events emitted for off-chain relayers and indexers

use anchor_lang::prelude::*;

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEvent {
    pub deposit_id: u64,
    pub token_id: u64,
    pub amount: u64,
    pub depositor: Pubkey,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequestEvent {
    pub deposit_id: u64,
    pub token_id: u64,
    pub amount: u64,
    pub recipient: Pubkey,
    pub requester: Pubkey,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalCompletedEvent {
    pub deposit_id: u64,
    pub token_id: u64,
    pub amount: u64,
    pub recipient: Pubkey,
    pub relayer: Pubkey,
    pub timestamp: i64,
}
