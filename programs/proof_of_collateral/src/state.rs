//! Bridge accounts and PDA seeds

use anchor_lang::prelude::*;

pub const BRIDGE_STATE_SEED: &[u8] = b"bridge_state";
pub const TOKEN_INFO_SEED: &[u8] = b"token_info";
pub const RELAYER_INFO_SEED: &[u8] = b"relayer_info";
pub const DEPOSIT_INFO_SEED: &[u8] = b"deposit_info";
pub const TOKEN_BRIDGE_SEED: &[u8] = b"token_bridge";

/// Singleton bridge configuration
#[account]
#[derive(Debug)]
pub struct BridgeState {
    /// Admin authority for the bridge
    pub authority: Pubkey,
    /// Number of relayers ever added
    pub relayer_count: u32,
    /// Bump of this account
    pub bump: u8,
    /// Bump of the `token_bridge` vault authority
    pub token_bridge_bump: u8,
}

impl BridgeState {
    pub const LEN: usize = 32 + // authority
        4 + // relayer_count
        1 + // bump
        1; // token_bridge_bump
}

#[account]
#[derive(Debug)]
pub struct TokenInfo {
    pub mint: Pubkey,
    pub token_id: u64,
    /// Authority who registered this token
    pub authority: Pubkey,
    pub is_active: bool,
}

impl TokenInfo {
    pub const LEN: usize = 32 + 8 + 32 + 1;
}

#[account]
#[derive(Debug)]
pub struct RelayerInfo {
    pub relayer: Pubkey,
    /// Authority who added this relayer
    pub authority: Pubkey,
    pub is_active: bool,
    /// Position in the order relayers were added
    pub index: u32,
}

impl RelayerInfo {
    pub const LEN: usize = 32 + 32 + 1 + 4;
}

/// One locked deposit, claimable once
#[account]
#[derive(Debug)]
pub struct DepositInfo {
    pub deposit_id: u64,
    pub token_id: u64,
    pub mint: Pubkey,
    pub amount: u64,
    pub depositor: Pubkey,
    pub claimed: bool,
    pub timestamp: i64,
}

impl DepositInfo {
    pub const LEN: usize = 8 + // deposit_id
        8 + // token_id
        32 + // mint
        8 + // amount
        32 + // depositor
        1 + // claimed
        8; // timestamp
}
