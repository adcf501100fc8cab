//! Program-derived addresses used by the bridge

use anchor_lang::prelude::Pubkey;
use proof_of_collateral::{
    BRIDGE_STATE_SEED, DEPOSIT_INFO_SEED, RELAYER_INFO_SEED, TOKEN_BRIDGE_SEED, TOKEN_INFO_SEED,
};
use spl_associated_token_account::get_associated_token_address;

pub fn bridge_state(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[BRIDGE_STATE_SEED], program_id)
}

/// Authority of every bridge vault token account
pub fn token_bridge(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[TOKEN_BRIDGE_SEED], program_id)
}

pub fn token_info(program_id: &Pubkey, token_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[TOKEN_INFO_SEED, &token_id.to_le_bytes()], program_id)
}

pub fn relayer_info(program_id: &Pubkey, relayer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RELAYER_INFO_SEED, relayer.as_ref()], program_id)
}

pub fn deposit_info(program_id: &Pubkey, deposit_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[DEPOSIT_INFO_SEED, &deposit_id.to_le_bytes()], program_id)
}

/// Associated token account holding bridged `mint` tokens
pub fn vault(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(&token_bridge(program_id).0, mint)
}
