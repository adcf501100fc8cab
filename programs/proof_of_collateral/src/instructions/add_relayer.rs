use anchor_lang::prelude::*;
use crate::error::BridgeError;
use crate::state::{BridgeState, RelayerInfo, BRIDGE_STATE_SEED, RELAYER_INFO_SEED};

#[derive(Accounts)]
#[instruction(relayer_address: Pubkey)]
pub struct AddRelayer<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [BRIDGE_STATE_SEED],
        bump = bridge_state.bump,
        constraint = bridge_state.authority == authority.key() @ BridgeError::UnauthorizedAccess
    )]
    pub bridge_state: Account<'info, BridgeState>,

    #[account(
        init,
        payer = authority,
        space = 8 + RelayerInfo::LEN,
        seeds = [RELAYER_INFO_SEED, relayer_address.as_ref()],
        bump
    )]
    pub relayer_info: Account<'info, RelayerInfo>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddRelayer>, relayer_address: Pubkey) -> Result<()> {
    let bridge_state = &mut ctx.accounts.bridge_state;
    let relayer_info = &mut ctx.accounts.relayer_info;

    relayer_info.relayer = relayer_address;
    relayer_info.authority = ctx.accounts.authority.key();
    relayer_info.is_active = true;
    relayer_info.index = bridge_state.relayer_count;

    bridge_state.relayer_count = bridge_state
        .relayer_count
        .checked_add(1)
        .ok_or(BridgeError::MathOverflow)?;

    msg!("Added relayer: {} (index {})", relayer_address, relayer_info.index);
    Ok(())
}
