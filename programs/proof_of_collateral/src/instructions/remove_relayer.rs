use anchor_lang::prelude::*;
use crate::error::BridgeError;
use crate::state::{BridgeState, RelayerInfo, BRIDGE_STATE_SEED, RELAYER_INFO_SEED};

/// Deactivates a relayer. The account is kept so its index is never reused.
#[derive(Accounts)]
pub struct RemoveRelayer<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [BRIDGE_STATE_SEED],
        bump = bridge_state.bump,
        constraint = bridge_state.authority == authority.key() @ BridgeError::UnauthorizedAccess
    )]
    pub bridge_state: Account<'info, BridgeState>,

    #[account(
        mut,
        seeds = [RELAYER_INFO_SEED, relayer_info.relayer.as_ref()],
        bump
    )]
    pub relayer_info: Account<'info, RelayerInfo>,
}

pub fn handler(ctx: Context<RemoveRelayer>) -> Result<()> {
    let relayer_info = &mut ctx.accounts.relayer_info;
    relayer_info.is_active = false;

    msg!("Removed relayer: {}", relayer_info.relayer);
    Ok(())
}
