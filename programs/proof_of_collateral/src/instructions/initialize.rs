use anchor_lang::prelude::*;
use crate::state::{BridgeState, BRIDGE_STATE_SEED, TOKEN_BRIDGE_SEED};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + BridgeState::LEN,
        seeds = [BRIDGE_STATE_SEED],
        bump
    )]
    pub bridge_state: Account<'info, BridgeState>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    let (_, token_bridge_bump) = Pubkey::find_program_address(&[TOKEN_BRIDGE_SEED], ctx.program_id);

    let bridge_state = &mut ctx.accounts.bridge_state;
    bridge_state.authority = ctx.accounts.authority.key();
    bridge_state.relayer_count = 0;
    bridge_state.bump = ctx.bumps.bridge_state;
    bridge_state.token_bridge_bump = token_bridge_bump;

    msg!("Bridge initialized with authority: {}", bridge_state.authority);
    Ok(())
}
