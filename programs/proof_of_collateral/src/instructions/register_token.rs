use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use crate::error::BridgeError;
use crate::state::{BridgeState, TokenInfo, BRIDGE_STATE_SEED, TOKEN_INFO_SEED};

#[derive(Accounts)]
#[instruction(token_id: u64)]
pub struct RegisterToken<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [BRIDGE_STATE_SEED],
        bump = bridge_state.bump,
        constraint = bridge_state.authority == authority.key() @ BridgeError::UnauthorizedAccess
    )]
    pub bridge_state: Account<'info, BridgeState>,

    #[account(
        init,
        payer = authority,
        space = 8 + TokenInfo::LEN,
        seeds = [TOKEN_INFO_SEED, token_id.to_le_bytes().as_ref()],
        bump
    )]
    pub token_info: Account<'info, TokenInfo>,

    pub mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RegisterToken>, token_id: u64) -> Result<()> {
    let token_info = &mut ctx.accounts.token_info;
    token_info.mint = ctx.accounts.mint.key();
    token_info.token_id = token_id;
    token_info.authority = ctx.accounts.authority.key();
    token_info.is_active = true;

    msg!("Token registered: ID={}, Mint={}", token_id, token_info.mint);
    Ok(())
}
