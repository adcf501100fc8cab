use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::error::BridgeError;
use crate::events::DepositEvent;
use crate::state::{
    BridgeState, DepositInfo, TokenInfo, BRIDGE_STATE_SEED, DEPOSIT_INFO_SEED, TOKEN_BRIDGE_SEED,
    TOKEN_INFO_SEED,
};

#[derive(Accounts)]
#[instruction(deposit_id: u64, amount: u64)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [BRIDGE_STATE_SEED],
        bump = bridge_state.bump
    )]
    pub bridge_state: Account<'info, BridgeState>,

    #[account(
        seeds = [TOKEN_INFO_SEED, token_info.token_id.to_le_bytes().as_ref()],
        bump
    )]
    pub token_info: Account<'info, TokenInfo>,

    #[account(
        mut,
        constraint = user_token_account.mint == token_info.mint,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// CHECK: PDA that owns the bridge vault token accounts
    #[account(
        seeds = [TOKEN_BRIDGE_SEED],
        bump = bridge_state.token_bridge_bump
    )]
    pub token_bridge: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = bridge_token_account.mint == token_info.mint,
        constraint = bridge_token_account.owner == token_bridge.key()
    )]
    pub bridge_token_account: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = user,
        space = 8 + DepositInfo::LEN,
        seeds = [DEPOSIT_INFO_SEED, deposit_id.to_le_bytes().as_ref()],
        bump
    )]
    pub deposit_info: Account<'info, DepositInfo>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, deposit_id: u64, amount: u64) -> Result<()> {
    require!(amount > 0, BridgeError::InvalidAmount);

    let token_info = &ctx.accounts.token_info;
    require!(token_info.is_active, BridgeError::TokenNotActive);

    let cpi_accounts = Transfer {
        from: ctx.accounts.user_token_account.to_account_info(),
        to: ctx.accounts.bridge_token_account.to_account_info(),
        authority: ctx.accounts.user.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    let timestamp = Clock::get()?.unix_timestamp;

    let deposit_info = &mut ctx.accounts.deposit_info;
    deposit_info.deposit_id = deposit_id;
    deposit_info.token_id = token_info.token_id;
    deposit_info.mint = token_info.mint;
    deposit_info.amount = amount;
    deposit_info.depositor = ctx.accounts.user.key();
    deposit_info.claimed = false;
    deposit_info.timestamp = timestamp;

    emit!(DepositEvent {
        deposit_id,
        token_id: token_info.token_id,
        amount,
        depositor: deposit_info.depositor,
        timestamp,
    });

    msg!(
        "Deposit successful: ID={}, Amount={}, Token={}",
        deposit_id,
        amount,
        token_info.mint
    );
    Ok(())
}
