use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::error::BridgeError;
use crate::events::WithdrawalCompletedEvent;
use crate::state::{
    BridgeState, DepositInfo, RelayerInfo, BRIDGE_STATE_SEED, DEPOSIT_INFO_SEED,
    RELAYER_INFO_SEED, TOKEN_BRIDGE_SEED,
};

#[derive(Accounts)]
#[instruction(deposit_id: u64, recipient: Pubkey)]
pub struct ProcessWithdrawal<'info> {
    #[account(mut)]
    pub relayer: Signer<'info>,

    #[account(
        seeds = [BRIDGE_STATE_SEED],
        bump = bridge_state.bump
    )]
    pub bridge_state: Account<'info, BridgeState>,

    #[account(
        seeds = [RELAYER_INFO_SEED, relayer.key().as_ref()],
        bump,
        constraint = relayer_info.relayer == relayer.key() @ BridgeError::UnauthorizedAccess,
        constraint = relayer_info.is_active @ BridgeError::RelayerNotActive
    )]
    pub relayer_info: Account<'info, RelayerInfo>,

    #[account(
        mut,
        seeds = [DEPOSIT_INFO_SEED, deposit_id.to_le_bytes().as_ref()],
        bump,
        constraint = !deposit_info.claimed @ BridgeError::AlreadyClaimed
    )]
    pub deposit_info: Account<'info, DepositInfo>,

    /// CHECK: PDA that owns the bridge vault token accounts
    #[account(
        seeds = [TOKEN_BRIDGE_SEED],
        bump = bridge_state.token_bridge_bump
    )]
    pub token_bridge: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = bridge_token_account.mint == deposit_info.mint,
        constraint = bridge_token_account.owner == token_bridge.key()
    )]
    pub bridge_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = recipient_token_account.mint == deposit_info.mint,
        constraint = recipient_token_account.owner == recipient
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<ProcessWithdrawal>, deposit_id: u64, recipient: Pubkey) -> Result<()> {
    let amount = ctx.accounts.deposit_info.amount;
    let bump = ctx.accounts.bridge_state.token_bridge_bump;
    let signer_seeds: &[&[&[u8]]] = &[&[TOKEN_BRIDGE_SEED, &[bump]]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.bridge_token_account.to_account_info(),
        to: ctx.accounts.recipient_token_account.to_account_info(),
        authority: ctx.accounts.token_bridge.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::transfer(cpi_ctx, amount)?;

    let deposit_info = &mut ctx.accounts.deposit_info;
    deposit_info.claimed = true;

    emit!(WithdrawalCompletedEvent {
        deposit_id,
        token_id: deposit_info.token_id,
        amount,
        recipient,
        relayer: ctx.accounts.relayer.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "Withdrawal processed: DepositID={}, Amount={}, Recipient={}, Relayer={}",
        deposit_id,
        amount,
        recipient,
        ctx.accounts.relayer.key()
    );
    Ok(())
}
