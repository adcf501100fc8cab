use anchor_lang::prelude::*;
use crate::error::BridgeError;
use crate::events::WithdrawalRequestEvent;
use crate::state::{DepositInfo, DEPOSIT_INFO_SEED};

/// Emits a request for relayers; no state changes.
#[derive(Accounts)]
#[instruction(deposit_id: u64, recipient: Pubkey)]
pub struct RequestWithdrawal<'info> {
    #[account(mut)]
    pub requester: Signer<'info>,

    #[account(
        seeds = [DEPOSIT_INFO_SEED, deposit_id.to_le_bytes().as_ref()],
        bump,
        constraint = !deposit_info.claimed @ BridgeError::AlreadyClaimed,
        constraint = deposit_info.depositor == requester.key() @ BridgeError::UnauthorizedAccess
    )]
    pub deposit_info: Account<'info, DepositInfo>,
}

pub fn handler(ctx: Context<RequestWithdrawal>, deposit_id: u64, recipient: Pubkey) -> Result<()> {
    let deposit_info = &ctx.accounts.deposit_info;

    emit!(WithdrawalRequestEvent {
        deposit_id,
        token_id: deposit_info.token_id,
        amount: deposit_info.amount,
        recipient,
        requester: ctx.accounts.requester.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Withdrawal requested: DepositID={}, Recipient={}", deposit_id, recipient);
    Ok(())
}
