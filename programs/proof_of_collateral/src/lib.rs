//! Proof-of-collateral bridge
//!
//! Locks registered SPL tokens in a vault owned by the `token_bridge` PDA and
//! releases them to a recipient once an authorized relayer processes the
//! withdrawal request:
//! - Authority: initializes the bridge, registers mints, manages relayers
//! - Users: deposit tokens and request withdrawals
//! - Relayers: complete withdrawals, once per deposit

use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

pub use error::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

#[program]
pub mod proof_of_collateral {
    use super::*;

    /// Create the bridge state and record the calling authority
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        initialize::handler(ctx)
    }

    /// Register a mint under a bridge token id
    pub fn register_token(ctx: Context<RegisterToken>, token_id: u64) -> Result<()> {
        register_token::handler(ctx, token_id)
    }

    pub fn add_relayer(ctx: Context<AddRelayer>, relayer_address: Pubkey) -> Result<()> {
        add_relayer::handler(ctx, relayer_address)
    }

    pub fn remove_relayer(ctx: Context<RemoveRelayer>) -> Result<()> {
        remove_relayer::handler(ctx)
    }

    /// Lock `amount` tokens in the bridge vault under `deposit_id`
    pub fn deposit(ctx: Context<Deposit>, deposit_id: u64, amount: u64) -> Result<()> {
        deposit::handler(ctx, deposit_id, amount)
    }

    /// Ask relayers to release a deposit to `recipient`
    pub fn request_withdrawal(
        ctx: Context<RequestWithdrawal>,
        deposit_id: u64,
        recipient: Pubkey,
    ) -> Result<()> {
        request_withdrawal::handler(ctx, deposit_id, recipient)
    }

    /// Release a deposit from the vault, relayer only
    pub fn process_withdrawal(
        ctx: Context<ProcessWithdrawal>,
        deposit_id: u64,
        recipient: Pubkey,
    ) -> Result<()> {
        process_withdrawal::handler(ctx, deposit_id, recipient)
    }
}
