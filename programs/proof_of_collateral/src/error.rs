//! Bridge errors

use anchor_lang::prelude::*;

#[error_code]
pub enum BridgeError {
    #[msg("Unauthorized access")]
    UnauthorizedAccess,

    #[msg("Token not registered or active")]
    TokenNotActive,

    #[msg("Deposit already claimed")]
    AlreadyClaimed,

    #[msg("Relayer not active")]
    RelayerNotActive,

    #[msg("Deposit amount must be greater than zero")]
    InvalidAmount,

    #[msg("Arithmetic overflow")]
    MathOverflow,
}
