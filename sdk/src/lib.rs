//! Proof-of-Collateral SDK - client interface for the bridge program
//!
//! This SDK provides:
//! - Environment-driven configuration (same variables as `AnchorProvider.env()`)
//! - An async client with one method per program instruction
//! - PDA derivation helpers
//! - Event decoding from transaction logs
//! - The `initialize` smoke-test harness

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod harness;
pub mod pda;

// Re-export key types
pub use client::CollateralClient;
pub use config::SdkConfig;
pub use error::{Result, SdkError};
pub use events::BridgeEvent;

pub use proof_of_collateral::{
    BridgeState, DepositEvent, DepositInfo, RelayerInfo, TokenInfo, WithdrawalCompletedEvent,
    WithdrawalRequestEvent, ID as PROGRAM_ID,
};
