//! SDK errors

use anchor_client::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SdkError>;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Anchor client error: {0}")]
    AnchorClient(Box<ClientError>),

    #[error("Failed to load keypair from {path}: {reason}")]
    Keypair { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Event decoding error: {0}")]
    EventDecode(String),
}

impl From<ClientError> for SdkError {
    fn from(err: ClientError) -> Self {
        Self::AnchorClient(Box::new(err))
    }
}
