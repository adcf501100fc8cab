//! Decode bridge events from transaction logs
//!
//! `emit!` writes each event as `Program data: <base64>`, where the payload is
//! the 8-byte event discriminator followed by the Borsh-encoded fields. Only
//! data lines logged while the bridge program itself is executing are
//! considered; lines from CPI callees are ignored.

use crate::error::{Result, SdkError};
use anchor_lang::prelude::Pubkey;
use anchor_lang::{AnchorDeserialize, Discriminator};
use base64::{engine::general_purpose::STANDARD, Engine};
use proof_of_collateral::{DepositEvent, WithdrawalCompletedEvent, WithdrawalRequestEvent};
use tracing::warn;

pub const PROGRAM_DATA_PREFIX: &str = "Program data: ";
const PROGRAM_PREFIX: &str = "Program ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Deposit(DepositEvent),
    WithdrawalRequest(WithdrawalRequestEvent),
    WithdrawalCompleted(WithdrawalCompletedEvent),
}

impl BridgeEvent {
    pub fn deposit_id(&self) -> u64 {
        match self {
            Self::Deposit(e) => e.deposit_id,
            Self::WithdrawalRequest(e) => e.deposit_id,
            Self::WithdrawalCompleted(e) => e.deposit_id,
        }
    }
}

/// Decode one event payload. Unknown discriminators yield `Ok(None)`; a known
/// discriminator with a malformed body is an error.
pub fn decode_event(data: &[u8]) -> Result<Option<BridgeEvent>> {
    if let Some(mut body) = data.strip_prefix(DepositEvent::DISCRIMINATOR) {
        return deserialize(&mut body, "DepositEvent").map(|e| Some(BridgeEvent::Deposit(e)));
    }
    if let Some(mut body) = data.strip_prefix(WithdrawalRequestEvent::DISCRIMINATOR) {
        return deserialize(&mut body, "WithdrawalRequestEvent")
            .map(|e| Some(BridgeEvent::WithdrawalRequest(e)));
    }
    if let Some(mut body) = data.strip_prefix(WithdrawalCompletedEvent::DISCRIMINATOR) {
        return deserialize(&mut body, "WithdrawalCompletedEvent")
            .map(|e| Some(BridgeEvent::WithdrawalCompleted(e)));
    }
    Ok(None)
}

fn deserialize<T: AnchorDeserialize>(body: &mut &[u8], name: &str) -> Result<T> {
    T::deserialize(body).map_err(|e| SdkError::EventDecode(format!("{name}: {e}")))
}

/// Decode a single `Program data:` log line
pub fn decode_log_line(line: &str) -> Result<Option<BridgeEvent>> {
    let Some(encoded) = line.strip_prefix(PROGRAM_DATA_PREFIX) else {
        return Ok(None);
    };
    let data = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SdkError::EventDecode(format!("invalid base64: {e}")))?;
    decode_event(&data)
}

/// Collect every bridge event emitted by `program_id` in a transaction's logs.
/// Malformed payloads are logged and skipped.
pub fn parse_logs<S: AsRef<str>>(program_id: &Pubkey, logs: &[S]) -> Vec<BridgeEvent> {
    let program_id = program_id.to_string();
    let mut call_stack: Vec<&str> = Vec::new();
    let mut events = Vec::new();

    for line in logs {
        let line = line.as_ref();

        if line.starts_with(PROGRAM_DATA_PREFIX) {
            if call_stack.last() != Some(&program_id.as_str()) {
                continue;
            }
            match decode_log_line(line) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(e) => warn!("Skipping undecodable event: {}", e),
            }
            continue;
        }

        let Some(rest) = line.strip_prefix(PROGRAM_PREFIX) else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        let (Some(id), Some(action)) = (parts.next(), parts.next()) else {
            continue;
        };

        if action == "invoke" {
            call_stack.push(id);
        } else if action == "success" || action.starts_with("failed") {
            call_stack.pop();
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::Event;

    fn data_line<E: Event>(event: &E) -> String {
        format!("{PROGRAM_DATA_PREFIX}{}", STANDARD.encode(event.data()))
    }

    fn sample_request() -> WithdrawalRequestEvent {
        WithdrawalRequestEvent {
            deposit_id: 9,
            token_id: 1,
            amount: 500,
            recipient: Pubkey::new_unique(),
            requester: Pubkey::new_unique(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_decode_log_line_roundtrips_request() {
        let event = sample_request();
        let decoded = decode_log_line(&data_line(&event)).unwrap();
        assert_eq!(decoded, Some(BridgeEvent::WithdrawalRequest(event)));
    }

    #[test]
    fn test_unknown_discriminator_is_ignored() {
        let line = format!("{PROGRAM_DATA_PREFIX}{}", STANDARD.encode([0u8; 16]));
        assert_eq!(decode_log_line(&line).unwrap(), None);
        assert_eq!(decode_log_line("Program log: hello").unwrap(), None);
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let mut data = sample_request().data();
        data.truncate(12);
        let line = format!("{PROGRAM_DATA_PREFIX}{}", STANDARD.encode(data));
        assert!(matches!(decode_log_line(&line), Err(SdkError::EventDecode(_))));
    }

    #[test]
    fn test_bad_base64_is_an_error() {
        assert!(decode_log_line("Program data: !!!not-base64").is_err());
    }
}
