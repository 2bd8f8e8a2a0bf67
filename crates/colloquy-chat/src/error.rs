//! Error types for the conversation session manager.

use colloquy_core::error::ColloquyError;

use crate::types::Role;

/// Contract violations and collaborator failures inside a chat session.
///
/// Empty submissions and submissions while a request is in flight are not
/// errors; the controller simply refuses them.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("turn index {index} out of range for log of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("turn {index} has role {role}, expected user")]
    InvalidRole { index: usize, role: Role },
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("request {0} is not the one in flight")]
    StaleRequest(uuid::Uuid),
    #[error("history error: {0}")]
    History(String),
    #[error("export error: {0}")]
    Export(String),
}

/// Failure to get any reply from the assistant service.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("connection failed: {0}")]
    Connectivity(String),
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("request abandoned before a reply arrived")]
    Abandoned,
}

impl From<ChatError> for ColloquyError {
    fn from(err: ChatError) -> Self {
        ColloquyError::Chat(err.to_string())
    }
}
