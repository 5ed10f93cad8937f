// src/menu_sync/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No actor capability yet (session not established or capability dropped).
    #[error("Actor not available")]
    ActorUnavailable,

    #[error("Remote call rejected: {0}")]
    Rejected(String),

    #[error("Remote call timed out after {0} ms")]
    Timeout(u64),

    #[error("Failed to convert image '{name}' (file {index}): {reason}")]
    Conversion {
        index: u64,
        name: String,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid principal: {0}")]
    InvalidIdentity(String),

    #[error("Cannot demote the last administrator")]
    LastAdmin,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Builds a conversion error for the file at `index` in a batch.
    pub fn conversion(index: usize, name: &str, reason: impl ToString) -> Self {
        SyncError::Conversion {
            index: index as u64,
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
