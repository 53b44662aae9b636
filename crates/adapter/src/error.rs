use thiserror::Error;

use crate::protocol::ErrorCode;

/// Reasons an inbound line cannot be turned into an engine call
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{action} requires \"{field}\"")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error("unknown message type {0:?}")]
    UnknownType(String),
}

impl ProtocolError {
    /// Wire error code reported for this failure
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidCommand
    }
}
