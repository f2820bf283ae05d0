//! Errors surfaced synchronously to callers of the engine.
//!
//! Per-transfer failures are not in here: they are recovered inside the poll
//! loop and reported to the result handler (see `transfer::TransferError`).

use thiserror::Error;

/// Configuration-time and environment failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Empty URL, zero limit or zero duration. No state was changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The transport capability is missing from the runtime.
    #[error("environment: {0}")]
    Environment(String),
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidArgument(msg.into())
    }
}
