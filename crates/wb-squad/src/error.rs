//! Squad-subsystem error type.

use thiserror::Error;

/// Errors produced by `wb-squad`.
#[derive(Debug, Error)]
pub enum SquadError {
    #[error("callsign {0:?} is already in use")]
    DuplicateCallsign(String),

    #[error("spawn configuration error: {0}")]
    Config(String),
}

pub type SquadResult<T> = Result<T, SquadError>;
