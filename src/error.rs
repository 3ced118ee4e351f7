//! Error type shared by every module of the crate.

use thiserror::Error as ThisError;

/// Errors raised while configuring or running the GA.
///
/// None of these are retryable: they indicate bad parameters or a wiring
/// mistake between the point set and the distance provider.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// A parameter is out of range or inconsistent with another one.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The selection strategy name is not one of the known ones.
    #[error("unknown selection strategy: {0:?}")]
    UnknownSelectionStrategy(String),

    /// A distance lookup referenced a point outside the configured set.
    #[error("unknown point: {0}")]
    UnknownPoint(String),

    /// An engine operation was called in the wrong lifecycle state.
    #[error("cannot {operation} while the engine is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn unknown_point(point: impl std::fmt::Display) -> Self {
        Self::UnknownPoint(point.to_string())
    }
}
