//! Error types for Planwright.

use thiserror::Error;

use crate::domain::ChainError;

/// Main error type for solving operations.
#[derive(Debug, Error)]
pub enum PlanwrightError {
    /// Invalid solver or selector configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A move broke or would have broken the chain invariant.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// No move could be selected while the working solution is still
    /// uninitialized, so a construction phase has to run first.
    #[error("stalled: {0}")]
    Stall(String),

    /// Invalid operation for the current solver state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Solving was cancelled before it could start.
    #[error("solver was cancelled")]
    Cancelled,

    /// Internal error that should not occur in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for Planwright operations.
pub type Result<T> = std::result::Result<T, PlanwrightError>;
