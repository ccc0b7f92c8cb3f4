//! Error taxonomy for the ranking engine.
//!
//! An empty candidate set is never an error; it is an empty result. Everything
//! below is recoverable by the caller (switch strategy, retry, or skip ranking).

use thiserror::Error;

/// Result alias used throughout the ranking core.
pub type Result<T> = std::result::Result<T, RankError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    /// Caller error: blank topic, zero top_k, blank keyword.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The scoring backend failed to initialize. Disables that scorer for the
    /// lifetime of the process; retrying the request will not help.
    #[error("scoring backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A single request failed inside the backend. Safe to retry.
    #[error("scoring failed: {0}")]
    ScoringFailure(String),
}

impl RankError {
    /// Stable, machine-readable tag used for metrics labels and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            RankError::InvalidInput(_) => "invalid_input",
            RankError::BackendUnavailable(_) => "backend_unavailable",
            RankError::ScoringFailure(_) => "scoring_failure",
        }
    }

    /// True when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RankError::ScoringFailure(_))
    }
}
