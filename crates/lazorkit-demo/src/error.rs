use thiserror::Error;

/// Errors returned by the demo's local logic.
///
/// Nothing here is fatal: persistence failures degrade the ledger to memory,
/// fetch failures keep the last good value until the next tick.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("fetch failed: {0}")]
    TransientFetchFailure(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl DemoError {
    /// Whether a poller should just try again on its next tick.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DemoError::TransientFetchFailure(_) | DemoError::Malformed(_)
        )
    }
}
