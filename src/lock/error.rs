use std::time::Duration;

use thiserror::Error;

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The underlying lock primitive was poisoned (e.g. a thread panicked while holding it).
    #[error("lock poisoned: {0}")]
    Poisoned(String),
    /// The lock was still held by someone else when the wait budget ran out.
    #[error("timed out after {waited:?} waiting for lock on {key}")]
    Timeout { key: String, waited: Duration },
    /// Any other lock error.
    #[error("lock error: {0}")]
    Other(String),
}

impl LockError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LockError::Timeout { .. })
    }
}
