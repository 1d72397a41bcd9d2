use thiserror::Error;

use crate::lock::LockError;
use crate::model::ModelError;

/// Failure inside the transactional store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A staged update rewrote the record id, which would commit it under a
    /// different key than the one locked.
    #[error("transaction on {locked} tried to commit record {staged}")]
    KeyChanged { locked: String, staged: String },
}

impl StoreError {
    /// Lock timeouts are transient; every other store error is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Lock(err) if err.is_transient())
    }
}
