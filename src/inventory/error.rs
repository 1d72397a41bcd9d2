use thiserror::Error;

use crate::store::StoreError;

/// Outcome of a rejected purchase or restock.
///
/// `ItemNotFound`, `OutOfStock` and `InvalidAmount` are business outcomes.
/// `Transaction` wraps a store failure inside the locked section; by the
/// time the caller sees it the transaction has been rolled back and the row
/// lock released. The engine never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("item not found: {0}")]
    ItemNotFound(String),
    #[error("item {0} is out of stock")]
    OutOfStock(String),
    #[error("invalid restock amount: {0}")]
    InvalidAmount(i64),
    #[error("inventory transaction failed: {0}")]
    Transaction(#[from] StoreError),
}

impl InventoryError {
    /// True for failures a caller may retry as-is, i.e. a lock wait that ran out.
    pub fn is_transient(&self) -> bool {
        matches!(self, InventoryError::Transaction(err) if err.is_transient())
    }
}
