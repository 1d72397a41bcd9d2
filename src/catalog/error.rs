use thiserror::Error;

use crate::inventory::InventoryError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("item not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("catalog store error: {0}")]
    Store(#[from] StoreError),
}
