//! Inventory-backed sales ledger.
//!
//! Items carry a stock counter that concurrent purchases decrement. Every
//! purchase and restock runs as one row-locked transaction, so for any item
//! with `k` units left, `N > k` simultaneous purchases produce exactly `k`
//! sales and `N - k` out-of-stock rejections, and stock never goes negative.
//!
//! ```ignore
//! use rust_decimal_macros::dec;
//! use stock_ledger::{CatalogService, LedgerConfig, NewItem};
//!
//! let catalog = CatalogService::in_memory(&LedgerConfig::from_env()?);
//! let item = catalog.create(NewItem::new("Gulab Jamun", "Traditional", dec!(50), 1))?;
//!
//! catalog.purchase(&item.id)?;          // quantity 0
//! assert!(catalog.purchase(&item.id).is_err()); // out of stock
//! catalog.restock(&item.id, 3)?;        // quantity 3
//! ```

mod catalog;
mod config;
mod inventory;
pub mod lock;
pub mod model;
pub mod store;

pub use catalog::{CatalogError, CatalogService, ItemPatch, ItemQuery, NewItem};
pub use config::{ConfigError, LedgerConfig, LOCK_TIMEOUT_ENV};
pub use inventory::{InventoryEngine, InventoryError, Item};
pub use lock::LockError;
pub use model::{ModelError, ModelStore};
pub use store::{StoreError, Transaction, TransactionalStore};
