//! Inventory transaction engine.
//!
//! The engine is the only writer of `Item::quantity` after creation. Each
//! purchase or restock runs inside one row-locked transaction, so the
//! read-check-write sequence for an item is totally ordered and a unit can
//! never be sold twice.

mod engine;
mod error;
mod item;

pub use engine::InventoryEngine;
pub use error::InventoryError;
pub use item::Item;
