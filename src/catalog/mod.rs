//! Catalog service: item CRUD and search on top of the inventory engine.
//!
//! Quantity is set once at creation; afterwards only
//! [`CatalogService::purchase`] and [`CatalogService::restock`] change it,
//! and both delegate to the [`InventoryEngine`](crate::inventory::InventoryEngine).

mod dto;
mod error;
mod query;
mod service;

pub use dto::{ItemPatch, NewItem};
pub use error::CatalogError;
pub use query::ItemQuery;
pub use service::CatalogService;
