//! Models - records kept in a versioned, per-collection store.
//!
//! Every record lives in its model's collection under its id and carries a
//! version that the store bumps on each write. Updates name the version they expect, so a
//! writer that skipped the row lock is caught instead of silently winning.

mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name for this model type (e.g. "items").
    /// Maps to a table in SQL, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;

    /// The lock key for a record of this type.
    fn key_for(id: &str) -> String {
        format!("{}:{}", Self::COLLECTION, id)
    }
}

/// A versioned wrapper around model data for optimistic concurrency control.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The stored version differs from the one the writer read.
    #[error("concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// The collection holds records of another model type.
    #[error("collection {collection} does not hold {expected} records")]
    TypeMismatch { collection: String, expected: String },
    /// Storage-level error.
    #[error("model storage error: {0}")]
    Storage(String),
    /// Model not found.
    #[error("model not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
}

impl ModelError {
    pub(crate) fn conflict<M: Model>(id: &str, expected: u64, actual: u64) -> Self {
        ModelError::ConcurrencyConflict {
            collection: M::COLLECTION.to_string(),
            id: id.to_string(),
            expected,
            actual,
        }
    }

    pub(crate) fn not_found<M: Model>(id: &str) -> Self {
        ModelError::NotFound {
            collection: M::COLLECTION.to_string(),
            id: id.to_string(),
        }
    }
}

pub use in_memory::InMemoryModelStore;
pub use store::ModelStore;
