use tracing::debug;

use super::StoreError;
use crate::lock::{LockGuard, LockManager};
use crate::model::{Model, ModelError, ModelStore, Versioned};

/// An exclusive read-modify-write scope over one record.
///
/// Obtained from `TransactionalStore::get_for_update`. While it lives, every
/// other `get_for_update` on the same record waits. Changes are staged with
/// [`update`](Self::update) and become visible only at
/// [`commit`](Self::commit). Dropping the transaction without committing
/// discards the staged changes and releases the lock.
pub struct Transaction<'a, S, L: LockManager, M> {
    models: &'a S,
    guard: LockGuard<'a, L>,
    locked: Versioned<M>,
    staged: Option<M>,
}

impl<'a, S: ModelStore, L: LockManager, M: Model> Transaction<'a, S, L, M> {
    pub(super) fn new(models: &'a S, guard: LockGuard<'a, L>, locked: Versioned<M>) -> Self {
        Self {
            models,
            guard,
            locked,
            staged: None,
        }
    }

    pub fn id(&self) -> &str {
        self.locked.data.id()
    }

    /// The record as this transaction currently sees it, staged changes included.
    pub fn current(&self) -> &M {
        self.staged.as_ref().unwrap_or(&self.locked.data)
    }

    /// Version of the committed record the lock was taken on.
    pub fn version(&self) -> u64 {
        self.locked.version
    }

    pub fn is_dirty(&self) -> bool {
        self.staged.is_some()
    }

    /// Stage a change. Repeated calls build on each other.
    pub fn update<F>(&mut self, change: F)
    where
        F: FnOnce(&mut M),
    {
        let mut next = self
            .staged
            .take()
            .unwrap_or_else(|| self.locked.data.clone());
        change(&mut next);
        self.staged = Some(next);
    }

    /// Write the staged record and release the lock.
    ///
    /// With nothing staged this writes nothing and returns the locked record.
    /// On a write failure nothing is persisted and the lock is still released.
    pub fn commit(self) -> Result<M, StoreError> {
        let Transaction {
            models,
            guard,
            locked,
            staged,
        } = self;

        let Some(next) = staged else {
            debug!(key = %guard.key(), "commit with no staged changes");
            return Ok(locked.data);
        };

        if next.id() != locked.data.id() {
            return Err(StoreError::KeyChanged {
                locked: guard.key().to_string(),
                staged: M::key_for(next.id()),
            });
        }

        let committed = models.update_model(&next, locked.version)?;
        debug!(key = %guard.key(), version = committed.version, "transaction committed");
        Ok(committed.data)
    }

    /// Remove the record and release the lock.
    pub fn delete(self) -> Result<(), StoreError> {
        let id = self.id().to_string();
        if !self.models.delete_model::<M>(&id)? {
            return Err(ModelError::not_found::<M>(&id).into());
        }
        debug!(key = %self.guard.key(), "record deleted");
        Ok(())
    }

    /// Discard staged changes and release the lock.
    pub fn abort(self) {
        debug!(key = %self.guard.key(), dirty = self.is_dirty(), "transaction aborted");
    }
}
