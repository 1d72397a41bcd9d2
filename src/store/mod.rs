//! Transactional record store: a model store plus a per-record lock table.
//!
//! Plain reads ([`TransactionalStore::get`], [`TransactionalStore::find`])
//! never lock and may observe data an in-flight transaction is about to
//! replace. [`TransactionalStore::get_for_update`] takes the record's lock
//! and hands back a [`Transaction`]; the lock is held until that transaction
//! commits, aborts or is dropped.

mod error;
mod transaction;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::LedgerConfig;
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::model::{InMemoryModelStore, Model, ModelStore};

pub use error::StoreError;
pub use transaction::Transaction;

pub struct TransactionalStore<S = InMemoryModelStore, L = InMemoryLockManager> {
    models: S,
    locks: Arc<L>,
    lock_timeout: Duration,
}

impl<S: Clone, L> Clone for TransactionalStore<S, L> {
    fn clone(&self) -> Self {
        Self {
            models: self.models.clone(),
            locks: Arc::clone(&self.locks),
            lock_timeout: self.lock_timeout,
        }
    }
}

impl TransactionalStore {
    /// A store backed by in-memory records and locks.
    pub fn in_memory(config: &LedgerConfig) -> Self {
        Self::new(InMemoryModelStore::new(), InMemoryLockManager::new(), config)
    }
}

impl<S: ModelStore, L: LockManager> TransactionalStore<S, L> {
    pub fn new(models: S, locks: L, config: &LedgerConfig) -> Self {
        Self {
            models,
            locks: Arc::new(locks),
            lock_timeout: config.lock_timeout,
        }
    }

    /// Access the underlying model store.
    pub fn models(&self) -> &S {
        &self.models
    }

    #[cfg(test)]
    pub(crate) fn locks(&self) -> &L {
        &self.locks
    }

    /// Read the committed record without locking.
    pub fn get<M: Model>(&self, id: &str) -> Result<Option<M>, StoreError> {
        Ok(self.models.get_model::<M>(id)?.map(|v| v.data))
    }

    /// Scan committed records without locking.
    pub fn find<M, F>(&self, predicate: F) -> Result<Vec<M>, StoreError>
    where
        M: Model,
        F: Fn(&M) -> bool,
    {
        Ok(self
            .models
            .find_models::<M>(&predicate)?
            .into_iter()
            .map(|v| v.data)
            .collect())
    }

    /// Create a record. Fails if the id is taken.
    pub fn insert<M: Model>(&self, model: &M) -> Result<M, StoreError> {
        Ok(self.models.insert_model(model)?.data)
    }

    /// Lock a record and open a transaction on it.
    ///
    /// Returns `Ok(None)` for a missing record, holding no lock. Blocks while
    /// another transaction holds the same record, for at most the configured
    /// lock timeout.
    pub fn get_for_update<M: Model>(
        &self,
        id: &str,
    ) -> Result<Option<Transaction<'_, S, L, M>>, StoreError> {
        let key = M::key_for(id);

        // Unlocked existence check: absent ids never touch the lock table.
        if self.models.get_model::<M>(id)?.is_none() {
            debug!(%key, "no record to lock");
            return Ok(None);
        }

        let guard = LockGuard::acquire(&*self.locks, &key, self.lock_timeout)?;

        // Re-read under the lock: the first read may predate a commit or a delete.
        match self.models.get_model::<M>(id)? {
            Some(locked) => Ok(Some(Transaction::new(&self.models, guard, locked))),
            None => {
                debug!(%key, "record deleted while waiting for lock");
                Ok(None)
            }
        }
    }
}
