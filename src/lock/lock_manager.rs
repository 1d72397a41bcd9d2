use std::sync::Arc;

use super::{Lock, LockError};

/// Factory trait for obtaining per-key locks.
///
/// The transactional store asks for one lock per `collection:id` key, so
/// records never contend with each other. The default
/// `InMemoryLockManager` keeps its locks in a `HashMap`.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) a lock for the given key.
    ///
    /// Repeated calls with the same `key` must return the same logical lock
    /// (i.e. the same `Arc` for in-memory) for as long as anyone still holds
    /// a handle to it.
    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Unlock a held lock obtained from [`get_lock`](Self::get_lock).
    ///
    /// Managers that create locks lazily may forget the key here once no
    /// other handle to the lock is left.
    fn release(&self, _key: &str, lock: &Arc<Self::Lock>) -> Result<(), LockError> {
        lock.unlock()
    }

    /// Hand back a lock that was looked up but never acquired.
    fn discard(&self, _key: &str, _lock: &Arc<Self::Lock>) -> Result<(), LockError> {
        Ok(())
    }
}
