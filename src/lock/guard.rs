use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{Lock, LockError, LockManager};

/// A held lock that is released when dropped.
///
/// Every code path that takes a row lock goes through this guard, so early
/// returns, `?` propagation and unwinding all release it. Release goes back
/// through the manager, which may then forget the key.
pub struct LockGuard<'a, M: LockManager + ?Sized> {
    manager: &'a M,
    lock: Arc<M::Lock>,
    key: String,
}

impl<'a, M: LockManager + ?Sized> LockGuard<'a, M> {
    /// Acquire the lock for `key`, waiting at most `timeout`.
    pub fn acquire(manager: &'a M, key: &str, timeout: Duration) -> Result<Self, LockError> {
        let lock = manager.get_lock(key)?;
        if !lock.lock_timeout(timeout)? {
            warn!(key, waited_ms = timeout.as_millis() as u64, "lock wait timed out");
            if let Err(err) = manager.discard(key, &lock) {
                warn!(key, error = %err, "failed to discard lock handle");
            }
            return Err(LockError::Timeout {
                key: key.to_string(),
                waited: timeout,
            });
        }
        debug!(key, "lock acquired");
        Ok(LockGuard {
            manager,
            lock,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<M: LockManager + ?Sized> Drop for LockGuard<'_, M> {
    fn drop(&mut self) {
        match self.manager.release(&self.key, &self.lock) {
            Ok(()) => debug!(key = %self.key, "lock released"),
            Err(err) => warn!(key = %self.key, error = %err, "failed to release lock"),
        }
    }
}
