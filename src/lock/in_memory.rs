use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{Lock, LockError, LockManager};

/// In-memory lock backed by `Mutex<bool>` + `Condvar`.
pub struct InMemoryLock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    /// Whether some holder currently owns the lock.
    pub fn is_locked(&self) -> Result<bool, LockError> {
        let locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        Ok(*locked)
    }
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
        }
        *locked = true;
        Ok(())
    }

    fn lock_timeout(&self, timeout: Duration) -> Result<bool, LockError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.lock()?;
            return Ok(true);
        };
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        while *locked {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            // Spurious wakeups and lost races just loop back to the check.
            let (guard, _) = self
                .wake
                .wait_timeout(locked, remaining)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
            locked = guard;
        }
        *locked = true;
        Ok(true)
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
        Ok(())
    }
}

/// In-memory lock manager backed by a `HashMap<String, Arc<InMemoryLock>>`.
///
/// Lazily creates one `InMemoryLock` per unique key and returns the same
/// `Arc` for repeated lookups. An entry is evicted on release or discard when
/// the map and the caller hold the only two handles and the lock is free.
/// Handles are only cloned out under the map mutex, so no waiter can be
/// holding an evicted lock.
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Number of keys with a live lock entry.
    pub fn len(&self) -> Result<usize, LockError> {
        Ok(self.table()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LockError> {
        Ok(self.len()? == 0)
    }

    fn table(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<InMemoryLock>>>, LockError> {
        self.locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))
    }

    fn evict_if_idle(
        locks: &mut HashMap<String, Arc<InMemoryLock>>,
        key: &str,
        lock: &Arc<InMemoryLock>,
    ) -> Result<(), LockError> {
        let ours = locks.get(key).is_some_and(|entry| Arc::ptr_eq(entry, lock));
        if ours && Arc::strong_count(lock) == 2 && !lock.is_locked()? {
            locks.remove(key);
        }
        Ok(())
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, key: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self.table()?;
        Ok(locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(InMemoryLock::new()))
            .clone())
    }

    fn release(&self, key: &str, lock: &Arc<InMemoryLock>) -> Result<(), LockError> {
        // A poisoned map must not keep the row locked.
        let table = self.table();
        lock.unlock()?;
        let mut locks = table?;
        Self::evict_if_idle(&mut locks, key, lock)
    }

    fn discard(&self, key: &str, lock: &Arc<InMemoryLock>) -> Result<(), LockError> {
        let mut locks = self.table()?;
        Self::evict_if_idle(&mut locks, key, lock)
    }
}
