use std::time::Duration;

use super::LockError;

/// Trait for a single lock instance.
///
/// Implementations provide blocking lock, timed lock, non-blocking try-lock,
/// and unlock. The in-memory lock uses `Mutex` + `Condvar`; a database-backed
/// store would map these onto row locks (`SELECT ... FOR UPDATE`).
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Acquire the lock, waiting at most `timeout`.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if the wait ran out.
    fn lock_timeout(&self, timeout: Duration) -> Result<bool, LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}
