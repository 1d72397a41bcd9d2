//! Per-key exclusive locks.
//!
//! A [`LockManager`] hands out one [`Lock`] per key. Callers normally go
//! through [`LockGuard::acquire`], which waits up to a timeout and releases
//! the lock when the guard is dropped, so no exit path can leak a held lock.

mod error;
mod guard;
mod in_memory;
mod lock;
mod lock_manager;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::Lock;
pub use lock_manager::LockManager;
