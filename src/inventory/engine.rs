use tracing::{error, info, instrument, warn};

use super::{InventoryError, Item};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::model::{InMemoryModelStore, ModelStore};
use crate::store::{StoreError, TransactionalStore};

/// Serializes purchases and restocks per item.
///
/// Both operations run as `lock → read → check → write → commit` inside one
/// [`Transaction`](crate::store::Transaction). Business rejections abort the
/// transaction rather than committing a no-op, so every exit path ends the
/// same way: lock released, nothing half-written.
pub struct InventoryEngine<S = InMemoryModelStore, L = InMemoryLockManager> {
    store: TransactionalStore<S, L>,
}

impl<S: Clone, L> Clone for InventoryEngine<S, L> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: ModelStore, L: LockManager> InventoryEngine<S, L> {
    pub fn new(store: TransactionalStore<S, L>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TransactionalStore<S, L> {
        &self.store
    }

    /// Sell one unit of `item_id`.
    ///
    /// Returns the item as committed, with the decremented quantity.
    ///
    /// # Errors
    /// `ItemNotFound` when no such item exists (checked before stock),
    /// `OutOfStock` when its quantity is zero, `Transaction` when the store
    /// fails or the row lock cannot be obtained in time.
    #[instrument(skip(self))]
    pub fn purchase(&self, item_id: &str) -> Result<Item, InventoryError> {
        let Some(mut tx) = self
            .store
            .get_for_update::<Item>(item_id)
            .map_err(|err| transaction_failed(item_id, err))?
        else {
            return Err(InventoryError::ItemNotFound(item_id.to_string()));
        };

        if !tx.current().in_stock() {
            tx.abort();
            warn!("purchase rejected, out of stock");
            return Err(InventoryError::OutOfStock(item_id.to_string()));
        }

        tx.update(|item| {
            item.quantity -= 1;
            item.touch();
        });
        let item = tx
            .commit()
            .map_err(|err| transaction_failed(item_id, err))?;

        info!(quantity = item.quantity, "purchase committed");
        Ok(item)
    }

    /// Add `amount` units to `item_id`.
    ///
    /// Uses the same locked path as [`purchase`](Self::purchase), so
    /// concurrent restocks never lose each other's increments.
    ///
    /// # Errors
    /// `InvalidAmount` when `amount` is not positive (checked first, before
    /// the item is looked up) or would overflow the counter, `ItemNotFound`
    /// when no such item exists, `Transaction` on store or lock failure.
    #[instrument(skip(self))]
    pub fn restock(&self, item_id: &str, amount: i64) -> Result<Item, InventoryError> {
        if amount <= 0 {
            warn!("restock rejected, amount must be positive");
            return Err(InventoryError::InvalidAmount(amount));
        }

        let Some(mut tx) = self
            .store
            .get_for_update::<Item>(item_id)
            .map_err(|err| transaction_failed(item_id, err))?
        else {
            return Err(InventoryError::ItemNotFound(item_id.to_string()));
        };

        let current = tx.current().quantity;
        let Some(next) = u32::try_from(amount)
            .ok()
            .and_then(|amount| current.checked_add(amount))
        else {
            tx.abort();
            warn!(current, "restock rejected, quantity would overflow");
            return Err(InventoryError::InvalidAmount(amount));
        };

        tx.update(|item| {
            item.quantity = next;
            item.touch();
        });
        let item = tx
            .commit()
            .map_err(|err| transaction_failed(item_id, err))?;

        info!(quantity = item.quantity, "restock committed");
        Ok(item)
    }
}

fn transaction_failed(item_id: &str, err: StoreError) -> InventoryError {
    if err.is_transient() {
        warn!(item_id, error = %err, "inventory transaction gave up waiting for lock");
    } else {
        error!(item_id, error = %err, "inventory transaction failed");
    }
    InventoryError::Transaction(err)
}
