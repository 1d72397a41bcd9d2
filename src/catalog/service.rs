use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::dto::{normalized_price, required_text};
use super::{CatalogError, ItemPatch, ItemQuery, NewItem};
use crate::config::LedgerConfig;
use crate::inventory::{InventoryEngine, Item};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::model::{InMemoryModelStore, ModelStore};
use crate::store::TransactionalStore;

/// Item catalog backed by a [`TransactionalStore`].
///
/// Reads (`get`, `list`, `search`) never lock. Writes to an existing item
/// take its row lock: records are stored whole, so an unlocked rename could
/// otherwise write back a stale quantity over a concurrent purchase.
pub struct CatalogService<S = InMemoryModelStore, L = InMemoryLockManager> {
    store: TransactionalStore<S, L>,
    engine: InventoryEngine<S, L>,
}

impl CatalogService {
    pub fn in_memory(config: &LedgerConfig) -> Self {
        Self::new(TransactionalStore::in_memory(config))
    }
}

impl<S: Clone, L> Clone for CatalogService<S, L> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<S: ModelStore + Clone, L: LockManager> CatalogService<S, L> {
    pub fn new(store: TransactionalStore<S, L>) -> Self {
        Self {
            engine: InventoryEngine::new(store.clone()),
            store,
        }
    }

    pub fn engine(&self) -> &InventoryEngine<S, L> {
        &self.engine
    }

    #[instrument(skip(self, new_item), fields(name = %new_item.name))]
    pub fn create(&self, new_item: NewItem) -> Result<Item, CatalogError> {
        let item = Item::new(
            Uuid::new_v4().to_string(),
            required_text("name", &new_item.name)?,
            required_text("category", &new_item.category)?,
            normalized_price(new_item.price)?,
            new_item.quantity,
        );
        let item = self.store.insert(&item)?;
        info!(item_id = %item.id, quantity = item.quantity, "item created");
        Ok(item)
    }

    pub fn get(&self, id: &str) -> Result<Option<Item>, CatalogError> {
        Ok(self.store.get::<Item>(id)?)
    }

    /// All items, ordered by name then id.
    pub fn list(&self) -> Result<Vec<Item>, CatalogError> {
        let mut items = self.store.find::<Item, _>(|_| true)?;
        sort_items(&mut items);
        Ok(items)
    }

    #[instrument(skip(self))]
    pub fn search(&self, query: &ItemQuery) -> Result<Vec<Item>, CatalogError> {
        query.validate()?;
        let mut items = self.store.find::<Item, _>(|item| query.matches(item))?;
        sort_items(&mut items);
        debug!(hits = items.len(), "search finished");
        Ok(items)
    }

    /// Change name, category or price. Quantity is left as committed.
    #[instrument(skip(self))]
    pub fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, CatalogError> {
        let name = patch
            .name
            .as_deref()
            .map(|name| required_text("name", name))
            .transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(|category| required_text("category", category))
            .transpose()?;
        let price = patch.price.map(normalized_price).transpose()?;

        let mut tx = self
            .store
            .get_for_update::<Item>(id)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if !patch.is_empty() {
            tx.update(|item| {
                if let Some(name) = name {
                    item.name = name;
                }
                if let Some(category) = category {
                    item.category = category;
                }
                if let Some(price) = price {
                    item.price = price;
                }
                item.touch();
            });
        }
        let item = tx.commit()?;
        info!("item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let tx = self
            .store
            .get_for_update::<Item>(id)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        tx.delete()?;
        info!("item deleted");
        Ok(())
    }

    /// Sell one unit. See [`InventoryEngine::purchase`].
    pub fn purchase(&self, id: &str) -> Result<Item, CatalogError> {
        Ok(self.engine.purchase(id)?)
    }

    /// Add stock. See [`InventoryEngine::restock`].
    pub fn restock(&self, id: &str, amount: i64) -> Result<Item, CatalogError> {
        Ok(self.engine.restock(id, amount)?)
    }
}

fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
