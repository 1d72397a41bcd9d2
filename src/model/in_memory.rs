//! InMemoryModelStore - typed rows, one table per collection.

use std::any::Any;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Model, ModelError, ModelStore, Versioned};

/// A committed record and the version it was written at.
struct Row {
    record: Box<dyn Any + Send + Sync>,
    version: u64,
}

impl Row {
    fn first<M: Model>(model: &M) -> Self {
        Row {
            record: Box::new(model.clone()),
            version: 1,
        }
    }

    fn read<M: Model>(&self) -> Result<Versioned<M>, ModelError> {
        let data = self
            .record
            .downcast_ref::<M>()
            .ok_or_else(|| ModelError::TypeMismatch {
                collection: M::COLLECTION.to_string(),
                expected: std::any::type_name::<M>().to_string(),
            })?;
        Ok(Versioned {
            data: data.clone(),
            version: self.version,
        })
    }

    fn replace<M: Model>(&mut self, model: &M) -> u64 {
        self.record = Box::new(model.clone());
        self.version += 1;
        self.version
    }
}

/// Rows of one collection, ordered by id.
type Table = BTreeMap<String, Row>;

/// In-memory model store.
///
/// Records are kept as the model values themselves, so reads clone instead
/// of decoding. Scans walk a single collection in id order. Clones share the
/// same tables.
#[derive(Clone, Default)]
pub struct InMemoryModelStore {
    tables: Arc<RwLock<HashMap<&'static str, Table>>>,
}

impl InMemoryModelStore {
    /// Create a new empty model store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collections holding at least one record.
    pub fn collections(&self) -> Result<usize, ModelError> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<&'static str, Table>>, ModelError> {
        self.tables
            .read()
            .map_err(|_| ModelError::Storage("record tables poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<&'static str, Table>>, ModelError> {
        self.tables
            .write()
            .map_err(|_| ModelError::Storage("record tables poisoned".into()))
    }
}

impl ModelStore for InMemoryModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        let tables = self.read()?;
        tables
            .get(M::COLLECTION)
            .and_then(|table| table.get(id))
            .map(Row::read::<M>)
            .transpose()
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        let mut tables = self.write()?;
        let table = tables.entry(M::COLLECTION).or_default();
        match table.entry(model.id().to_string()) {
            Entry::Occupied(row) => {
                Err(ModelError::conflict::<M>(model.id(), 0, row.get().version))
            }
            Entry::Vacant(slot) => {
                slot.insert(Row::first(model));
                Ok(Versioned {
                    data: model.clone(),
                    version: 1,
                })
            }
        }
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        let mut tables = self.write()?;
        let row = tables
            .get_mut(M::COLLECTION)
            .and_then(|table| table.get_mut(model.id()))
            .ok_or_else(|| ModelError::not_found::<M>(model.id()))?;

        if row.version != expected_version {
            return Err(ModelError::conflict::<M>(model.id(), expected_version, row.version));
        }
        // Surface a collection clash before overwriting the other type's row.
        row.read::<M>()?;

        let version = row.replace(model);
        Ok(Versioned {
            data: model.clone(),
            version,
        })
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        let mut tables = self.write()?;
        let Some(table) = tables.get_mut(M::COLLECTION) else {
            return Ok(false);
        };
        let removed = table.remove(id).is_some();
        if table.is_empty() {
            tables.remove(M::COLLECTION);
        }
        Ok(removed)
    }

    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError> {
        let tables = self.read()?;
        let Some(table) = tables.get(M::COLLECTION) else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        for row in table.values() {
            let versioned = row.read::<M>()?;
            if predicate(&versioned.data) {
                results.push(versioned);
            }
        }
        Ok(results)
    }
}
