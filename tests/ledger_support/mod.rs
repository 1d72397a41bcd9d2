//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use stock_ledger::model::{InMemoryModelStore, Model, ModelError, ModelStore, Versioned};
use stock_ledger::{CatalogService, Item, LedgerConfig, NewItem};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. Set `RUST_LOG=debug`
/// to see lock traffic.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(lock_timeout: Duration) -> LedgerConfig {
    LedgerConfig::default().with_lock_timeout(lock_timeout)
}

pub fn catalog() -> CatalogService {
    init_tracing();
    CatalogService::in_memory(&config(Duration::from_secs(10)))
}

pub fn seed(catalog: &CatalogService, name: &str, quantity: u32) -> Item {
    catalog
        .create(NewItem::new(name, "Test", dec!(50.00), quantity))
        .unwrap()
}

pub fn quantity(catalog: &CatalogService, id: &str) -> u32 {
    catalog.get(id).unwrap().unwrap().quantity
}

/// Model store whose writes can be made to fail on demand, standing in for
/// a dropped database connection.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryModelStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(ModelError::Storage("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

impl ModelStore for FlakyStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        self.inner.get_model(id)
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.inner.insert_model(model)
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        self.check()?;
        self.inner.update_model(model, expected_version)
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        self.check()?;
        self.inner.delete_model::<M>(id)
    }

    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError> {
        self.inner.find_models(predicate)
    }
}
