//! Memory Driver
//!
//! Exposes a [`MemoryStore`] through the [`Driver`] contract.

use tracing::debug;

use crate::driver::{Driver, Options};
use crate::error::Result;
use crate::storage::{MemoryStore, StoreStats, Value};

// == Memory Driver ==
/// The built-in volatile driver. All [`Options`] are ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    store: MemoryStore,
}

impl MemoryDriver {
    /// Creates a driver over a new empty store.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self { store }
    }

    /// The underlying store, for operations outside the driver contract.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl Driver for MemoryDriver {
    fn initialize(&self, options: &Options) -> Result<()> {
        debug!(?options, "Memory driver ignores its options");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.store.get(key))
    }

    fn read_int(&self, key: &str) -> Result<i64> {
        self.store.get_int(key)
    }

    fn read_string(&self, key: &str) -> String {
        self.store.get_string(key)
    }

    fn write(&self, key: &str, value: Value, ttl_secs: i64) {
        self.store.set(key, value, ttl_secs);
    }

    fn write_immutable(&self, key: &str, value: Value, ttl_secs: i64) {
        self.store.set_immutable(key, value, ttl_secs);
    }

    fn upgrade(&self, key: &str, ttl_secs: i64) -> bool {
        self.store.refresh(key, ttl_secs)
    }

    fn ttl(&self, key: &str) -> i64 {
        self.store.ttl(key)
    }

    fn stats(&self) -> Option<StoreStats> {
        Some(self.store.stats())
    }
}
