//! Driver registry
//!
//! Maps driver names to implementations. Built once at startup, then shared
//! read-only with whatever needs to resolve a driver.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::driver::{Driver, MemoryDriver, Options};
use crate::error::{Result, StorageError};

/// Name the built-in in-memory driver is registered under
pub const MEMORY_DRIVER: &str = "memory";

/// Short alias for [`MEMORY_DRIVER`]
const MEMORY_DRIVER_ALIAS: &str = "mem";

// == Registry ==
/// Registry of available storage drivers.
#[derive(Clone, Default)]
pub struct Registry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the in-memory driver under `"memory"` and
    /// `"mem"`.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn with_builtin_drivers() -> Self {
        let mut registry = Self::new();
        let memory: Arc<dyn Driver> = Arc::new(MemoryDriver::new());
        registry.register(MEMORY_DRIVER, memory.clone());
        registry.register(MEMORY_DRIVER_ALIAS, memory);
        registry
    }

    // == Register ==
    /// Registers `driver` under `name`.
    ///
    /// # Panics
    /// Registering a name twice is a startup bug and panics. Use
    /// [`Registry::try_register`] to handle it instead.
    pub fn register(&mut self, name: &str, driver: Arc<dyn Driver>) {
        if let Err(err) = self.try_register(name, driver) {
            error!(driver = name, "Driver registration failed");
            panic!("{err}");
        }
    }

    /// Registers `driver` under `name`, failing if the name is taken.
    pub fn try_register(&mut self, name: &str, driver: Arc<dyn Driver>) -> Result<()> {
        if self.drivers.contains_key(name) {
            return Err(StorageError::DuplicateDriver(name.to_string()));
        }
        self.drivers.insert(name.to_string(), driver);
        info!(driver = name, "Storage driver registered");
        Ok(())
    }

    // == New Manager ==
    /// Looks up `name`, initializes it with `options` and returns it ready
    /// for use.
    pub fn new_manager(&self, name: &str, options: &Options) -> Result<Arc<dyn Driver>> {
        let driver = self
            .drivers
            .get(name)
            .ok_or_else(|| StorageError::UnknownDriver(name.to_string()))?;

        driver
            .initialize(options)
            .map_err(|source| StorageError::DriverInit {
                name: name.to_string(),
                source: Box::new(source),
            })?;

        info!(driver = name, "Storage driver initialized");
        Ok(driver.clone())
    }

    /// Check if a driver is registered
    pub fn has_driver(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Registered driver names, sorted
    pub fn driver_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    /// Driver whose initializer always fails.
    struct BrokenDriver;

    impl Driver for BrokenDriver {
        fn initialize(&self, _options: &Options) -> Result<()> {
            Err(StorageError::Backend("connection refused".to_string()))
        }
        fn read(&self, _key: &str) -> Result<Option<Value>> {
            Ok(None)
        }
        fn read_int(&self, key: &str) -> Result<i64> {
            Err(StorageError::NotFound(key.to_string()))
        }
        fn read_string(&self, _key: &str) -> String {
            String::new()
        }
        fn write(&self, _key: &str, _value: Value, _ttl_secs: i64) {}
        fn write_immutable(&self, _key: &str, _value: Value, _ttl_secs: i64) {}
        fn upgrade(&self, _key: &str, _ttl_secs: i64) -> bool {
            false
        }
        fn ttl(&self, _key: &str) -> i64 {
            -1
        }
    }

    #[tokio::test]
    async fn test_builtin_drivers() {
        let registry = Registry::with_builtin_drivers();

        assert!(registry.has_driver("memory"));
        assert!(registry.has_driver("mem"));
        assert_eq!(registry.driver_names(), vec!["mem", "memory"]);
    }

    #[tokio::test]
    async fn test_aliases_share_one_driver() {
        let registry = Registry::with_builtin_drivers();
        let options = Options::default();

        let a = registry.new_manager("memory", &options).unwrap();
        let b = registry.new_manager("mem", &options).unwrap();

        a.write("k", Value::from("v"), 0);
        assert_eq!(b.read_string("k"), "v");
    }

    #[tokio::test]
    #[should_panic(expected = "register called twice")]
    async fn test_register_twice_panics() {
        let mut registry = Registry::new();
        registry.register("mem", Arc::new(MemoryDriver::new()));
        registry.register("mem", Arc::new(MemoryDriver::new()));
    }

    #[tokio::test]
    async fn test_try_register_twice() {
        let mut registry = Registry::new();
        registry
            .try_register("mem", Arc::new(MemoryDriver::new()))
            .unwrap();

        let result = registry.try_register("mem", Arc::new(MemoryDriver::new()));
        assert!(matches!(result, Err(StorageError::DuplicateDriver(name)) if name == "mem"));
    }

    #[test]
    fn test_unknown_driver() {
        let registry = Registry::new();

        let result = registry.new_manager("missing", &Options::default());
        assert!(matches!(result, Err(StorageError::UnknownDriver(name)) if name == "missing"));
    }

    #[test]
    fn test_failing_initializer() {
        let mut registry = Registry::new();
        registry.register("broken", Arc::new(BrokenDriver));

        let result = registry.new_manager("broken", &Options::default());
        match result {
            Err(StorageError::DriverInit { name, source }) => {
                assert_eq!(name, "broken");
                assert!(matches!(*source, StorageError::Backend(_)));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("broken driver must not be returned"),
        }
    }
}
