//! Driver Module
//!
//! The contract the rest of the system stores tokens and sessions through,
//! the registry that selects an implementation by name, and the built-in
//! in-memory implementation.

mod memory;
mod options;
mod registry;

pub use memory::MemoryDriver;
pub use options::Options;
pub use registry::{Registry, MEMORY_DRIVER};

use crate::error::Result;
use crate::storage::{StoreStats, Value};

// == Driver ==
/// A pluggable storage backend.
///
/// TTLs are in seconds; zero or less means the entry never expires.
pub trait Driver: Send + Sync {
    /// Prepares the backend. Called once by [`Registry::new_manager`].
    fn initialize(&self, options: &Options) -> Result<()>;

    /// Reads a value; `Ok(None)` when the key is absent or expired.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Reads an integer, parsing string values as base-10.
    fn read_int(&self, key: &str) -> Result<i64>;

    /// Reads a string, or an empty string when absent or of another type.
    fn read_string(&self, key: &str) -> String;

    /// Writes an overwritable entry.
    fn write(&self, key: &str, value: Value, ttl_secs: i64);

    /// Writes a write-once entry. Writes to a key holding one are dropped.
    fn write_immutable(&self, key: &str, value: Value, ttl_secs: i64);

    /// Restarts the expiry of an existing mutable entry. Returns whether an
    /// entry was refreshed.
    fn upgrade(&self, key: &str, ttl_secs: i64) -> bool;

    /// Remaining seconds before `key` expires, or -1 when absent.
    fn ttl(&self, key: &str) -> i64;

    /// Usage counters, for backends that keep them.
    fn stats(&self) -> Option<StoreStats> {
        None
    }
}
