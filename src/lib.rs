//! Tokenstore - pluggable in-process key/value storage
//!
//! Provides a driver registry, a volatile in-memory driver with TTL
//! expiration and write-once entries, and a thin HTTP surface over the
//! driver contract.

pub mod api;
pub mod config;
pub mod driver;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use config::Config;
pub use driver::{Driver, Options, Registry};
pub use error::{Result, StorageError};
pub use storage::{MemoryStore, Value};
