//! Storage Module
//!
//! In-memory key/value engine with TTL expiration, write-once entries and
//! copy-on-read isolation for immutable composite values.

mod entry;
mod scheduler;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::{Entry, MAX_TTL_SECS};
pub use scheduler::ExpiryScheduler;
pub use stats::StoreStats;
pub use store::MemoryStore;
pub use value::{Snapshot, Value};

// == Public Constants ==
/// TTL reported for keys that are not stored
pub const TTL_ABSENT: i64 = -1;
