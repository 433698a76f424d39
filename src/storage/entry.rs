//! Entry Module
//!
//! Defines the record stored for each key: value, deadline, write-once flag
//! and version stamp.

use std::time::Duration;

use tokio::time::Instant;

use crate::storage::{Snapshot, Value};

/// Longest TTL honoured; larger ones are clamped to it (about a century).
pub const MAX_TTL_SECS: i64 = 100 * 365 * 24 * 60 * 60;

// == Entry ==
/// A single stored record.
///
/// Entries are never modified in place; every write builds a new one with a
/// fresh version.
#[derive(Debug, Clone)]
pub struct Entry {
    value: Value,
    /// Absolute expiry instant, None = never expires
    deadline: Option<Instant>,
    immutable: bool,
    version: u64,
}

impl Entry {
    // == Constructor ==
    /// Creates an entry expiring `ttl_secs` from now.
    ///
    /// A TTL of zero or less yields an entry without a deadline. TTLs above
    /// [`MAX_TTL_SECS`] are clamped.
    pub fn new(value: Value, ttl_secs: i64, immutable: bool, version: u64) -> Self {
        let deadline = u64::try_from(ttl_secs.min(MAX_TTL_SECS))
            .ok()
            .filter(|secs| *secs > 0)
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        Self {
            value,
            deadline,
            immutable,
            version,
        }
    }

    // == Value ==
    /// Returns the value as handed to readers.
    ///
    /// Immutable entries return a [`Snapshot`], so callers cannot reach the
    /// stored container. Mutable entries return the stored value itself.
    pub fn value(&self) -> Value {
        if self.immutable {
            self.value.snapshot()
        } else {
            self.value.clone()
        }
    }

    /// Returns the stored value without copying.
    pub fn raw_value(&self) -> &Value {
        &self.value
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    // == Time To Live ==
    /// Remaining whole seconds until the deadline, rounded up.
    ///
    /// Returns 0 for entries without a deadline and for entries whose deadline
    /// has already passed.
    pub fn ttl_remaining(&self) -> i64 {
        let Some(deadline) = self.deadline else {
            return 0;
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        i64::try_from(secs).unwrap_or(i64::MAX)
    }
}
