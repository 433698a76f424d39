//! Store Statistics Module
//!
//! Tracks read hits and misses, writes, and how entries leave the store.

use serde::Serialize;

// == Store Stats ==
/// Counters maintained by the in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Reads that found an entry
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Writes that installed a new entry version
    pub writes: u64,
    /// Writes dropped because the key holds an immutable entry
    pub rejected_writes: u64,
    /// Entries removed by their expiration task
    pub expirations: u64,
    /// Entries removed explicitly or by a reset
    pub removals: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_rejected_write(&mut self) {
        self.rejected_writes += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_removals(&mut self, count: usize) {
        self.removals += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
