//! Memory Store Module
//!
//! The in-memory key/value engine: versioned entries, write-once keys and
//! version-checked expiration, all behind a single lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{Result, StorageError};
use crate::storage::{Entry, ExpiryScheduler, StoreStats, Value, TTL_ABSENT};

// == Store State ==
/// Everything guarded by the store lock.
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, Entry>,
    last_version: u64,
    stats: StoreStats,
}

impl StoreState {
    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    // Every critical section leaves the map consistent, so a panic elsewhere
    // does not invalidate it.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes `key` if its entry still carries `version`.
fn expire_entry(state: &Mutex<StoreState>, key: &str, version: u64) -> bool {
    let mut state = lock(state);
    match state.entries.get(key) {
        Some(entry) if entry.version() == version => {
            state.entries.remove(key);
            state.stats.record_expiration();
            true
        }
        _ => false,
    }
}

// == Memory Store ==
/// Thread-safe in-memory store. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    scheduler: ExpiryScheduler,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store and starts its expiration scheduler.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(StoreState::default()));
        let weak = Arc::downgrade(&state);
        let scheduler = ExpiryScheduler::spawn(move |key, version| match weak.upgrade() {
            Some(state) => expire_entry(&state, key, version),
            None => false,
        });

        Self { state, scheduler }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock(&self.state)
    }

    // == Set ==
    /// Stores a mutable entry. `ttl_secs <= 0` means it never expires.
    ///
    /// Returns false, leaving the store untouched, when the key holds an
    /// immutable entry.
    pub fn set(&self, key: &str, value: Value, ttl_secs: i64) -> bool {
        self.save(key, value, ttl_secs, false)
    }

    // == Set Immutable ==
    /// Stores a write-once entry. Later writes to the key are dropped until
    /// the entry is removed or expires.
    pub fn set_immutable(&self, key: &str, value: Value, ttl_secs: i64) -> bool {
        self.save(key, value, ttl_secs, true)
    }

    fn save(&self, key: &str, value: Value, ttl_secs: i64, immutable: bool) -> bool {
        let mut state = self.lock();
        let existing = state
            .entries
            .get(key)
            .map(|entry| (entry.is_immutable(), entry.deadline().is_some()));
        let had_deadline = match existing {
            Some((true, _)) => {
                state.stats.record_rejected_write();
                debug!(key, "Write to immutable key dropped");
                return false;
            }
            Some((false, had_deadline)) => had_deadline,
            None => false,
        };
        self.install(&mut state, key, value, ttl_secs, immutable, had_deadline);
        true
    }

    // == Refresh ==
    /// Restarts the expiry of an existing mutable entry with a new TTL,
    /// keeping its value. Absent and immutable keys are left alone.
    pub fn refresh(&self, key: &str, ttl_secs: i64) -> bool {
        let mut state = self.lock();
        let (value, had_deadline) = match state.entries.get(key) {
            Some(entry) if !entry.is_immutable() => {
                (entry.raw_value().clone(), entry.deadline().is_some())
            }
            _ => return false,
        };
        self.install(&mut state, key, value, ttl_secs, false, had_deadline);
        true
    }

    /// Writes a new entry version and schedules (or cancels) its expiration.
    /// Runs under the lock so the scheduler sees commands in write order.
    fn install(
        &self,
        state: &mut StoreState,
        key: &str,
        value: Value,
        ttl_secs: i64,
        immutable: bool,
        had_deadline: bool,
    ) {
        let version = state.next_version();
        let entry = Entry::new(value, ttl_secs, immutable, version);

        match entry.deadline() {
            Some(deadline) => self.scheduler.schedule(key, version, deadline),
            None if had_deadline => self.scheduler.cancel(key),
            None => {}
        }

        state.entries.insert(key.to_string(), entry);
        state.stats.record_write();
    }

    // == Get ==
    /// Returns the value stored under `key`.
    ///
    /// Immutable lists and maps come back as a fresh container; everything
    /// else is the stored value itself.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut state = self.lock();
        let value = state.entries.get(key).map(Entry::value);
        match value {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        value
    }

    // == Get String ==
    /// Returns the string stored under `key`, or an empty string when the key
    /// is absent or holds another type.
    ///
    /// An absent key and a stored empty string are indistinguishable here;
    /// use [`MemoryStore::get`] when that matters.
    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        }
    }

    // == Get Int ==
    /// Returns the integer stored under `key`, parsing string values as
    /// base-10. Absent keys and other types are errors.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        let not_an_integer = |found: String| StorageError::NotAnInteger {
            key: key.to_string(),
            found,
        };

        match self.get(key) {
            Some(Value::Int(i)) => Ok(i),
            Some(Value::String(s)) => s.parse().map_err(|_| not_an_integer(format!("{s:?}"))),
            Some(other) => Err(not_an_integer(other.type_name().to_string())),
            None => Err(not_an_integer("nothing".to_string())),
        }
    }

    // == TTL ==
    /// Remaining whole seconds before `key` expires, or [`TTL_ABSENT`] when
    /// it is not stored. Entries without a deadline report 0.
    pub fn ttl(&self, key: &str) -> i64 {
        self.lock()
            .entries
            .get(key)
            .map_or(TTL_ABSENT, Entry::ttl_remaining)
    }

    // == Remove ==
    /// Deletes `key`, reporting whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        let mut state = self.lock();
        match state.entries.remove(key) {
            Some(entry) => {
                if entry.deadline().is_some() {
                    self.scheduler.cancel(key);
                }
                state.stats.record_removals(1);
                true
            }
            None => false,
        }
    }

    // == Reset ==
    /// Deletes every entry and every pending expiration.
    pub fn reset(&self) {
        let mut state = self.lock();
        let count = state.entries.len();
        state.entries.clear();
        state.stats.record_removals(count);
        self.scheduler.cancel_all();
        debug!(count, "Store reset");
    }

    // == Length ==
    /// Number of stored entries, including ones past their deadline whose
    /// expiration has not run yet.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // == Visit ==
    /// Calls `visitor` with every key and its stored value, in no particular
    /// order.
    ///
    /// The visitor runs on a snapshot taken under the lock, so it may call
    /// back into the store; such changes are not reflected in the visit.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &Value),
    {
        let snapshot: Vec<(String, Value)> = self
            .lock()
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.raw_value().clone()))
            .collect();

        for (key, value) in &snapshot {
            visitor(key, value);
        }
    }

    // == Stats ==
    pub fn stats(&self) -> StoreStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    /// Number of expirations waiting in the scheduler.
    pub fn pending_expirations(&self) -> usize {
        self.scheduler.pending()
    }

    /// Runs the expiration check for `key` at `version` immediately.
    #[cfg(test)]
    fn expire(&self, key: &str, version: u64) -> bool {
        expire_entry(&self.state, key, version)
    }

    #[cfg(test)]
    fn version_of(&self, key: &str) -> Option<u64> {
        self.lock().entries.get(key).map(Entry::version)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
