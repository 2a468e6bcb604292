//! Cache Store Module
//!
//! Keyed TTL memory store shared by every dashboard data consumer. Expiry is
//! lazy: an expired entry is deleted the first time a read touches it, and
//! that read-triggers-delete path is the only eviction in the system. There
//! is no capacity bound and no background sweep; a caller that never
//! invalidates grows the map for the lifetime of the process, which is the
//! accepted trade for zero timer cost.
//!
//! Keys are plain strings and are not namespaced beyond caller discipline
//! (consumers prefix, e.g. `metrics-{project_id}`).

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheCounters, CacheEntry, CacheStats};
use crate::error::{AnalyticsError, Result};

// == Cache Store ==
/// TTL key-value store for dashboard data.
///
/// Missing and expired keys are indistinguishable to callers: both read as
/// absent. No operation here fails; the typed `set_json` helpers are the one
/// exception and only on serialization.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Running hit/miss counters
    counters: CacheCounters,
    /// TTL applied when the caller does not pass one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            counters: CacheCounters::new(),
            default_ttl,
        }
    }

    /// Creates a store with the stock five-minute default TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(super::DEFAULT_TTL)
    }

    // == Set ==
    /// Inserts or overwrites the entry for `key` with the default TTL,
    /// stamping the current time.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let ttl = self.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Inserts or overwrites the entry for `key` with an explicit TTL.
    ///
    /// Overwriting resets the storage timestamp. The entry is visible to
    /// every holder of the shared store from this point on.
    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: Value, ttl: Duration) {
        let key = key.into();
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Returns the stored value if present and not expired.
    ///
    /// An expired entry is deleted as a side effect and reads as absent —
    /// identical to a key that was never set.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.counters.record_expiration();
                self.counters.record_miss();
                debug!(key, "cache entry expired on access");
                None
            }
            Some(entry) => {
                self.counters.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Presence check with the same expiry side effect as `get`.
    ///
    /// Does not tick the hit/miss counters, so `is_cached`-style probes do
    /// not skew the hit rate.
    pub fn has(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.counters.record_expiration();
                debug!(key, "cache entry expired on access");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == Invalidate ==
    /// Unconditionally removes `key`. Absent keys are a no-op.
    ///
    /// Returns whether an entry was actually removed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every key containing `pattern` as a literal substring.
    ///
    /// This is a plain linear scan, not a regex. Returns the number of
    /// entries removed.
    pub fn invalidate_pattern(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(pattern, removed, "invalidated cache entries by pattern");
        }
        removed
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Stats ==
    /// Diagnostic snapshot of resident entries.
    ///
    /// Not expiry-filtered: an expired entry nobody has touched since still
    /// counts. Debugging and test assertions only.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            keys: self.entries.keys().cloned().collect(),
        }
    }

    /// Running hit/miss/expiration counters.
    pub fn counters(&self) -> &CacheCounters {
        &self.counters
    }

    // == Typed Helpers ==
    /// Serializes `value` and stores it under `key` with the default TTL.
    pub fn set_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let ttl = self.default_ttl;
        self.set_json_with_ttl(key, value, ttl)
    }

    /// Serializes `value` and stores it under `key` with an explicit TTL.
    pub fn set_json_with_ttl<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let json = serde_json::to_value(value)
            .map_err(|e| AnalyticsError::Internal(format!("cache serialization failed: {e}")))?;
        self.set_with_ttl(key, json, ttl);
        Ok(())
    }

    /// Reads and deserializes the value under `key`.
    ///
    /// An entry that no longer matches the requested shape is treated as a
    /// miss (logged at warn), so a stale layout of cached data degrades to a
    /// refetch instead of an error.
    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(key, error = %e, "cached value failed to deserialize, treating as miss");
                None
            }
        }
    }

    // == Length ==
    /// Current number of resident entries (expired-but-unread included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
