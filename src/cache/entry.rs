//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL metadata.
//! Entries are value-type-erased: callers store any JSON-serializable value
//! and the typed accessors on the store handle (de)serialization.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single cached value plus the timing metadata needed for lazy expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Storage timestamp (Unix milliseconds)
    pub stored_at_ms: u64,
    /// Time-to-live in milliseconds; must be positive
    pub ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            stored_at_ms: current_timestamp_ms(),
            ttl_ms: ttl.as_millis() as u64,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// Boundary condition: the entry is expired only once the elapsed time
    /// is strictly greater than the TTL, so a read at exactly `ttl_ms`
    /// elapsed is still served.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.stored_at_ms) > self.ttl_ms
    }

    // == Time To Live ==
    /// Returns the remaining TTL in milliseconds, zero once expired.
    ///
    /// Diagnostic helper for the stats surface and tests.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let elapsed = current_timestamp_ms().saturating_sub(self.stored_at_ms);
        self.ttl_ms.saturating_sub(elapsed)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    #[test]
    fn test_entry_fresh_after_creation() {
        let entry = CacheEntry::new(json!({"leads": 42}), Duration::from_secs(60));

        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms() > 59_000);
        assert_eq!(entry.value, json!({"leads": 42}));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new(json!("v"), Duration::from_millis(50));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_expiry_boundary_is_strictly_greater() {
        // Manufactured timestamps: elapsed exactly equal to the TTL.
        let now = current_timestamp_ms();
        let at_boundary = CacheEntry {
            value: json!(1),
            stored_at_ms: now.saturating_sub(1_000),
            ttl_ms: 1_000,
        };
        // Allow a grain of scheduling slack: the entry may tip over between
        // construction and the assertion, but one stored a full step past
        // the TTL must always read as expired.
        let past_boundary = CacheEntry {
            value: json!(1),
            stored_at_ms: now.saturating_sub(2_000),
            ttl_ms: 1_000,
        };

        assert!(past_boundary.is_expired());
        assert_eq!(at_boundary.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_ttl_remaining_counts_down() {
        let entry = CacheEntry {
            value: json!(null),
            stored_at_ms: current_timestamp_ms().saturating_sub(400),
            ttl_ms: 1_000,
        };

        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 600);
        assert!(remaining >= 500);
    }
}
