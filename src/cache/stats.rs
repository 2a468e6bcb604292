//! Cache Statistics Module
//!
//! Two views of the store: a diagnostic snapshot of what is resident right
//! now (`CacheStats`), and running hit/miss counters (`CacheCounters`).

use serde::Serialize;

// == Cache Stats ==
/// Diagnostic snapshot of the store's current contents.
///
/// Deliberately not expiry-filtered: entries whose TTL has elapsed but which
/// have not been touched since still appear here. Use it for debugging and
/// test assertions, never for correctness decisions.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of resident entries
    pub size: usize,
    /// Resident keys, in no particular order
    pub keys: Vec<String>,
}

// == Cache Counters ==
/// Running access counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheCounters {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads that found nothing, or only an expired entry
    pub misses: u64,
    /// Entries deleted by the read-triggered expiry path
    pub expirations: u64,
}

impl CacheCounters {
    /// Creates counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.expirations, 0);
    }

    #[test]
    fn test_hit_rate_no_reads() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.hit_rate(), 0.75);
    }

    #[test]
    fn test_expirations_tracked_separately() {
        let mut counters = CacheCounters::new();
        counters.record_expiration();
        counters.record_miss();
        assert_eq!(counters.expirations, 1);
        assert_eq!(counters.misses, 1);
        assert_eq!(counters.hits, 0);
    }
}
