//! Cache Module
//!
//! In-memory TTL cache backing the dashboard: the store itself, the query
//! memoization wrapper that reads through it, and the per-project metrics
//! adapter that writes metric lists into it.
//!
//! Expiry is lazy. An entry past its TTL is deleted by the read that finds
//! it; there is no background sweeper, no capacity bound, and no LRU-style
//! eviction. Between expiry and the next access an entry simply sits in the
//! map, which is fine at dashboard scale.

mod adapter;
mod entry;
mod memo;
mod stats;
mod store;


pub use adapter::{metrics_cache_key, MetricsCacheAdapter};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use memo::{MemoizedQuery, QueryState, ScopeHandle, SharedStore};
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;

use std::time::Duration;

// == Public Constants ==
/// TTL applied when a caller stores without one (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// TTL for per-project metric lists.
pub const METRICS_CACHE_TTL: Duration = Duration::from_secs(300);
