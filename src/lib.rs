//! Atomic Analytics
//!
//! Dashboard core for marketing launch analytics: an in-memory TTL cache
//! with lazy access-triggered expiry, a memoized read-through query
//! wrapper, a per-project metrics cache adapter with change detection,
//! per-tab layout configuration, and daily-snapshot replay. An axum HTTP
//! layer exposes the whole thing as a service.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod replay;
pub mod transfer;

pub use api::{create_router, AppState};
pub use cache::{CacheStore, MemoizedQuery, MetricsCacheAdapter, QueryState, ScopeHandle};
pub use config::Config;
pub use error::{AnalyticsError, Result};
pub use layout::LayoutStore;
pub use replay::{ReplaySession, ReplayState};
