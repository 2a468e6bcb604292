//! Query Memoization Module
//!
//! Wraps a zero-argument async fetch so repeated runs inside the TTL window
//! reuse the last successful result instead of hitting the backend again.
//! Loading/error state is published on a watch channel for whatever is
//! binding the query to a view.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tracing::warn;

use crate::cache::CacheStore;
use crate::error::Result;

/// Shared handle to the process-wide cache store.
///
/// The store is constructed once and passed by reference to every consumer;
/// there is no module-level singleton.
pub type SharedStore = Arc<RwLock<CacheStore>>;

type BoxedFetch<T> =
    Box<dyn Fn() -> Pin<Box<dyn Future<Output = Result<T>> + Send>> + Send + Sync>;

// == Query State ==
/// What a view binding sees of the query at any moment.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never run
    Idle,
    /// Fetch in flight
    Loading,
    /// Last run produced this value (from cache or from a fetch)
    Ready(T),
    /// Last run failed; any previously cached value is still in the store
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

// == Scope Handle ==
/// Liveness flag for the context that owns a query.
///
/// A view binding keeps a clone and calls `release` when it is torn down;
/// from then on the query stops publishing state, so a late-arriving fetch
/// result cannot update a consumer that no longer exists. There is no
/// network-level cancellation — the in-flight fetch completes and is ignored.
#[derive(Debug, Clone)]
pub struct ScopeHandle(Arc<AtomicBool>);

impl ScopeHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Marks the owning context as gone.
    pub fn release(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for ScopeHandle {
    fn default() -> Self {
        Self::new()
    }
}

// == Memoized Query ==
/// Memoizes an async fetch through the shared cache store.
///
/// Runs are not coalesced: two overlapping forced runs both invoke the fetch
/// and both write the store, and the later completion wins. Cached values
/// are idempotently re-derivable, so the surviving value self-corrects on
/// the next refresh.
pub struct MemoizedQuery<T> {
    store: SharedStore,
    key: String,
    ttl: Duration,
    fetch: BoxedFetch<T>,
    state_tx: watch::Sender<QueryState<T>>,
    scope: ScopeHandle,
}

impl<T> MemoizedQuery<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a query over `store` for `key`, caching successful results
    /// with `ttl`.
    pub fn new<F, Fut>(store: SharedStore, key: impl Into<String>, ttl: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let fetch: BoxedFetch<T> = Box::new(move || {
            Box::pin(fetch()) as Pin<Box<dyn Future<Output = Result<T>> + Send>>
        });
        let (state_tx, _) = watch::channel(QueryState::Idle);

        Self {
            store,
            key: key.into(),
            ttl,
            fetch,
            state_tx,
            scope: ScopeHandle::new(),
        }
    }

    // == Run ==
    /// Returns the cached value when `force` is false and the store holds an
    /// unexpired entry for the key; otherwise invokes the fetch exactly once.
    ///
    /// A successful fetch is written through to the store with the
    /// configured TTL. A failed fetch reports `Failed` and leaves any
    /// previously cached value untouched — stale-but-valid data beats none.
    pub async fn run(&self, force: bool) -> Result<T> {
        if !force {
            let cached: Option<T> = self.store.write().await.get_json(&self.key);
            if let Some(value) = cached {
                self.publish(QueryState::Ready(value.clone()));
                return Ok(value);
            }
        }

        self.publish(QueryState::Loading);

        match (self.fetch)().await {
            Ok(value) => {
                // The cache write lands even when the owning scope has been
                // released: the store is shared and the value is still valid
                // for every other consumer. Only state publication stops.
                self.store
                    .write()
                    .await
                    .set_json_with_ttl(self.key.as_str(), &value, self.ttl)?;
                self.publish(QueryState::Ready(value.clone()));
                Ok(value)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "memoized fetch failed, keeping prior cache entry");
                self.publish(QueryState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    // == Invalidate ==
    /// Removes the query's key from the store without touching the published
    /// state; the next non-forced run misses.
    pub async fn invalidate(&self) {
        self.store.write().await.invalidate(&self.key);
    }

    // == State ==
    /// Snapshot of the current published state.
    pub fn state(&self) -> QueryState<T> {
        self.state_tx.borrow().clone()
    }

    /// Watch-channel subscription for view bindings.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state_tx.subscribe()
    }

    /// Clone of the scope handle, to be held by the owning context.
    pub fn scope(&self) -> ScopeHandle {
        self.scope.clone()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn publish(&self, state: QueryState<T>) {
        if self.scope.is_active() {
            self.state_tx.send_replace(state);
        }
    }
}
