//! Metrics Cache Adapter Module
//!
//! Reconciliation layer between inbound metric pushes and the per-project
//! cached metric list. Change detection on full-list updates keeps redundant
//! pushes from rewriting the cache or bumping the version that consumers
//! watch.

use tracing::debug;

use crate::cache::{SharedStore, METRICS_CACHE_TTL};
use crate::error::Result;
use crate::models::{MetricPatch, MetricRecord};

/// Cache key for a project's metric list.
pub fn metrics_cache_key(project_id: &str) -> String {
    format!("metrics-{project_id}")
}

// == Metrics Cache Adapter ==
/// Holds the current metric list for one project and writes it through to
/// the shared store under `metrics-{project_id}` with the metrics TTL.
///
/// `version` increments whenever the held list changes; consumers compare
/// versions to decide whether to re-read.
pub struct MetricsCacheAdapter {
    store: SharedStore,
    key: String,
    held: Vec<MetricRecord>,
    version: u64,
}

impl MetricsCacheAdapter {
    // == Constructor ==
    pub fn new(store: SharedStore, project_id: &str) -> Self {
        Self {
            store,
            key: metrics_cache_key(project_id),
            held: Vec::new(),
            version: 0,
        }
    }

    // == Accessors ==
    /// The list as last reported; not expiry-checked.
    pub fn metrics(&self) -> &[MetricRecord] {
        &self.held
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the store currently holds an unexpired list for this project.
    /// Probes the store, so an expired entry is dropped as a side effect.
    pub async fn is_cached(&self) -> bool {
        self.store.write().await.has(&self.key)
    }

    // == Full-List Update ==
    /// Applies an incoming full metric list.
    ///
    /// Each incoming record is compared against the held record with the
    /// same id; a record counts as changed when any field differs or when
    /// no held record has its id. If nothing changed the call is a complete
    /// no-op: no cache write, no version bump. Returns whether anything
    /// changed. An empty incoming list never changes anything.
    pub async fn update_metrics(&mut self, incoming: Vec<MetricRecord>) -> Result<bool> {
        self.hydrate_from_store().await;

        let changed = incoming.iter().any(|record| {
            match self.held.iter().find(|held| held.id == record.id) {
                Some(held) => held != record,
                None => true,
            }
        });

        if !changed {
            debug!(key = %self.key, "metric push identical to held list, skipping");
            return Ok(false);
        }

        self.held = incoming;
        self.write_through().await?;
        self.version += 1;
        Ok(true)
    }

    // == Single-Metric Patch ==
    /// Merges `patch` into the held record with `id` and writes the list
    /// back unconditionally; there is no change detection on this path.
    ///
    /// Returns whether a record was updated. An id not present in the held
    /// list is a no-op and never inserts a record.
    pub async fn update_single_metric(&mut self, id: &str, patch: &MetricPatch) -> Result<bool> {
        self.hydrate_from_store().await;

        let Some(record) = self.held.iter_mut().find(|m| m.id == id) else {
            debug!(key = %self.key, metric = %id, "patch for unknown metric id ignored");
            return Ok(false);
        };

        patch.apply(record);
        self.write_through().await?;
        self.version += 1;
        Ok(true)
    }

    // == Invalidation ==
    /// Drops the store entry and clears the held list. The next full-list
    /// update will treat every incoming record as changed.
    pub async fn invalidate_cache(&mut self) {
        self.store.write().await.invalidate(&self.key);
        if !self.held.is_empty() {
            self.held.clear();
            self.version += 1;
        }
    }

    // == Internal ==
    /// Adopts the store's list when this adapter has not held one yet, so a
    /// patch or push arriving after a read-through fetch compares against
    /// what was actually served rather than against nothing.
    async fn hydrate_from_store(&mut self) {
        if !self.held.is_empty() {
            return;
        }
        if let Some(list) = self
            .store
            .write()
            .await
            .get_json::<Vec<MetricRecord>>(&self.key)
        {
            if !list.is_empty() {
                self.held = list;
                self.version += 1;
            }
        }
    }

    async fn write_through(&self) -> Result<()> {
        self.store
            .write()
            .await
            .set_json_with_ttl(self.key.as_str(), &self.held, METRICS_CACHE_TTL)
    }
}
