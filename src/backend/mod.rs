//! Backend Module
//!
//! Seam to the hosted data store that holds projects, current metric
//! values, and daily snapshots. The dashboard core only talks to the
//! `DashboardBackend` trait; the bundled in-memory implementation backs
//! the demo binary and the test suite.

mod memory;

pub use memory::{InMemoryBackend, DEMO_PROJECT_ID};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{DailySnapshot, MetricRecord, Project};

// == Dashboard Backend Trait ==
/// Request/response access to the hosted data store.
///
/// Not-found is a distinguished condition: lookups return `Ok(None)` (or an
/// empty list) for keys that simply do not exist, and reserve `Err` for
/// transport and upstream failures.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Looks up one project by id.
    async fn fetch_project(&self, id: &str) -> Result<Option<Project>>;

    /// Current metric values for a project. Unknown projects yield an
    /// empty list, not an error.
    async fn fetch_metrics(&self, project_id: &str) -> Result<Vec<MetricRecord>>;

    /// The daily snapshot captured for a project on one calendar date.
    async fn fetch_snapshot(
        &self,
        project_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailySnapshot>>;

    /// Every date with a stored snapshot for the project, ascending.
    async fn list_snapshot_dates(&self, project_id: &str) -> Result<Vec<NaiveDate>>;

    /// Stores a new project together with its metric list.
    async fn insert_project(
        &self,
        project: Project,
        metrics: Vec<MetricRecord>,
    ) -> Result<Project>;

    /// Stores or replaces the snapshot for its project and date.
    async fn store_snapshot(&self, snapshot: DailySnapshot) -> Result<()>;
}
