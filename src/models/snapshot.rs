//! Daily snapshots
//!
//! A snapshot is a point-in-time capture of every metric value for one
//! project and one calendar date. Replay mode stages one of these in place
//! of live data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MetricRecord;

// == Daily Snapshot ==
/// Persisted capture of a project's metrics for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Owning project
    pub project_id: String,
    /// Calendar date the snapshot covers
    pub date: NaiveDate,
    /// Metric values as of capture time
    pub metrics: Vec<MetricRecord>,
    /// When the capture was taken
    pub captured_at: DateTime<Utc>,
}

impl DailySnapshot {
    pub fn new(project_id: impl Into<String>, date: NaiveDate, metrics: Vec<MetricRecord>) -> Self {
        Self {
            project_id: project_id.into(),
            date,
            metrics,
            captured_at: Utc::now(),
        }
    }
}
