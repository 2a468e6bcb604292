//! API Response Types
//!
//! Serializable response bodies for the HTTP surface.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::layout::{ChartSlot, MetricSlot};
use crate::models::{DailySnapshot, MetricRecord, Project};
use crate::replay::ReplaySession;

// == Health Response ==
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

// == Cache Responses ==
/// Store diagnostics plus counter totals.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub size: usize,
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

// == Metrics Responses ==
/// Metric list plus whether it was served from cache.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricRecord>,
    pub from_cache: bool,
}

/// Outcome of a full-list sync push.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub changed: bool,
    pub version: u64,
}

/// Metric list after a single-metric patch.
#[derive(Debug, Serialize)]
pub struct MetricsListResponse {
    pub metrics: Vec<MetricRecord>,
    pub version: u64,
}

// == Layout Responses ==
#[derive(Debug, Serialize)]
pub struct LayoutMetricsResponse {
    pub tab: String,
    pub metrics: Vec<MetricSlot>,
}

#[derive(Debug, Serialize)]
pub struct LayoutChartsResponse {
    pub tab: String,
    pub charts: Vec<ChartSlot>,
}

/// Acknowledgement for layout mutations; `applied` is false for silent
/// no-ops on unknown tabs or ids.
#[derive(Debug, Serialize)]
pub struct LayoutUpdateResponse {
    pub applied: bool,
}

// == Replay Responses ==
#[derive(Debug, Serialize)]
pub struct ReplayStatusResponse {
    /// "live" or "replay"
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<DailySnapshot>,
}

impl ReplayStatusResponse {
    /// Snapshot of a session's current mode and navigation availability.
    pub fn from_session(session: &ReplaySession) -> Self {
        let state = session.state();
        Self {
            mode: if state.is_live() { "live" } else { "replay" }.to_string(),
            date: state.date(),
            previous_date: session.previous_date(),
            next_date: session.next_date(),
            snapshot: state.snapshot().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReplayDatesResponse {
    pub dates: Vec<NaiveDate>,
}

// == Import Response ==
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub project: Project,
    pub metrics_imported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_has_rfc3339_timestamp() {
        let response = HealthResponse::ok();
        assert_eq!(response.status, "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
    }

    #[test]
    fn test_replay_status_omits_absent_fields() {
        let response = ReplayStatusResponse {
            mode: "live".to_string(),
            date: None,
            previous_date: None,
            next_date: None,
            snapshot: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"mode":"live"}"#);
    }
}
