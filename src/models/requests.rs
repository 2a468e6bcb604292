//! API Request Types
//!
//! Deserializable bodies and query strings for the HTTP surface. Requests
//! that can carry nonsense get a `validate` returning a plain message; the
//! handler wraps it into the service error type.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::layout::{ChartKind, MetricVariant, MoveDirection};
use crate::models::{MetricRecord, MetricValueType};

// == Cache Requests ==
/// Body for substring-based cache invalidation.
#[derive(Debug, Deserialize)]
pub struct InvalidatePatternRequest {
    /// Literal substring to match against keys, not a regex
    pub pattern: String,
}

impl InvalidatePatternRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.pattern.trim().is_empty() {
            return Err("Pattern cannot be empty".to_string());
        }
        Ok(())
    }
}

// == Metrics Requests ==
/// Query string for the metrics read-through endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// Bypass the cache and refetch when true
    #[serde(default)]
    pub force: bool,
}

/// Body for a full metric list push (spreadsheet sync).
#[derive(Debug, Deserialize)]
pub struct SyncMetricsRequest {
    pub metrics: Vec<MetricRecord>,
}

impl SyncMetricsRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.metrics.iter().any(|m| m.id.trim().is_empty()) {
            return Err("Metric ids cannot be empty".to_string());
        }
        Ok(())
    }
}

// == Layout Requests ==
/// Body for visibility toggles on metric cards and charts.
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

/// Body for a one-step position move.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

/// Body for switching a metric card between hero and card rendering.
#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub variant: MetricVariant,
}

/// Body for switching a chart's rendering kind.
#[derive(Debug, Deserialize)]
pub struct ChartKindRequest {
    #[serde(rename = "type")]
    pub kind: ChartKind,
}

/// Body for adding a user-defined metric card to a tab.
#[derive(Debug, Deserialize)]
pub struct AddCustomMetricRequest {
    pub name: String,
    pub value_type: MetricValueType,
}

impl AddCustomMetricRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Metric name cannot be empty".to_string());
        }
        Ok(())
    }
}

// == Replay Requests ==
/// Body for entering replay mode or navigating to another date.
#[derive(Debug, Deserialize)]
pub struct ReplayDateRequest {
    /// ISO calendar date, e.g. "2024-11-02"
    pub date: NaiveDate,
}
