//! Metric records
//!
//! A metric is one tracked number for a launch project (revenue, leads, CPL,
//! ROI...). Records arrive from the data backend or a spreadsheet sync push
//! and are what the cache adapter compares for change detection, so the whole
//! struct derives `PartialEq` and equality is field-by-field.

use serde::{Deserialize, Serialize};

// == Metric Value Type ==
/// How a metric's value is rendered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValueType {
    /// Monetary amount (revenue, investment, average order)
    Currency,
    /// Percentage (conversion rate, CTR)
    Percent,
    /// Plain count (leads, sales, page views)
    Count,
    /// Multiplier (ROI, ROAS)
    Ratio,
}

// == Metric Record ==
/// One tracked metric for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Stable metric identifier, unique within a project
    pub id: String,
    /// Display name
    pub name: String,
    /// Current value
    pub value: f64,
    /// Value from the previous sync, for trend display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<f64>,
    /// Rendering kind
    pub value_type: MetricValueType,
    /// Target value, when the launch has a goal for this metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<f64>,
}

impl MetricRecord {
    /// Creates a metric record with no previous value and no goal.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        value_type: MetricValueType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            previous_value: None,
            value_type,
            goal: None,
        }
    }
}

// == Metric Patch ==
/// Partial update for a single metric record.
///
/// Only the fields that are `Some` are applied; everything else on the
/// record is left untouched. The id is never patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<MetricValueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<f64>,
}

impl MetricPatch {
    /// Merges the set fields of this patch into `record`.
    pub fn apply(&self, record: &mut MetricRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(value) = self.value {
            record.value = value;
        }
        if let Some(previous) = self.previous_value {
            record.previous_value = Some(previous);
        }
        if let Some(value_type) = self.value_type {
            record.value_type = value_type;
        }
        if let Some(goal) = self.goal {
            record.goal = Some(goal);
        }
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.value.is_none()
            && self.previous_value.is_none()
            && self.value_type.is_none()
            && self.goal.is_none()
    }
}
