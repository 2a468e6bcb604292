//! Layout Module
//!
//! Per-tab ordering and visibility state for dashboard metric cards and
//! charts. Pure in-memory state transitions, independent of the cache and
//! the data backend; display order is always derived by sorting on
//! `position`, so position values never need to be contiguous.

mod defaults;
mod store;

pub use defaults::default_layouts;
pub use store::LayoutStore;

use serde::{Deserialize, Serialize};

use crate::models::MetricValueType;

// == Display Enums ==
/// How a metric card renders. Hero occupies the large slot at the top of a
/// tab; card is the standard grid tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricVariant {
    Hero,
    Card,
}

/// Chart rendering kind, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Area,
    Bar,
    Pie,
    Combo,
    Funnel,
}

/// Direction for a one-step position move within a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

// == Slot Types ==
/// One metric card in a tab's layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSlot {
    pub id: String,
    pub label: String,
    pub visible: bool,
    pub position: u32,
    pub variant: MetricVariant,
    pub value_type: MetricValueType,
}

/// One chart in a tab's layout. The rendering kind travels as `type` on
/// the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlot {
    pub id: String,
    pub label: String,
    pub visible: bool,
    pub position: u32,
    #[serde(rename = "type")]
    pub kind: ChartKind,
}

/// Everything one tab holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabLayout {
    pub metrics: Vec<MetricSlot>,
    pub charts: Vec<ChartSlot>,
}
