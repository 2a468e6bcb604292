//! Layout store implementation
//!
//! Holds the per-tab layout map and applies edits to it. Unknown tab or
//! item ids are silent no-ops here; the API layer decides whether that is
//! worth reporting. Mutators return whether anything changed.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use uuid::Uuid;

use crate::models::MetricValueType;

use super::{defaults, ChartKind, ChartSlot, MetricSlot, MetricVariant, MoveDirection, TabLayout};

// == Layout Store ==
pub struct LayoutStore {
    tabs: HashMap<String, TabLayout>,
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutStore {
    // == Constructor ==
    /// Starts from the built-in default configuration.
    pub fn new() -> Self {
        Self {
            tabs: defaults::default_layouts(),
        }
    }

    // == Read Operations ==
    /// Position-sorted copy of a tab's metric slots. Ties keep their
    /// original array order; unknown tab yields an empty list.
    pub fn metrics_for_tab(&self, tab_id: &str) -> Vec<MetricSlot> {
        let Some(tab) = self.tabs.get(tab_id) else {
            return Vec::new();
        };
        let mut slots = tab.metrics.clone();
        slots.sort_by_key(|s| s.position);
        slots
    }

    /// Position-sorted copy of a tab's chart slots.
    pub fn charts_for_tab(&self, tab_id: &str) -> Vec<ChartSlot> {
        let Some(tab) = self.tabs.get(tab_id) else {
            return Vec::new();
        };
        let mut slots = tab.charts.clone();
        slots.sort_by_key(|s| s.position);
        slots
    }

    /// Known tab identifiers, sorted for stable listings.
    pub fn tab_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tabs.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Full layout map keyed in sorted order, for export documents.
    pub fn export_layouts(&self) -> BTreeMap<String, TabLayout> {
        self.tabs
            .iter()
            .map(|(id, tab)| (id.clone(), tab.clone()))
            .collect()
    }

    // == Visibility ==
    pub fn set_metric_visibility(&mut self, tab_id: &str, metric_id: &str, visible: bool) -> bool {
        match self.metric_mut(tab_id, metric_id) {
            Some(slot) => {
                slot.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_chart_visibility(&mut self, tab_id: &str, chart_id: &str, visible: bool) -> bool {
        match self.chart_mut(tab_id, chart_id) {
            Some(slot) => {
                slot.visible = visible;
                true
            }
            None => false,
        }
    }

    // == Position Moves ==
    /// Swaps the target's `position` value with its immediate neighbor in
    /// sorted order. At the boundary in the requested direction, or when
    /// the tab/metric is unknown, nothing changes.
    pub fn move_metric(&mut self, tab_id: &str, metric_id: &str, direction: MoveDirection) -> bool {
        let Some(tab) = self.tabs.get_mut(tab_id) else {
            return false;
        };

        let mut order: Vec<usize> = (0..tab.metrics.len()).collect();
        order.sort_by_key(|&i| tab.metrics[i].position);

        let Some(rank) = order.iter().position(|&i| tab.metrics[i].id == metric_id) else {
            return false;
        };
        let neighbor_rank = match direction {
            MoveDirection::Up => rank.checked_sub(1),
            MoveDirection::Down => (rank + 1 < order.len()).then_some(rank + 1),
        };
        let Some(neighbor_rank) = neighbor_rank else {
            return false;
        };

        let a = order[rank];
        let b = order[neighbor_rank];
        let swapped = tab.metrics[a].position;
        tab.metrics[a].position = tab.metrics[b].position;
        tab.metrics[b].position = swapped;
        true
    }

    // == Variant / Kind ==
    pub fn set_metric_variant(
        &mut self,
        tab_id: &str,
        metric_id: &str,
        variant: MetricVariant,
    ) -> bool {
        match self.metric_mut(tab_id, metric_id) {
            Some(slot) => {
                slot.variant = variant;
                true
            }
            None => false,
        }
    }

    pub fn set_chart_kind(&mut self, tab_id: &str, chart_id: &str, kind: ChartKind) -> bool {
        match self.chart_mut(tab_id, chart_id) {
            Some(slot) => {
                slot.kind = kind;
                true
            }
            None => false,
        }
    }

    // == Custom Metrics ==
    /// Appends a user-defined metric slot with a fresh id, placed after
    /// every existing slot in the tab. Returns the created slot, or None
    /// for an unknown tab.
    pub fn add_custom_metric(
        &mut self,
        tab_id: &str,
        name: &str,
        value_type: MetricValueType,
    ) -> Option<MetricSlot> {
        let tab = self.tabs.get_mut(tab_id)?;
        let max_position = tab.metrics.iter().map(|s| s.position).max().unwrap_or(0);

        let slot = MetricSlot {
            id: format!("custom-{}", Uuid::new_v4()),
            label: name.to_string(),
            visible: true,
            position: max_position + 1,
            variant: MetricVariant::Card,
            value_type,
        };
        debug!(tab = %tab_id, id = %slot.id, position = slot.position, "custom metric added");
        tab.metrics.push(slot.clone());
        Some(slot)
    }

    // == Reset ==
    /// Restores a tab to the built-in defaults, discarding every edit made
    /// since. Tabs without a default configuration are left alone.
    pub fn reset_tab(&mut self, tab_id: &str) -> bool {
        let Some(default) = defaults::default_layouts().remove(tab_id) else {
            return false;
        };
        self.tabs.insert(tab_id.to_string(), default);
        true
    }

    // == Internal ==
    fn metric_mut(&mut self, tab_id: &str, metric_id: &str) -> Option<&mut MetricSlot> {
        self.tabs
            .get_mut(tab_id)?
            .metrics
            .iter_mut()
            .find(|s| s.id == metric_id)
    }

    fn chart_mut(&mut self, tab_id: &str, chart_id: &str) -> Option<&mut ChartSlot> {
        self.tabs
            .get_mut(tab_id)?
            .charts
            .iter_mut()
            .find(|s| s.id == chart_id)
    }
}
