//! Built-in tab layouts for a launch dashboard.
//!
//! Three tabs: "overview" for the headline numbers, "funnel" for the
//! page-to-purchase pipeline, "traffic" for acquisition. `reset_tab`
//! restores a tab to exactly what this module builds.

use std::collections::HashMap;

use crate::models::MetricValueType;

use super::{ChartKind, ChartSlot, MetricSlot, MetricVariant, TabLayout};

fn metric(
    id: &str,
    label: &str,
    position: u32,
    variant: MetricVariant,
    value_type: MetricValueType,
) -> MetricSlot {
    MetricSlot {
        id: id.to_string(),
        label: label.to_string(),
        visible: true,
        position,
        variant,
        value_type,
    }
}

fn chart(id: &str, label: &str, position: u32, kind: ChartKind) -> ChartSlot {
    ChartSlot {
        id: id.to_string(),
        label: label.to_string(),
        visible: true,
        position,
        kind,
    }
}

// == Default Layouts ==
/// The factory configuration for every known tab.
pub fn default_layouts() -> HashMap<String, TabLayout> {
    let mut tabs = HashMap::new();

    tabs.insert(
        "overview".to_string(),
        TabLayout {
            metrics: vec![
                metric(
                    "revenue",
                    "Revenue",
                    1,
                    MetricVariant::Hero,
                    MetricValueType::Currency,
                ),
                metric(
                    "ad_spend",
                    "Ad Spend",
                    2,
                    MetricVariant::Card,
                    MetricValueType::Currency,
                ),
                metric(
                    "roas",
                    "ROAS",
                    3,
                    MetricVariant::Card,
                    MetricValueType::Ratio,
                ),
                metric(
                    "leads",
                    "Leads",
                    4,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "cpl",
                    "Cost per Lead",
                    5,
                    MetricVariant::Card,
                    MetricValueType::Currency,
                ),
                metric(
                    "sales",
                    "Sales",
                    6,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
            ],
            charts: vec![
                chart("revenue_trend", "Revenue Over Time", 1, ChartKind::Line),
                chart("spend_vs_revenue", "Spend vs Revenue", 2, ChartKind::Combo),
                chart("leads_by_day", "Leads by Day", 3, ChartKind::Bar),
            ],
        },
    );

    // Eight funnel stages; a custom metric added here lands at position 9.
    tabs.insert(
        "funnel".to_string(),
        TabLayout {
            metrics: vec![
                metric(
                    "page_views",
                    "Page Views",
                    1,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "funnel_leads",
                    "Leads",
                    2,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "checkouts",
                    "Checkouts Started",
                    3,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "purchases",
                    "Purchases",
                    4,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "conversion_rate",
                    "Conversion Rate",
                    5,
                    MetricVariant::Hero,
                    MetricValueType::Percent,
                ),
                metric(
                    "checkout_rate",
                    "Checkout Rate",
                    6,
                    MetricVariant::Card,
                    MetricValueType::Percent,
                ),
                metric(
                    "abandonment_rate",
                    "Abandonment Rate",
                    7,
                    MetricVariant::Card,
                    MetricValueType::Percent,
                ),
                metric(
                    "avg_order_value",
                    "Average Order Value",
                    8,
                    MetricVariant::Card,
                    MetricValueType::Currency,
                ),
            ],
            charts: vec![
                chart("funnel_stages", "Funnel Stages", 1, ChartKind::Funnel),
                chart("conversion_trend", "Conversion Trend", 2, ChartKind::Area),
            ],
        },
    );

    tabs.insert(
        "traffic".to_string(),
        TabLayout {
            metrics: vec![
                metric(
                    "sessions",
                    "Sessions",
                    1,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "impressions",
                    "Impressions",
                    2,
                    MetricVariant::Card,
                    MetricValueType::Count,
                ),
                metric(
                    "ctr",
                    "Click-Through Rate",
                    3,
                    MetricVariant::Card,
                    MetricValueType::Percent,
                ),
                metric(
                    "cpc",
                    "Cost per Click",
                    4,
                    MetricVariant::Card,
                    MetricValueType::Currency,
                ),
            ],
            charts: vec![
                chart("traffic_sources", "Traffic Sources", 1, ChartKind::Pie),
                chart("clicks_by_campaign", "Clicks by Campaign", 2, ChartKind::Bar),
            ],
        },
    );

    tabs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tabs_present() {
        let tabs = default_layouts();
        assert!(tabs.contains_key("overview"));
        assert!(tabs.contains_key("funnel"));
        assert!(tabs.contains_key("traffic"));
    }

    #[test]
    fn test_funnel_tab_has_eight_slots_at_positions_one_through_eight() {
        let tabs = default_layouts();
        let funnel = &tabs["funnel"];

        assert_eq!(funnel.metrics.len(), 8);
        let mut positions: Vec<u32> = funnel.metrics.iter().map(|m| m.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, (1..=8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_positions_are_distinct_within_each_tab() {
        for (tab_id, tab) in default_layouts() {
            let mut metric_positions: Vec<u32> =
                tab.metrics.iter().map(|m| m.position).collect();
            metric_positions.sort_unstable();
            metric_positions.dedup();
            assert_eq!(
                metric_positions.len(),
                tab.metrics.len(),
                "duplicate metric position in tab {tab_id}"
            );

            let mut chart_positions: Vec<u32> = tab.charts.iter().map(|c| c.position).collect();
            chart_positions.sort_unstable();
            chart_positions.dedup();
            assert_eq!(
                chart_positions.len(),
                tab.charts.len(),
                "duplicate chart position in tab {tab_id}"
            );
        }
    }

    #[test]
    fn test_every_default_slot_is_visible() {
        for (_, tab) in default_layouts() {
            assert!(tab.metrics.iter().all(|m| m.visible));
            assert!(tab.charts.iter().all(|c| c.visible));
        }
    }
}
