//! In-memory data backend
//!
//! RwLock-guarded maps standing in for the hosted data store. Snapshots
//! live in a BTreeMap per project so date listings come out ascending for
//! free. `with_demo_data` seeds one launch project with metrics and three
//! snapshot days so the binary is useful immediately after startup.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{DailySnapshot, MetricRecord, MetricValueType, Project};

use super::DashboardBackend;

/// Id of the project seeded by `with_demo_data`.
pub const DEMO_PROJECT_ID: &str = "demo";

// == In-Memory Backend ==
pub struct InMemoryBackend {
    projects: RwLock<HashMap<String, Project>>,
    metrics: RwLock<HashMap<String, Vec<MetricRecord>>>,
    snapshots: RwLock<HashMap<String, BTreeMap<NaiveDate, DailySnapshot>>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    // == Constructors ==
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
            metrics: RwLock::new(HashMap::new()),
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Backend pre-loaded with a demo launch project, its current metric
    /// values, and snapshots for the first three days of November 2024.
    pub fn with_demo_data() -> Self {
        let mut project = Project::new(
            "Course Launch: Scale Method",
            Some("Demo launch seeded at startup".to_string()),
        );
        project.id = DEMO_PROJECT_ID.to_string();

        let current = demo_metrics(1.0);

        let mut by_date = BTreeMap::new();
        for (day, scale) in [(1, 0.4), (2, 0.7), (3, 0.9)] {
            let date = NaiveDate::from_ymd_opt(2024, 11, day).expect("valid demo date");
            by_date.insert(
                date,
                DailySnapshot::new(DEMO_PROJECT_ID, date, demo_metrics(scale)),
            );
        }

        let mut projects = HashMap::new();
        projects.insert(project.id.clone(), project);
        let mut metrics = HashMap::new();
        metrics.insert(DEMO_PROJECT_ID.to_string(), current);
        let mut snapshots = HashMap::new();
        snapshots.insert(DEMO_PROJECT_ID.to_string(), by_date);

        Self {
            projects: RwLock::new(projects),
            metrics: RwLock::new(metrics),
            snapshots: RwLock::new(snapshots),
        }
    }
}

/// Demo metric list scaled so each snapshot day shows the launch ramping up.
fn demo_metrics(scale: f64) -> Vec<MetricRecord> {
    let mut revenue = MetricRecord::new(
        "revenue",
        "Revenue",
        (84_500.0 * scale).round(),
        MetricValueType::Currency,
    );
    revenue.goal = Some(100_000.0);
    revenue.previous_value = Some((62_300.0 * scale).round());

    let mut ad_spend = MetricRecord::new(
        "ad_spend",
        "Ad Spend",
        (12_400.0 * scale).round(),
        MetricValueType::Currency,
    );
    ad_spend.previous_value = Some((11_050.0 * scale).round());

    let roas = MetricRecord::new("roas", "ROAS", 6.8, MetricValueType::Ratio);

    let mut leads = MetricRecord::new(
        "leads",
        "Leads",
        (4_320.0 * scale).round(),
        MetricValueType::Count,
    );
    leads.goal = Some(5_000.0);

    let cpl = MetricRecord::new("cpl", "Cost per Lead", 2.87, MetricValueType::Currency);
    let sales = MetricRecord::new(
        "sales",
        "Sales",
        (431.0 * scale).round(),
        MetricValueType::Count,
    );
    let conversion = MetricRecord::new(
        "conversion_rate",
        "Conversion Rate",
        9.98,
        MetricValueType::Percent,
    );

    vec![revenue, ad_spend, roas, leads, cpl, sales, conversion]
}

// == Trait Implementation ==
#[async_trait]
impl DashboardBackend for InMemoryBackend {
    async fn fetch_project(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn fetch_metrics(&self, project_id: &str) -> Result<Vec<MetricRecord>> {
        Ok(self
            .metrics
            .read()
            .await
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_snapshot(
        &self,
        project_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailySnapshot>> {
        Ok(self
            .snapshots
            .read()
            .await
            .get(project_id)
            .and_then(|by_date| by_date.get(&date))
            .cloned())
    }

    async fn list_snapshot_dates(&self, project_id: &str) -> Result<Vec<NaiveDate>> {
        Ok(self
            .snapshots
            .read()
            .await
            .get(project_id)
            .map(|by_date| by_date.keys().copied().collect())
            .unwrap_or_default())
    }

    async fn insert_project(
        &self,
        project: Project,
        metrics: Vec<MetricRecord>,
    ) -> Result<Project> {
        self.metrics
            .write()
            .await
            .insert(project.id.clone(), metrics);
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn store_snapshot(&self, snapshot: DailySnapshot) -> Result<()> {
        self.snapshots
            .write()
            .await
            .entry(snapshot.project_id.clone())
            .or_default()
            .insert(snapshot.date, snapshot);
        Ok(())
    }
}
