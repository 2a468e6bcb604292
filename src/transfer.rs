//! Transfer Module
//!
//! JSON export and import of one project. Export bundles the project
//! descriptor with its metric list and, optionally, snapshots and layout.
//! Import validates the raw document before any typed deserialization or
//! state mutation, so a rejected file changes nothing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{AnalyticsError, Result};
use crate::layout::TabLayout;
use crate::models::{DailySnapshot, MetricRecord, Project};

/// Export format version this build reads and writes.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

// == Project Descriptor ==
/// The project fields that travel in an export document. Identifiers stay
/// behind: importing always mints a new project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// == Export Document ==
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub project: ProjectDescriptor,
    pub metrics: Vec<MetricRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<Vec<DailySnapshot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<BTreeMap<String, TabLayout>>,
}

impl ExportDocument {
    // == Export ==
    pub fn build(
        project: &Project,
        metrics: Vec<MetricRecord>,
        snapshots: Option<Vec<DailySnapshot>>,
        layout: Option<BTreeMap<String, TabLayout>>,
    ) -> Self {
        Self {
            version: EXPORT_FORMAT_VERSION,
            exported_at: Utc::now(),
            project: ProjectDescriptor {
                name: project.name.clone(),
                description: project.description.clone(),
            },
            metrics,
            snapshots,
            layout,
        }
    }

    // == Import ==
    /// Parses and validates an import document.
    ///
    /// The required fields (`version`, `project.name`, `metrics`) are
    /// checked on the raw JSON first, each with its own message, so the
    /// user sees what is missing rather than a deserializer trace.
    pub fn parse(input: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(input)
            .map_err(|e| reject(format!("not valid JSON: {e}")))?;

        let version = raw
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| reject("missing format version".to_string()))?;
        if version != u64::from(EXPORT_FORMAT_VERSION) {
            return Err(reject(format!("unsupported format version {version}")));
        }

        let name_present = raw
            .get("project")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .is_some_and(|name| !name.trim().is_empty());
        if !name_present {
            return Err(reject("missing project name".to_string()));
        }

        if !raw.get("metrics").is_some_and(Value::is_array) {
            return Err(reject("missing metrics array".to_string()));
        }

        serde_json::from_value(raw).map_err(|e| reject(format!("malformed document: {e}")))
    }

    /// Splits the document into a freshly minted project record and its
    /// metric list. The new project never reuses an id from the file.
    pub fn into_parts(self) -> (Project, Vec<MetricRecord>) {
        let project = Project::new(self.project.name.trim(), self.project.description);
        (project, self.metrics)
    }
}

fn reject(message: String) -> AnalyticsError {
    warn!(reason = %message, "import document rejected");
    AnalyticsError::InvalidImport(message)
}
