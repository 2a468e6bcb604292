//! Launch project records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// == Project ==
/// One launch project. Metrics, snapshots and layout all hang off its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable project identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project with a freshly generated id, stamped now.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_projects_get_distinct_ids() {
        let a = Project::new("Launch A", None);
        let b = Project::new("Launch A", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_project_serializes_without_empty_description() {
        let project = Project::new("Spring Launch", None);
        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("Spring Launch"));
        assert!(!json.contains("description"));
    }
}
