//! Error types for the analytics service
//!
//! Provides unified error handling using thiserror.
//!
//! Cache and layout operations never produce errors for missing keys or ids:
//! absence is a normal empty/no-op result there. Errors originate at the I/O
//! boundaries (backend fetches, import parsing) and at request validation,
//! and are converted into JSON error responses at the API layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

// == Analytics Error Enum ==
/// Unified error type for the analytics service.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// No snapshot exists for the requested project and date
    #[error("No snapshot for project '{project}' on {date}")]
    SnapshotNotFound { project: String, date: NaiveDate },

    /// Project not found in the data backend
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Metric not found within the held metric list
    #[error("Metric not found: {0}")]
    MetricNotFound(String),

    /// Transient data backend failure (network, upstream service)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Import document failed validation
    #[error("Invalid import document: {0}")]
    InvalidImport(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            AnalyticsError::SnapshotNotFound { .. } => StatusCode::NOT_FOUND,
            AnalyticsError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            AnalyticsError::MetricNotFound(_) => StatusCode::NOT_FOUND,
            AnalyticsError::Backend(_) => StatusCode::BAD_GATEWAY,
            AnalyticsError::InvalidImport(_) => StatusCode::BAD_REQUEST,
            AnalyticsError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AnalyticsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the analytics service.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
