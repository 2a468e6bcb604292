//! Models Module
//!
//! Domain records (projects, metrics, snapshots) and the request/response
//! types for the HTTP surface.

mod metric;
mod project;
mod requests;
mod responses;
mod snapshot;

pub use metric::{MetricPatch, MetricRecord, MetricValueType};
pub use project::Project;
pub use snapshot::DailySnapshot;

pub use requests::{
    AddCustomMetricRequest, ChartKindRequest, InvalidatePatternRequest, MetricsQuery,
    MoveRequest, ReplayDateRequest, SyncMetricsRequest, VariantRequest, VisibilityRequest,
};
pub use responses::{
    CacheStatsResponse, ClearResponse, HealthResponse, ImportResponse, InvalidateResponse,
    LayoutChartsResponse, LayoutMetricsResponse, LayoutUpdateResponse, MetricsListResponse,
    MetricsResponse, ReplayDatesResponse, ReplayStatusResponse, SyncResponse,
};
