//! API Handlers
//!
//! HTTP request handlers for the dashboard service. Handlers own no state;
//! everything shared lives in `AppState` behind Arc. Lock order whenever
//! two locks are needed: adapters/replays map first, cache store second.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::backend::DashboardBackend;
use crate::cache::{
    metrics_cache_key, CacheStore, MemoizedQuery, MetricsCacheAdapter, SharedStore,
    METRICS_CACHE_TTL,
};
use crate::error::AnalyticsError;
use crate::layout::LayoutStore;
use crate::models::{
    AddCustomMetricRequest, CacheStatsResponse, ChartKindRequest, ClearResponse, HealthResponse,
    ImportResponse, InvalidatePatternRequest, InvalidateResponse, LayoutChartsResponse,
    LayoutMetricsResponse, LayoutUpdateResponse, MetricPatch, MetricsListResponse, MetricsQuery,
    MetricsResponse, MoveRequest, ReplayDateRequest, ReplayDatesResponse, ReplayStatusResponse,
    SyncMetricsRequest, SyncResponse, VariantRequest, VisibilityRequest,
};
use crate::replay::ReplaySession;
use crate::transfer::ExportDocument;

// == Application State ==
/// Shared state across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedStore,
    pub layout: Arc<RwLock<LayoutStore>>,
    pub backend: Arc<dyn DashboardBackend>,
    pub adapters: Arc<RwLock<HashMap<String, MetricsCacheAdapter>>>,
    pub replays: Arc<RwLock<HashMap<String, ReplaySession>>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn DashboardBackend>, default_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(CacheStore::new(default_ttl))),
            layout: Arc::new(RwLock::new(LayoutStore::new())),
            backend,
            adapters: Arc::new(RwLock::new(HashMap::new())),
            replays: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

// == Health Handler ==
/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

// == Cache Handlers ==
/// GET /cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.cache.read().await;
    let stats = cache.stats();
    let counters = cache.counters();

    Json(CacheStatsResponse {
        size: stats.size,
        keys: stats.keys,
        hits: counters.hits,
        misses: counters.misses,
        expirations: counters.expirations,
        hit_rate: counters.hit_rate(),
    })
}

/// POST /cache/invalidate
pub async fn invalidate_cache_pattern(
    State(state): State<AppState>,
    Json(request): Json<InvalidatePatternRequest>,
) -> Result<impl IntoResponse, AnalyticsError> {
    request.validate().map_err(AnalyticsError::InvalidRequest)?;

    let removed = state
        .cache
        .write()
        .await
        .invalidate_pattern(&request.pattern);
    Ok(Json(InvalidateResponse { removed }))
}

/// DELETE /cache
pub async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.cache.write().await.clear();
    info!("cache cleared");
    Json(ClearResponse { cleared: true })
}

// == Project Handlers ==
/// GET /projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let project = state
        .backend
        .fetch_project(&project_id)
        .await?
        .ok_or_else(|| AnalyticsError::ProjectNotFound(project_id))?;
    Ok(Json(project))
}

/// GET /projects/:id/metrics?force=bool
///
/// Memoized read-through: inside the TTL window the backend is not
/// touched; `force=true` always refetches.
pub async fn get_project_metrics(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<MetricsQuery>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let key = metrics_cache_key(&project_id);
    let from_cache = !query.force && state.cache.write().await.has(&key);

    let backend = state.backend.clone();
    let fetch_id = project_id.clone();
    let memoized = MemoizedQuery::new(state.cache.clone(), key, METRICS_CACHE_TTL, move || {
        let backend = backend.clone();
        let project_id = fetch_id.clone();
        async move { backend.fetch_metrics(&project_id).await }
    });

    let metrics = memoized.run(query.force).await?;
    Ok(Json(MetricsResponse {
        metrics,
        from_cache,
    }))
}

/// POST /projects/:id/metrics/sync
pub async fn sync_metrics(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<SyncMetricsRequest>,
) -> Result<impl IntoResponse, AnalyticsError> {
    request.validate().map_err(AnalyticsError::InvalidRequest)?;

    let mut adapters = state.adapters.write().await;
    let adapter = adapter_for(&state, &mut adapters, &project_id);
    let changed = adapter.update_metrics(request.metrics).await?;
    let version = adapter.version();

    info!(project = %project_id, changed, "metric sync push processed");
    Ok(Json(SyncResponse { changed, version }))
}

/// PATCH /projects/:id/metrics/:metric_id
pub async fn patch_metric(
    State(state): State<AppState>,
    Path((project_id, metric_id)): Path<(String, String)>,
    Json(patch): Json<MetricPatch>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let mut adapters = state.adapters.write().await;
    let adapter = adapter_for(&state, &mut adapters, &project_id);

    let updated = adapter.update_single_metric(&metric_id, &patch).await?;
    if !updated {
        return Err(AnalyticsError::MetricNotFound(metric_id));
    }

    Ok(Json(MetricsListResponse {
        metrics: adapter.metrics().to_vec(),
        version: adapter.version(),
    }))
}

/// DELETE /projects/:id/metrics/cache
pub async fn invalidate_metrics_cache(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    let mut adapters = state.adapters.write().await;
    match adapters.get_mut(&project_id) {
        Some(adapter) => adapter.invalidate_cache().await,
        // No adapter yet; still drop anything the read path cached.
        None => {
            state
                .cache
                .write()
                .await
                .invalidate(&metrics_cache_key(&project_id));
        }
    }
    Json(ClearResponse { cleared: true })
}

// == Transfer Handlers ==
/// GET /projects/:id/export
pub async fn export_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let project = state
        .backend
        .fetch_project(&project_id)
        .await?
        .ok_or_else(|| AnalyticsError::ProjectNotFound(project_id.clone()))?;
    let metrics = state.backend.fetch_metrics(&project_id).await?;

    let mut snapshots = Vec::new();
    for date in state.backend.list_snapshot_dates(&project_id).await? {
        if let Some(snapshot) = state.backend.fetch_snapshot(&project_id, date).await? {
            snapshots.push(snapshot);
        }
    }

    let layout = state.layout.read().await.export_layouts();
    let document = ExportDocument::build(&project, metrics, Some(snapshots), Some(layout));
    Ok(Json(document))
}

/// POST /projects/import
///
/// Takes the raw body so the document can be validated before any typed
/// deserialization; a rejected file mutates nothing.
pub async fn import_project(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, AnalyticsError> {
    let document = ExportDocument::parse(&body)?;
    let (project, metrics) = document.into_parts();
    let metrics_imported = metrics.len();

    let project = state.backend.insert_project(project, metrics).await?;
    info!(project = %project.id, metrics = metrics_imported, "project imported");

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            project,
            metrics_imported,
        }),
    ))
}

// == Layout Handlers ==
/// GET /layout/:tab/metrics
pub async fn layout_metrics(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> impl IntoResponse {
    let metrics = state.layout.read().await.metrics_for_tab(&tab);
    Json(LayoutMetricsResponse { tab, metrics })
}

/// GET /layout/:tab/charts
pub async fn layout_charts(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> impl IntoResponse {
    let charts = state.layout.read().await.charts_for_tab(&tab);
    Json(LayoutChartsResponse { tab, charts })
}

/// PUT /layout/:tab/metrics/:id/visibility
pub async fn set_metric_visibility(
    State(state): State<AppState>,
    Path((tab, metric_id)): Path<(String, String)>,
    Json(request): Json<VisibilityRequest>,
) -> impl IntoResponse {
    let applied = state
        .layout
        .write()
        .await
        .set_metric_visibility(&tab, &metric_id, request.visible);
    Json(LayoutUpdateResponse { applied })
}

/// POST /layout/:tab/metrics/:id/move
pub async fn move_metric(
    State(state): State<AppState>,
    Path((tab, metric_id)): Path<(String, String)>,
    Json(request): Json<MoveRequest>,
) -> impl IntoResponse {
    let applied = state
        .layout
        .write()
        .await
        .move_metric(&tab, &metric_id, request.direction);
    Json(LayoutUpdateResponse { applied })
}

/// PUT /layout/:tab/metrics/:id/variant
pub async fn set_metric_variant(
    State(state): State<AppState>,
    Path((tab, metric_id)): Path<(String, String)>,
    Json(request): Json<VariantRequest>,
) -> impl IntoResponse {
    let applied = state
        .layout
        .write()
        .await
        .set_metric_variant(&tab, &metric_id, request.variant);
    Json(LayoutUpdateResponse { applied })
}

/// PUT /layout/:tab/charts/:id/visibility
pub async fn set_chart_visibility(
    State(state): State<AppState>,
    Path((tab, chart_id)): Path<(String, String)>,
    Json(request): Json<VisibilityRequest>,
) -> impl IntoResponse {
    let applied = state
        .layout
        .write()
        .await
        .set_chart_visibility(&tab, &chart_id, request.visible);
    Json(LayoutUpdateResponse { applied })
}

/// PUT /layout/:tab/charts/:id/type
pub async fn set_chart_kind(
    State(state): State<AppState>,
    Path((tab, chart_id)): Path<(String, String)>,
    Json(request): Json<ChartKindRequest>,
) -> impl IntoResponse {
    let applied = state
        .layout
        .write()
        .await
        .set_chart_kind(&tab, &chart_id, request.kind);
    Json(LayoutUpdateResponse { applied })
}

/// POST /layout/:tab/metrics
pub async fn add_custom_metric(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Json(request): Json<AddCustomMetricRequest>,
) -> Result<impl IntoResponse, AnalyticsError> {
    request.validate().map_err(AnalyticsError::InvalidRequest)?;

    let slot = state
        .layout
        .write()
        .await
        .add_custom_metric(&tab, request.name.trim(), request.value_type)
        .ok_or_else(|| AnalyticsError::InvalidRequest(format!("Unknown tab: {tab}")))?;

    Ok((StatusCode::CREATED, Json(slot)))
}

/// POST /layout/:tab/reset
pub async fn reset_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> impl IntoResponse {
    let applied = state.layout.write().await.reset_tab(&tab);
    if applied {
        info!(%tab, "tab layout reset to defaults");
    }
    Json(LayoutUpdateResponse { applied })
}

// == Replay Handlers ==
/// GET /projects/:id/replay
pub async fn replay_status(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let mut replays = state.replays.write().await;
    let session = ensure_replay_session(&state, &mut replays, &project_id).await?;
    Ok(Json(ReplayStatusResponse::from_session(session)))
}

/// GET /projects/:id/replay/dates
pub async fn replay_dates(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let mut replays = state.replays.write().await;
    let session = ensure_replay_session(&state, &mut replays, &project_id).await?;
    Ok(Json(ReplayDatesResponse {
        dates: session.available_dates().to_vec(),
    }))
}

/// POST /projects/:id/replay/enter
///
/// A date without a stored snapshot yields 404 and leaves the session
/// exactly as it was.
pub async fn enter_replay(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<ReplayDateRequest>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let mut replays = state.replays.write().await;
    let session = ensure_replay_session(&state, &mut replays, &project_id).await?;
    session.enter(request.date).await?;
    Ok(Json(ReplayStatusResponse::from_session(session)))
}

/// POST /projects/:id/replay/navigate
pub async fn navigate_replay(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<ReplayDateRequest>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let mut replays = state.replays.write().await;
    let session = ensure_replay_session(&state, &mut replays, &project_id).await?;
    session.navigate_to(request.date).await?;
    Ok(Json(ReplayStatusResponse::from_session(session)))
}

/// POST /projects/:id/replay/exit
pub async fn exit_replay(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AnalyticsError> {
    let mut replays = state.replays.write().await;
    let session = ensure_replay_session(&state, &mut replays, &project_id).await?;
    session.exit();
    Ok(Json(ReplayStatusResponse::from_session(session)))
}

// == Helpers ==
/// Gets or creates the metrics adapter for a project.
fn adapter_for<'a>(
    state: &AppState,
    adapters: &'a mut HashMap<String, MetricsCacheAdapter>,
    project_id: &str,
) -> &'a mut MetricsCacheAdapter {
    adapters
        .entry(project_id.to_string())
        .or_insert_with(|| MetricsCacheAdapter::new(state.cache.clone(), project_id))
}

/// Gets or creates the replay session for a project, checking the project
/// exists before creating one.
async fn ensure_replay_session<'a>(
    state: &AppState,
    replays: &'a mut HashMap<String, ReplaySession>,
    project_id: &str,
) -> Result<&'a mut ReplaySession, AnalyticsError> {
    match replays.entry(project_id.to_string()) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            if state.backend.fetch_project(project_id).await?.is_none() {
                return Err(AnalyticsError::ProjectNotFound(project_id.to_string()));
            }
            let mut session = ReplaySession::new(state.backend.clone(), project_id);
            session.load_available_dates().await?;
            Ok(entry.insert(session))
        }
    }
}
