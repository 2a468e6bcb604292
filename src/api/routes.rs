//! API Routes
//!
//! Route table and middleware for the dashboard service.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};

// == Router Creation ==
/// Builds the application router with every endpoint and the middleware
/// stack (permissive CORS for the dashboard frontend, request tracing).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Cache diagnostics and invalidation
        .route("/cache/stats", get(handlers::cache_stats))
        .route("/cache/invalidate", post(handlers::invalidate_cache_pattern))
        .route("/cache", delete(handlers::clear_cache))
        // Projects and metrics
        .route("/projects/import", post(handlers::import_project))
        .route("/projects/:id", get(handlers::get_project))
        .route("/projects/:id/metrics", get(handlers::get_project_metrics))
        .route("/projects/:id/metrics/sync", post(handlers::sync_metrics))
        .route(
            "/projects/:id/metrics/cache",
            delete(handlers::invalidate_metrics_cache),
        )
        .route(
            "/projects/:id/metrics/:metric_id",
            patch(handlers::patch_metric),
        )
        .route("/projects/:id/export", get(handlers::export_project))
        // Replay mode
        .route("/projects/:id/replay", get(handlers::replay_status))
        .route("/projects/:id/replay/dates", get(handlers::replay_dates))
        .route("/projects/:id/replay/enter", post(handlers::enter_replay))
        .route(
            "/projects/:id/replay/navigate",
            post(handlers::navigate_replay),
        )
        .route("/projects/:id/replay/exit", post(handlers::exit_replay))
        // Layout configuration
        .route(
            "/layout/:tab/metrics",
            get(handlers::layout_metrics).post(handlers::add_custom_metric),
        )
        .route("/layout/:tab/charts", get(handlers::layout_charts))
        .route(
            "/layout/:tab/metrics/:id/visibility",
            put(handlers::set_metric_visibility),
        )
        .route("/layout/:tab/metrics/:id/move", post(handlers::move_metric))
        .route(
            "/layout/:tab/metrics/:id/variant",
            put(handlers::set_metric_variant),
        )
        .route(
            "/layout/:tab/charts/:id/visibility",
            put(handlers::set_chart_visibility),
        )
        .route("/layout/:tab/charts/:id/type", put(handlers::set_chart_kind))
        .route("/layout/:tab/reset", post(handlers::reset_tab))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
