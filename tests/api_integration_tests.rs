//! API Integration Tests
//!
//! Full-cycle tests driving the HTTP surface through tower's oneshot,
//! backed by the demo-seeded in-memory backend. The router is cloned per
//! request; all clones share the same state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use atomic_analytics::backend::{DashboardBackend, InMemoryBackend};
use atomic_analytics::{create_router, AppState};

// == Test Helpers ==
fn demo_app() -> Router {
    let backend: Arc<dyn DashboardBackend> = Arc::new(InMemoryBackend::with_demo_data());
    let state = AppState::new(backend, Duration::from_millis(300_000));
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn send(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

// == Health and Cache Diagnostics ==
#[tokio::test]
async fn test_health_returns_ok() {
    let app = demo_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cache_stats_track_the_metrics_key() {
    let app = demo_app();

    app.clone()
        .oneshot(get("/projects/demo/metrics"))
        .await
        .unwrap();

    let response = app.oneshot(get("/cache/stats")).await.unwrap();
    let body = body_json(response).await;

    assert!(body["size"].as_u64().unwrap() >= 1);
    let keys: Vec<String> = body["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap().to_string())
        .collect();
    assert!(keys.contains(&"metrics-demo".to_string()));
}

#[tokio::test]
async fn test_pattern_invalidation_endpoint() {
    let app = demo_app();
    app.clone()
        .oneshot(get("/projects/demo/metrics"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/cache/invalidate",
            json!({ "pattern": "metrics-" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["removed"], 1);

    let stats = body_json(app.oneshot(get("/cache/stats")).await.unwrap()).await;
    assert_eq!(stats["size"], 0);
}

#[tokio::test]
async fn test_empty_pattern_is_rejected() {
    let app = demo_app();

    let response = app
        .oneshot(send_json(
            "POST",
            "/cache/invalidate",
            json!({ "pattern": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Pattern"));
}

#[tokio::test]
async fn test_clear_cache_endpoint() {
    let app = demo_app();
    app.clone()
        .oneshot(get("/projects/demo/metrics"))
        .await
        .unwrap();

    let response = app.clone().oneshot(send("DELETE", "/cache")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(app.oneshot(get("/cache/stats")).await.unwrap()).await;
    assert_eq!(stats["size"], 0);
}

// == Projects and Metrics ==
#[tokio::test]
async fn test_get_project_and_unknown_project() {
    let app = demo_app();

    let response = app.clone().oneshot(get("/projects/demo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "demo");

    let response = app.oneshot(get("/projects/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_metrics_read_through_then_cache_hit() {
    let app = demo_app();

    let first = body_json(
        app.clone()
            .oneshot(get("/projects/demo/metrics"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first["from_cache"], false);
    assert!(!first["metrics"].as_array().unwrap().is_empty());

    let second = body_json(
        app.clone()
            .oneshot(get("/projects/demo/metrics"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["from_cache"], true);
    assert_eq!(second["metrics"], first["metrics"]);

    let forced = body_json(
        app.oneshot(get("/projects/demo/metrics?force=true"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(forced["from_cache"], false);
}

#[tokio::test]
async fn test_sync_reports_changed_only_on_real_change() {
    let app = demo_app();
    let list = json!({ "metrics": [
        { "id": "revenue", "name": "Revenue", "value": 1000.0, "value_type": "currency" }
    ]});

    let first = body_json(
        app.clone()
            .oneshot(send_json("POST", "/projects/p1/metrics/sync", list.clone()))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first["changed"], true);

    let second = body_json(
        app.clone()
            .oneshot(send_json("POST", "/projects/p1/metrics/sync", list))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["changed"], false);

    let bumped = json!({ "metrics": [
        { "id": "revenue", "name": "Revenue", "value": 1250.0, "value_type": "currency" }
    ]});
    let third = body_json(
        app.oneshot(send_json("POST", "/projects/p1/metrics/sync", bumped))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(third["changed"], true);
}

#[tokio::test]
async fn test_patch_metric_and_unknown_metric() {
    let app = demo_app();
    let list = json!({ "metrics": [
        { "id": "cpl", "name": "CPL", "value": 4.8, "value_type": "currency" }
    ]});
    app.clone()
        .oneshot(send_json("POST", "/projects/p1/metrics/sync", list))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            "/projects/p1/metrics/cpl",
            json!({ "value": 5.2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["metrics"][0]["value"], 5.2);
    assert_eq!(body["metrics"][0]["name"], "CPL");

    let response = app
        .oneshot(send_json(
            "PATCH",
            "/projects/p1/metrics/ghost",
            json!({ "value": 1.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_cache_delete_endpoint() {
    let app = demo_app();
    app.clone()
        .oneshot(get("/projects/demo/metrics"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send("DELETE", "/projects/demo/metrics/cache"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(app.oneshot(get("/cache/stats")).await.unwrap()).await;
    let keys = stats["keys"].as_array().unwrap();
    assert!(!keys.iter().any(|k| k == "metrics-demo"));
}

// == Replay Mode ==
#[tokio::test]
async fn test_replay_enter_navigate_exit() {
    let app = demo_app();

    let entered = body_json(
        app.clone()
            .oneshot(send_json(
                "POST",
                "/projects/demo/replay/enter",
                json!({ "date": "2024-11-02" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(entered["mode"], "replay");
    assert_eq!(entered["date"], "2024-11-02");
    assert_eq!(entered["previous_date"], "2024-11-01");
    assert_eq!(entered["next_date"], "2024-11-03");
    assert!(entered["snapshot"]["metrics"].as_array().is_some());

    let navigated = body_json(
        app.clone()
            .oneshot(send_json(
                "POST",
                "/projects/demo/replay/navigate",
                json!({ "date": "2024-11-01" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(navigated["mode"], "replay");
    assert_eq!(navigated["date"], "2024-11-01");
    assert!(navigated.get("previous_date").is_none());
    assert_eq!(navigated["next_date"], "2024-11-02");

    let exited = body_json(
        app.oneshot(send("POST", "/projects/demo/replay/exit"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(exited["mode"], "live");
    assert!(exited.get("snapshot").is_none());
}

#[tokio::test]
async fn test_replay_enter_missing_snapshot_stays_live() {
    let app = demo_app();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/projects/demo/replay/enter",
            json!({ "date": "2024-12-25" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("2024-12-25"));

    let status = body_json(app.oneshot(get("/projects/demo/replay")).await.unwrap()).await;
    assert_eq!(status["mode"], "live");
}

#[tokio::test]
async fn test_replay_dates_and_unknown_project() {
    let app = demo_app();

    let dates = body_json(
        app.clone()
            .oneshot(get("/projects/demo/replay/dates"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(
        dates["dates"],
        json!(["2024-11-01", "2024-11-02", "2024-11-03"])
    );

    let response = app.oneshot(get("/projects/ghost/replay")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Layout ==
#[tokio::test]
async fn test_layout_listing_and_visibility_toggle() {
    let app = demo_app();

    let listed = body_json(
        app.clone()
            .oneshot(get("/layout/overview/metrics"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["tab"], "overview");
    assert_eq!(listed["metrics"][0]["id"], "revenue");

    let toggled = body_json(
        app.clone()
            .oneshot(send_json(
                "PUT",
                "/layout/overview/metrics/revenue/visibility",
                json!({ "visible": false }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(toggled["applied"], true);

    let after = body_json(
        app.clone()
            .oneshot(get("/layout/overview/metrics"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(after["metrics"][0]["visible"], false);

    let ghost = body_json(
        app.oneshot(send_json(
            "PUT",
            "/layout/overview/metrics/ghost/visibility",
            json!({ "visible": false }),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(ghost["applied"], false);
}

#[tokio::test]
async fn test_layout_move_then_reset() {
    let app = demo_app();

    let moved = body_json(
        app.clone()
            .oneshot(send_json(
                "POST",
                "/layout/overview/metrics/roas/move",
                json!({ "direction": "up" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(moved["applied"], true);

    let reordered = body_json(
        app.clone()
            .oneshot(get("/layout/overview/metrics"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(reordered["metrics"][1]["id"], "roas");
    assert_eq!(reordered["metrics"][2]["id"], "ad_spend");

    app.clone()
        .oneshot(send("POST", "/layout/overview/reset"))
        .await
        .unwrap();

    let restored = body_json(app.oneshot(get("/layout/overview/metrics")).await.unwrap()).await;
    assert_eq!(restored["metrics"][1]["id"], "ad_spend");
    assert_eq!(restored["metrics"][2]["id"], "roas");
}

#[tokio::test]
async fn test_add_custom_metric_to_funnel_tab() {
    let app = demo_app();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/layout/funnel/metrics",
            json!({ "name": "Taxa X", "value_type": "percent" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let slot = body_json(response).await;
    assert_eq!(slot["position"], 9);
    assert_eq!(slot["visible"], true);
    assert_eq!(slot["variant"], "card");
    assert_eq!(slot["label"], "Taxa X");

    let blank = app
        .oneshot(send_json(
            "POST",
            "/layout/funnel/metrics",
            json!({ "name": "  ", "value_type": "count" }),
        ))
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chart_kind_update() {
    let app = demo_app();

    let updated = body_json(
        app.clone()
            .oneshot(send_json(
                "PUT",
                "/layout/overview/charts/leads_by_day/type",
                json!({ "type": "pie" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(updated["applied"], true);

    let charts = body_json(app.oneshot(get("/layout/overview/charts")).await.unwrap()).await;
    let leads_chart = charts["charts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == "leads_by_day")
        .unwrap();
    assert_eq!(leads_chart["type"], "pie");
}

// == Export / Import ==
#[tokio::test]
async fn test_export_then_import_creates_a_new_project() {
    let app = demo_app();

    let response = app
        .clone()
        .oneshot(get("/projects/demo/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let document = body_json(response).await;
    assert_eq!(document["version"], 1);
    assert!(document["metrics"].as_array().is_some());
    assert_eq!(document["snapshots"].as_array().unwrap().len(), 3);
    assert!(document["layout"]["funnel"].is_object());

    let response = app
        .clone()
        .oneshot(send_json("POST", "/projects/import", document.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let imported = body_json(response).await;
    let new_id = imported["project"]["id"].as_str().unwrap().to_string();
    assert_ne!(new_id, "demo");
    assert_eq!(
        imported["metrics_imported"].as_u64().unwrap() as usize,
        document["metrics"].as_array().unwrap().len()
    );

    let response = app
        .oneshot(get(&format!("/projects/{new_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_import_rejects_invalid_documents() {
    let app = demo_app();

    let cases = vec![
        (
            json!({ "project": { "name": "X" }, "metrics": [] }),
            "missing format version",
        ),
        (
            json!({
                "version": 1,
                "exported_at": "2024-11-03T12:00:00Z",
                "project": { "name": " " },
                "metrics": []
            }),
            "missing project name",
        ),
        (
            json!({
                "version": 1,
                "exported_at": "2024-11-03T12:00:00Z",
                "project": { "name": "X" },
                "metrics": {}
            }),
            "missing metrics array",
        ),
        (
            json!({
                "version": 9,
                "exported_at": "2024-11-03T12:00:00Z",
                "project": { "name": "X" },
                "metrics": []
            }),
            "unsupported format version",
        ),
    ];

    for (document, expected) in cases {
        let response = app
            .clone()
            .oneshot(send_json("POST", "/projects/import", document))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["error"].as_str().unwrap().contains(expected),
            "expected error containing {expected:?}, got {}",
            body["error"]
        );
    }
}

#[tokio::test]
async fn test_import_of_plain_text_is_rejected() {
    let app = demo_app();

    let request = Request::builder()
        .method("POST")
        .uri("/projects/import")
        .header("content-type", "application/json")
        .body(Body::from("metrics: revenue"))
        .expect("request");

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not valid JSON"));
}
