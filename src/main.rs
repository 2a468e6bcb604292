//! Atomic Analytics server
//!
//! Binary entry point: tracing initialization, configuration, shared
//! state, and the axum server with graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atomic_analytics::backend::{DashboardBackend, InMemoryBackend};
use atomic_analytics::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // == Tracing Setup ==
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atomic_analytics=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        port = config.port,
        default_ttl_ms = config.default_ttl_ms,
        seed_demo = config.seed_demo,
        "starting analytics service"
    );

    // == State Setup ==
    let backend: Arc<dyn DashboardBackend> = if config.seed_demo {
        Arc::new(InMemoryBackend::with_demo_data())
    } else {
        Arc::new(InMemoryBackend::new())
    };
    let state = AppState::new(backend, Duration::from_millis(config.default_ttl_ms));

    // == Server ==
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
