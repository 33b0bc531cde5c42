//! Health check handlers and response types.

use crate::constants::HEALTH_CHECK_TIMEOUT;
use crate::state::{AppState, MediaState, Stores};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub(super) fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .with_state(state)
}

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    database: String,
    storage: String,
}

/// Liveness probe - process is running.
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Full health check: database round trip and writable storage for both upload roots.
async fn health_check(
    State(stores): State<Stores>,
    State(media): State<MediaState>,
) -> impl IntoResponse {
    let database = run_check(HEALTH_CHECK_TIMEOUT, stores.groups.ping(), "unhealthy").await;

    let images = media.images.pipeline.storage().clone();
    let documents = media.documents.pipeline.storage().clone();
    let storage = run_check(
        HEALTH_CHECK_TIMEOUT,
        async move {
            images.health_check().await?;
            documents.health_check().await
        },
        "degraded",
    )
    .await;

    let healthy = database == "healthy" && storage == "healthy";
    if !healthy {
        tracing::warn!(database = %database, storage = %storage, "Health check failed");
    }

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        database,
        storage,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
