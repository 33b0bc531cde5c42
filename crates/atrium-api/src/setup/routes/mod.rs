//! Route configuration and setup.
//!
//! Resource collections live in [resources](resources), upload and static
//! file routes in [media](media), health checks in [health](health).

mod health;
mod media;
mod resources;

use crate::state::AppState;
use atrium_core::Config;
use axum::{
    http::{header::CONTENT_RANGE, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let config = &state.config;
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.base.http_concurrency_limit;
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = Router::new()
        .merge(resources::resource_routes(
            &state.stores,
            state.auth.clone(),
            config.base.max_json_body_bytes,
        ))
        .merge(media::upload_routes(&state.media, &config.media))
        .merge(media::static_routes(&config.media))
        .merge(health::health_routes(state.clone()))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.base.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .base
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    Ok(cors
        .allow_methods(methods)
        .allow_headers(Any)
        .expose_headers([CONTENT_RANGE]))
}
