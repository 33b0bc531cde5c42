//! Upload endpoints and static serving of stored files.

use crate::handlers::uploads::upload;
use crate::state::{MediaState, UploadEndpoint};
use atrium_core::models::{DOCS_PREFIX, UPLOADS_PREFIX};
use atrium_core::{MediaConfig, UploadLimits};
use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

pub(super) fn upload_routes(media: &MediaState, config: &MediaConfig) -> Router {
    Router::new()
        .merge(upload_route(UPLOADS_PREFIX, media.images.clone(), &config.images))
        .merge(upload_route(DOCS_PREFIX, media.documents.clone(), &config.documents))
}

fn upload_route(path: &str, endpoint: UploadEndpoint, limits: &UploadLimits) -> Router {
    Router::new()
        .route(path, post(upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limits.max_request_bytes()))
        .with_state(endpoint)
}

/// `GET /uploads/<name>` and `GET /docs/<name>` from the storage root.
pub(super) fn static_routes(config: &MediaConfig) -> Router {
    let files = ServeDir::new(&config.storage_root);

    Router::new()
        .route_service(&format!("{}/{{*path}}", UPLOADS_PREFIX), files.clone())
        .route_service(&format!("{}/{{*path}}", DOCS_PREFIX), files)
}
