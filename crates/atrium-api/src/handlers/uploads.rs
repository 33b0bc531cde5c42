//! Multipart upload endpoints for images and documents.

use crate::error::HttpAppError;
use crate::state::UploadEndpoint;
use crate::utils::upload::collect_files;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public paths in the order the files were sent
    pub file_paths: Vec<String>,
}

/// Validate, ingest and store one upload batch.
///
/// Mounted once per endpoint; the router state selects the policy.
#[tracing::instrument(skip_all, fields(operation = "upload", field = endpoint.field_name))]
pub async fn upload(
    State(endpoint): State<UploadEndpoint>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let files = collect_files(multipart?, &endpoint).await?;
    let file_paths = endpoint.pipeline.ingest(files).await?;
    Ok(Json(UploadResponse { file_paths }))
}
