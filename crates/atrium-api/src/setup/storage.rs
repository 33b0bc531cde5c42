//! Storage setup and initialization

use crate::constants::{DOCS_FIELD, IMAGES_FIELD};
use crate::state::{MediaState, UploadEndpoint};
use anyhow::{Context, Result};
use atrium_core::models::{DOCS_PREFIX, UPLOADS_PREFIX};
use atrium_core::{MediaConfig, UploadLimits};
use atrium_processing::{ConversionPolicy, IngestPipeline, MediaValidator, QualityPreset};
use atrium_storage::{LocalStorage, Storage};
use std::path::PathBuf;
use std::sync::Arc;

/// Create the storage directories and the ingestion endpoints behind them.
pub async fn setup_media(config: &MediaConfig) -> Result<MediaState> {
    let quality = QualityPreset::parse(&config.image_quality)?;

    let images = endpoint(
        IMAGES_FIELD,
        config.uploads_dir(),
        UPLOADS_PREFIX,
        &config.images,
        ConversionPolicy::WebpExceptGif { quality },
        config.transcode_concurrency,
    )
    .await?;

    let documents = endpoint(
        DOCS_FIELD,
        config.docs_dir(),
        DOCS_PREFIX,
        &config.documents,
        ConversionPolicy::Passthrough,
        config.transcode_concurrency,
    )
    .await?;

    tracing::info!(
        storage_root = %config.storage_root.display(),
        image_quality = ?quality,
        max_image_mb = config.images.max_file_size_bytes / 1024 / 1024,
        max_document_mb = config.documents.max_file_size_bytes / 1024 / 1024,
        max_files = config.images.max_files,
        "Media storage initialized"
    );

    Ok(MediaState { images, documents })
}

async fn endpoint(
    field_name: &'static str,
    directory: PathBuf,
    public_prefix: &str,
    limits: &UploadLimits,
    policy: ConversionPolicy,
    concurrency: usize,
) -> Result<UploadEndpoint> {
    let local = LocalStorage::new(&directory, public_prefix)
        .await
        .with_context(|| format!("Failed to prepare {}", directory.display()))?;
    tracing::debug!(
        field = field_name,
        directory = %local.base_path().display(),
        public_prefix = public_prefix,
        "Upload endpoint ready"
    );
    let storage: Arc<dyn Storage> = Arc::new(local);

    Ok(UploadEndpoint {
        field_name,
        max_files: limits.max_files,
        validator: MediaValidator::new(
            limits.max_file_size_bytes,
            limits.allowed_extensions.clone(),
            limits.allowed_content_types.clone(),
        ),
        pipeline: IngestPipeline::new(storage, policy, concurrency),
    })
}
