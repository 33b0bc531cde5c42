//! Batch ingestion: classify, transcode, store.
//!
//! Every file of a batch is prepared (GIFs kept byte-for-byte, other images
//! transcoded to WebP on the blocking pool with bounded parallelism) before
//! anything is written. Files are then written in input order; if a write
//! fails, the files already written for the batch are removed again.

use std::sync::Arc;

use atrium_storage::{Storage, StorageError};
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::compression::{encode_webp, QualityPreset};
use crate::naming::{storage_name, storage_name_with_extension};
use crate::validator::extension_of;

const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Ingestion failures. Every variant aborts the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("failed to transcode '{filename}': {reason}")]
    Transcode { filename: String, reason: String },

    #[error("transcoding task failed: {0}")]
    Task(String),

    #[error("failed to store '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// One buffered file of an upload batch
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// What happens to the bytes of an accepted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPolicy {
    /// Transcode to WebP, except GIFs which are stored unmodified
    WebpExceptGif { quality: QualityPreset },
    /// Store every file unmodified
    Passthrough,
}

enum Conversion {
    Keep,
    Webp(QualityPreset),
}

impl ConversionPolicy {
    fn conversion_for(self, filename: &str) -> Conversion {
        match self {
            ConversionPolicy::Passthrough => Conversion::Keep,
            ConversionPolicy::WebpExceptGif { quality } => {
                if extension_of(filename).as_deref() == Some("gif") {
                    Conversion::Keep
                } else {
                    Conversion::Webp(quality)
                }
            }
        }
    }
}

struct PreparedFile {
    key: String,
    content_type: String,
    data: Bytes,
}

/// Turns an upload batch into stored files and their public paths
#[derive(Clone)]
pub struct IngestPipeline {
    storage: Arc<dyn Storage>,
    policy: ConversionPolicy,
    concurrency: usize,
}

impl IngestPipeline {
    pub fn new(storage: Arc<dyn Storage>, policy: ConversionPolicy, concurrency: usize) -> Self {
        Self {
            storage,
            policy,
            concurrency: concurrency.max(1),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Store a batch and return public paths in input order.
    #[tracing::instrument(skip(self, files), fields(operation = "ingest", file_count = files.len()))]
    pub async fn ingest(&self, files: Vec<UploadFile>) -> Result<Vec<String>, ProcessingError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let prepared: Vec<PreparedFile> = stream::iter(files)
            .map(|file| self.prepare(file))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut written: Vec<String> = Vec::with_capacity(prepared.len());
        let mut paths = Vec::with_capacity(prepared.len());

        for file in prepared {
            match self
                .storage
                .put(&file.key, &file.content_type, file.data)
                .await
            {
                Ok(path) => {
                    written.push(file.key);
                    paths.push(path);
                }
                Err(source) => {
                    self.discard(&written).await;
                    return Err(ProcessingError::Storage {
                        key: file.key,
                        source,
                    });
                }
            }
        }

        tracing::info!(stored = paths.len(), "Upload batch stored");
        Ok(paths)
    }

    async fn prepare(&self, file: UploadFile) -> Result<PreparedFile, ProcessingError> {
        match self.policy.conversion_for(&file.filename) {
            Conversion::Keep => Ok(PreparedFile {
                key: storage_name(&file.filename),
                content_type: file.content_type,
                data: file.data,
            }),
            Conversion::Webp(quality) => {
                let data = file.data;
                let encoded = tokio::task::spawn_blocking(move || encode_webp(&data, quality))
                    .await
                    .map_err(|e| ProcessingError::Task(e.to_string()))?
                    .map_err(|e| ProcessingError::Transcode {
                        filename: file.filename.clone(),
                        reason: e.to_string(),
                    })?;

                tracing::debug!(
                    filename = %file.filename,
                    output_bytes = encoded.len(),
                    "Transcoded to WebP"
                );

                Ok(PreparedFile {
                    key: storage_name_with_extension(&file.filename, "webp"),
                    content_type: WEBP_CONTENT_TYPE.to_string(),
                    data: encoded,
                })
            }
        }
    }

    async fn discard(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(key = %key, error = %e, "Failed to remove file of aborted batch");
            }
        }
    }
}
