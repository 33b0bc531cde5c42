//! Common utilities for file upload handlers

use crate::error::HttpAppError;
use crate::state::UploadEndpoint;
use atrium_core::AppError;
use atrium_processing::UploadFile;
use axum::extract::multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Collect every file of a multipart upload for `endpoint`.
///
/// Text fields are skipped. Names, types and counts are checked on the part
/// headers, before the part body is read, so a rejected batch is never
/// buffered in full.
pub async fn collect_files(
    mut multipart: Multipart,
    endpoint: &UploadEndpoint,
) -> Result<Vec<UploadFile>, HttpAppError> {
    let mut files = Vec::new();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let field_name = field.name().unwrap_or_default();
        if field_name != endpoint.field_name {
            return Err(AppError::BadRequest(format!(
                "Unexpected file field '{}', expected '{}'",
                field_name, endpoint.field_name
            ))
            .into());
        }

        if files.len() >= endpoint.max_files {
            return Err(AppError::BadRequest(format!(
                "Too many files: at most {} per request",
                endpoint.max_files
            ))
            .into());
        }

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        endpoint
            .validator
            .validate_declared(&filename, &content_type)?;

        let data = read_field(&mut field, endpoint.validator.max_file_size()).await?;
        endpoint.validator.validate_file_size(data.len())?;

        tracing::debug!(
            filename = %filename,
            content_type = %content_type,
            size = data.len(),
            "Received upload part"
        );

        files.push(UploadFile {
            filename,
            content_type,
            data,
        });
    }

    Ok(files)
}

/// Buffer one part, failing as soon as it grows past `max_size`.
async fn read_field(field: &mut Field<'_>, max_size: usize) -> Result<Bytes, HttpAppError> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field.chunk().await? {
        if buffer.len() + chunk.len() > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum size of {} bytes",
                max_size
            ))
            .into());
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}
