//! Atrium Processing Library
//!
//! Upload validation, WebP transcoding and the batch ingestion pipeline that
//! turns uploaded files into stored objects.

pub mod compression;
pub mod ingest;
pub mod naming;
pub mod validator;

pub use compression::{encode_webp, QualityPreset};
pub use ingest::{ConversionPolicy, IngestPipeline, ProcessingError, UploadFile};
pub use naming::sanitize_filename;
pub use validator::{extension_of, MediaValidator, ValidationError, ACCEPT_ANY};
