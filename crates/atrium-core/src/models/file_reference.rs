use serde::{Deserialize, Deserializer};

use crate::AppError;

/// Public prefix for ingested images
pub const UPLOADS_PREFIX: &str = "/uploads";
/// Public prefix for uploaded documents
pub const DOCS_PREFIX: &str = "/docs";

/// Descriptor of a file picked on the client but referenced by relative path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFile {
    pub path: String,
}

/// File field value: either an already-served path or a pending file descriptor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileReference {
    Path(String),
    Pending {
        #[serde(rename = "rawFile")]
        raw_file: RawFile,
    },
}

impl FileReference {
    /// Rewrite into a served path. Plain paths pass through untouched.
    pub fn resolve(&self, prefix: &str) -> Result<String, AppError> {
        match self {
            FileReference::Path(path) => Ok(path.clone()),
            FileReference::Pending { raw_file } => {
                let relative = raw_file
                    .path
                    .trim_start_matches("./")
                    .trim_start_matches('/');

                if relative.is_empty() {
                    return Err(AppError::InvalidInput(
                        "rawFile.path must not be empty".to_string(),
                    ));
                }
                if relative.split(['/', '\\']).any(|segment| segment == "..") {
                    return Err(AppError::InvalidInput(
                        "rawFile.path must not contain '..' segments".to_string(),
                    ));
                }

                Ok(format!("{}/{}", prefix.trim_end_matches('/'), relative))
            }
        }
    }
}

/// Normalize an image array field.
pub fn resolve_images(images: &[FileReference]) -> Result<Vec<String>, AppError> {
    images.iter().map(|image| image.resolve(UPLOADS_PREFIX)).collect()
}

/// A single value or an array of values; only the first element of an array is used
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.first(),
        }
    }
}

/// Normalize a document `src` field.
pub fn resolve_document_source(src: &OneOrMany<FileReference>) -> Result<String, AppError> {
    src.first()
        .ok_or_else(|| AppError::InvalidInput("src must not be an empty array".to_string()))?
        .resolve(DOCS_PREFIX)
}

/// Accept an integer or a numeric string, as sent by admin form inputs.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid id '{}'", s))),
    }
}
