use std::path::Path;

/// Wildcard entry accepting any extension or content type
pub const ACCEPT_ANY: &str = "*";

/// Common validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Lower-cased extension of a file name, without the dot.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Upload file validator
///
/// Checks declared names and content types against allow-lists before any
/// byte is read, and sizes once the content is buffered.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        if accepts_any(&self.allowed_extensions) {
            return Ok(());
        }

        let extension = extension_of(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate content type, ignoring parameters such as `charset`
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if accepts_any(&self.allowed_content_types) {
            return Ok(());
        }

        let normalized = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if !self.allowed_content_types.contains(&normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Checks that only need the part headers
    pub fn validate_declared(&self, filename: &str, content_type: &str) -> Result<(), ValidationError> {
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)
    }
}

fn accepts_any(allowed: &[String]) -> bool {
    allowed.iter().any(|entry| entry == ACCEPT_ANY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_validator() -> MediaValidator {
        MediaValidator::new(
            1024,
            vec!["jpg".into(), "jpeg".into(), "png".into(), "gif".into()],
            vec!["image/jpeg".into(), "image/png".into(), "image/gif".into()],
        )
    }

    #[test]
    fn test_validate_file_size() {
        let validator = image_validator();
        assert!(validator.validate_file_size(512).is_ok());
        assert!(validator.validate_file_size(1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(1025),
            Err(ValidationError::FileTooLarge { size: 1025, max: 1024 })
        ));
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let validator = image_validator();
        assert!(validator.validate_extension("PHOTO.JPG").is_ok());
        assert!(validator.validate_extension("anim.Gif").is_ok());
        assert!(matches!(
            validator.validate_extension("script.svg"),
            Err(ValidationError::InvalidExtension { .. })
        ));
        assert!(matches!(
            validator.validate_extension("noextension"),
            Err(ValidationError::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_content_type_ignores_parameters() {
        let validator = image_validator();
        assert!(validator.validate_content_type("IMAGE/PNG").is_ok());
        assert!(validator.validate_content_type("image/jpeg; q=1").is_ok());
        assert!(validator.validate_content_type("text/html").is_err());
    }

    #[test]
    fn test_declared_requires_extension_and_type() {
        let validator = image_validator();
        assert!(validator.validate_declared("a.png", "image/png").is_ok());
        assert!(validator.validate_declared("a.png", "application/pdf").is_err());
        assert!(validator.validate_declared("a.pdf", "image/png").is_err());
    }

    #[test]
    fn test_wildcard_accepts_everything() {
        let validator = MediaValidator::new(1024, vec!["pdf".into()], vec![ACCEPT_ANY.into()]);
        assert!(validator.validate_declared("report.pdf", "application/x-anything").is_ok());
        assert!(validator.validate_declared("report.exe", "application/pdf").is_err());

        let validator = MediaValidator::new(1024, vec![ACCEPT_ANY.into()], vec![ACCEPT_ANY.into()]);
        assert!(validator.validate_declared("noextension", "").is_ok());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.b.JPEG"), Some("jpeg".to_string()));
        assert_eq!(extension_of("plain"), None);
        assert_eq!(extension_of(".hidden"), None);
    }
}
