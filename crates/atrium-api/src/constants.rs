//! API constants
//!
//! Route prefixes, multipart field names and probe timeouts shared by the
//! router setup and the handlers.

use std::time::Duration;

/// API base path prefix for resource collections
pub const API_BASE: &str = "/api";

/// Multipart field carrying images on `POST /uploads`
pub const IMAGES_FIELD: &str = "images";

/// Multipart field carrying documents on `POST /docs`
pub const DOCS_FIELD: &str = "docs";

/// Upper bound for each dependency probe of the health check
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Path of a resource collection, e.g. `/api/docs`.
pub fn collection_path(resource: &str) -> String {
    format!("{}/{}", API_BASE, resource)
}
