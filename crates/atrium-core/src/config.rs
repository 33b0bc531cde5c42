//! Configuration module
//!
//! Environment-driven configuration for the API server: HTTP, database,
//! authentication, file storage and upload limits.

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_SECRET_LENGTH: usize = 32;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server, database and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub run_migrations: bool,
    /// Static bearer token accepted by the auth gate
    pub admin_api_key: Option<String>,
    /// HS256 secret for bearer JWTs
    pub jwt_secret: Option<String>,
    pub max_json_body_bytes: usize,
    /// Requests served at once before new ones wait
    pub http_concurrency_limit: usize,
}

/// Limits and allow-lists for one upload endpoint
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub max_files: usize,
    /// Lower-cased extensions without the dot; a single `*` accepts any
    pub allowed_extensions: Vec<String>,
    /// Lower-cased MIME types; a single `*` accepts any
    pub allowed_content_types: Vec<String>,
}

impl UploadLimits {
    /// Upper bound for a whole multipart request body.
    pub fn max_request_bytes(&self) -> usize {
        // Headroom for multipart boundaries and part headers.
        const MULTIPART_OVERHEAD: usize = 64 * 1024;
        self.max_file_size_bytes
            .saturating_mul(self.max_files)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}

/// File storage and media ingestion settings
#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub storage_root: PathBuf,
    pub images: UploadLimits,
    /// Quality preset name used for WebP output
    pub image_quality: String,
    pub transcode_concurrency: usize,
    pub documents: UploadLimits,
}

impl MediaConfig {
    /// Directory holding ingested images, served under `/uploads`
    pub fn uploads_dir(&self) -> PathBuf {
        self.storage_root.join("uploads")
    }

    /// Directory holding uploaded documents, served under `/docs`
    pub fn docs_dir(&self) -> PathBuf {
        self.storage_root.join("docs")
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub media: MediaConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_JSON_BODY_MB: usize = 50;
        const MAX_UPLOAD_FILES: usize = 20;
        const MAX_IMAGE_SIZE_MB: usize = 48;
        const MAX_DOCUMENT_SIZE_MB: usize = 256;
        const TRANSCODE_CONCURRENCY: usize = 4;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let max_upload_files = parse_or("MAX_UPLOAD_FILES", MAX_UPLOAD_FILES);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins: split_list(&cors_origins_str, false),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            run_migrations: parse_or("RUN_MIGRATIONS", true),
            admin_api_key: non_empty_var("ADMIN_API_KEY"),
            jwt_secret: non_empty_var("JWT_SECRET"),
            max_json_body_bytes: parse_or("MAX_JSON_BODY_MB", MAX_JSON_BODY_MB) * 1024 * 1024,
            http_concurrency_limit: parse_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT),
            environment,
        };

        let media = MediaConfig {
            storage_root: PathBuf::from(
                env::var("STORAGE_ROOT").unwrap_or_else(|_| "public".to_string()),
            ),
            images: UploadLimits {
                max_file_size_bytes: parse_or("MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB) * 1024 * 1024,
                max_files: max_upload_files,
                allowed_extensions: list_or("IMAGE_ALLOWED_EXTENSIONS", "jpg,jpeg,png,gif"),
                allowed_content_types: list_or(
                    "IMAGE_ALLOWED_CONTENT_TYPES",
                    "image/jpeg,image/png,image/gif",
                ),
            },
            image_quality: env::var("IMAGE_QUALITY").unwrap_or_else(|_| "normal".to_string()),
            transcode_concurrency: parse_or("TRANSCODE_CONCURRENCY", TRANSCODE_CONCURRENCY),
            documents: UploadLimits {
                max_file_size_bytes: parse_or("MAX_DOCUMENT_SIZE_MB", MAX_DOCUMENT_SIZE_MB)
                    * 1024
                    * 1024,
                max_files: max_upload_files,
                allowed_extensions: list_or(
                    "DOCUMENT_ALLOWED_EXTENSIONS",
                    "pdf,doc,docx,xls,xlsx,ppt,pptx,odt,ods,odp,rtf,txt,csv,zip,rar,7z",
                ),
                allowed_content_types: list_or("DOCUMENT_ALLOWED_CONTENT_TYPES", "*"),
            },
        };

        let config = Config { base, media };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let base = &self.base;

        if !base.database_url.starts_with("postgres://")
            && !base.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if base.admin_api_key.is_none() && base.jwt_secret.is_none() {
            return Err(anyhow::anyhow!(
                "ADMIN_API_KEY or JWT_SECRET must be set for authentication"
            ));
        }

        for (name, value) in [
            ("ADMIN_API_KEY", &base.admin_api_key),
            ("JWT_SECRET", &base.jwt_secret),
        ] {
            if value.as_ref().is_some_and(|v| v.len() < MIN_SECRET_LENGTH) {
                return Err(anyhow::anyhow!(
                    "{} must be at least {} characters long",
                    name,
                    MIN_SECRET_LENGTH
                ));
            }
        }

        if base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        let media = &self.media;
        if media.images.max_files == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_FILES must be greater than zero"));
        }
        if media.transcode_concurrency == 0 {
            return Err(anyhow::anyhow!(
                "TRANSCODE_CONCURRENCY must be greater than zero"
            ));
        }
        if media.images.allowed_extensions.is_empty()
            || media.images.allowed_content_types.is_empty()
        {
            return Err(anyhow::anyhow!(
                "IMAGE_ALLOWED_EXTENSIONS and IMAGE_ALLOWED_CONTENT_TYPES must not be empty"
            ));
        }

        Ok(())
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn list_or(name: &str, default: &str) -> Vec<String> {
    split_list(&env::var(name).unwrap_or_else(|_| default.to_string()), true)
}

fn split_list(raw: &str, lowercase: bool) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if lowercase {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        })
        .collect()
}
