//! Test helpers: build AppState and router for integration tests.
//!
//! Stores are in-memory and files go to a temporary directory, so the suites
//! run without external services: `cargo test -p atrium-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use atrium_api::auth::AuthState;
use atrium_api::constants::collection_path;
use atrium_api::setup::{routes, storage};
use atrium_api::state::{AppState, Stores};
use atrium_core::{BaseConfig, Config, MediaConfig, UploadLimits};
use axum_test::TestServer;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// API path for a resource collection or one of its records.
pub fn api_path(resource: &str, id: Option<i64>) -> String {
    match id {
        Some(id) => format!("{}/{}", collection_path(resource), id),
        None => collection_path(resource),
    }
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_root(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Create a record through the API with the admin key; returns its JSON.
    pub async fn create(&self, resource: &str, body: Value) -> Value {
        let response = self
            .server
            .post(&api_path(resource, None))
            .add_header("Authorization", auth::admin_bearer())
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 200, "{}", response.text());
        response.json::<Value>()
    }
}

pub fn create_test_config(storage_root: &Path) -> Config {
    Config {
        base: BaseConfig {
            environment: "test".to_string(),
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            database_url: "postgres://localhost/atrium_test".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 1,
            run_migrations: false,
            admin_api_key: Some(auth::TEST_ADMIN_API_KEY.to_string()),
            jwt_secret: Some(auth::TEST_JWT_SECRET.to_string()),
            max_json_body_bytes: 1024 * 1024,
            http_concurrency_limit: 64,
        },
        media: MediaConfig {
            storage_root: storage_root.to_path_buf(),
            images: UploadLimits {
                max_file_size_bytes: 1024 * 1024,
                max_files: 20,
                allowed_extensions: vec![
                    "jpg".to_string(),
                    "jpeg".to_string(),
                    "png".to_string(),
                    "gif".to_string(),
                ],
                allowed_content_types: vec![
                    "image/jpeg".to_string(),
                    "image/png".to_string(),
                    "image/gif".to_string(),
                ],
            },
            image_quality: "normal".to_string(),
            transcode_concurrency: 2,
            documents: UploadLimits {
                max_file_size_bytes: 1024 * 1024,
                max_files: 20,
                allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
                allowed_content_types: vec!["*".to_string()],
            },
        },
    }
}

/// Setup test app with in-memory stores and local storage in a temp dir.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(temp_dir.path());
    setup_test_app_with(config, temp_dir).await
}

pub async fn setup_test_app_with(config: Config, temp_dir: TempDir) -> TestApp {
    let media = storage::setup_media(&config.media)
        .await
        .expect("Failed to set up media storage");

    let state = Arc::new(AppState {
        stores: Stores::in_memory(),
        media,
        auth: Arc::new(AuthState::from_config(&config.base)),
        config,
    });

    let router = routes::setup_routes(state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}
