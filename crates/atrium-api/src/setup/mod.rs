//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::AuthState;
use crate::state::{AppState, Stores};
use anyhow::Result;
use atrium_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.base.environment,
        production = config.is_production(),
        "Configuration loaded and validated successfully"
    );
    crate::error::set_production_mode(config.is_production());

    let pool = database::setup_database(&config).await?;
    let media = storage::setup_media(&config.media).await?;

    let state = Arc::new(AppState {
        stores: Stores::postgres(pool),
        media,
        auth: Arc::new(AuthState::from_config(&config.base)),
        config,
    });

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
