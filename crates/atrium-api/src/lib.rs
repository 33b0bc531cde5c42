//! Atrium API Library
//!
//! This crate provides the HTTP handlers, the auth gate and application setup.

pub mod constants;
mod handlers;
pub mod setup;
pub mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, MediaState, Stores, UploadEndpoint};
