//! Atrium Core Library
//!
//! Domain models, error types, configuration and list-query parsing shared by
//! every Atrium crate.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod resource;

// Re-export commonly used types
pub use config::{BaseConfig, Config, MediaConfig, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use query::{
    Condition, FieldSpec, Filter, FilterKind, ListParams, Predicate, QuerySpec, RangeDescriptor,
    ResourceSpec, Sort, SortDirection, Window,
};
pub use resource::{CreateInput, RequestBody, Resource, UpdateInput};
