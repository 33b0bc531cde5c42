//! Atrium Storage Library
//!
//! File storage behind the upload endpoints. Objects are addressed by flat
//! keys (a single file name) and every backend reports the public path an
//! object is served at.

pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
