//! Atrium Database Layer
//!
//! Store adapters behind the resource endpoints. [`ResourceStore`] is the
//! contract every controller is written against; [`PgStore`] backs it with
//! PostgreSQL and [`MemoryStore`] with an in-process map.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::{DocumentGroups, MemoryRecord, MemoryStore, Relation};
pub use postgres::{PgResource, PgStore};
pub use store::ResourceStore;
