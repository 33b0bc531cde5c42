//! Resource records and their create/update bodies
//!
//! One sub-module per collection. Each exposes the stored record, the request
//! bodies accepted by the HTTP layer and the normalized store inputs they turn into.

mod document;
mod file_reference;
mod group;
mod news;
mod project;
mod support_measure;

pub use document::*;
pub use file_reference::*;
pub use group::*;
pub use news::*;
pub use project::*;
pub use support_measure::*;
