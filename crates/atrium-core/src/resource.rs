//! Resource abstraction shared by stores and HTTP handlers.

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::query::ResourceSpec;
use crate::AppError;

/// Request body that normalizes into store input
pub trait RequestBody: DeserializeOwned + Validate + Send + 'static {
    type Output: Send + Sync + 'static;

    fn into_input(self) -> Result<Self::Output, AppError>;
}

/// A record type exposed as a resource collection
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    type Create: RequestBody;
    type Update: RequestBody;

    fn spec() -> &'static ResourceSpec;

    fn id(&self) -> i32;
}

pub type CreateInput<R> = <<R as Resource>::Create as RequestBody>::Output;
pub type UpdateInput<R> = <<R as Resource>::Update as RequestBody>::Output;
