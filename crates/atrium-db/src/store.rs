use async_trait::async_trait;
use atrium_core::{AppError, CreateInput, Filter, Resource, Sort, UpdateInput};

/// Persistence operations over one resource collection
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Number of records matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<i64, AppError>;

    /// Matching records in `sort` order, skipping `skip` rows. `take` of `None`
    /// returns every remaining row.
    async fn find_many(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: i64,
        take: Option<i64>,
    ) -> Result<Vec<R>, AppError>;

    async fn find_one(&self, id: i32) -> Result<Option<R>, AppError>;

    async fn create(&self, input: CreateInput<R>) -> Result<R, AppError>;

    /// Apply the present fields of `changes`. `None` when no record has `id`.
    async fn update(&self, id: i32, changes: UpdateInput<R>) -> Result<Option<R>, AppError>;

    /// `false` when no record has `id`.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
