//! Generic CRUD handlers shared by every resource collection.

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::list::{run_list, ListPage};
use atrium_core::{ListParams, RequestBody, Resource};
use atrium_db::ResourceStore;
use axum::{
    extract::{rejection::QueryRejection, FromRequestParts, Path, Query, State},
    http::request::Parts,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

/// Store handle every resource router is keyed on
pub type StoreState<R> = State<Arc<dyn ResourceStore<R>>>;

/// Integer record id from the `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(RecordId(id))
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[tracing::instrument(skip_all, fields(resource = R::spec().name, operation = "list"))]
pub async fn list<R: Resource>(
    State(store): StoreState<R>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<ListPage<R>, HttpAppError> {
    let Query(params) = query?;
    Ok(run_list(store.as_ref(), &params).await?)
}

#[tracing::instrument(skip_all, fields(resource = R::spec().name, operation = "get", id = id.0))]
pub async fn get_one<R: Resource>(
    State(store): StoreState<R>,
    id: RecordId,
) -> Result<Json<R>, HttpAppError> {
    let record = store
        .find_one(id.0)
        .await?
        .ok_or_else(|| R::spec().not_found())?;
    Ok(Json(record))
}

#[tracing::instrument(skip_all, fields(resource = R::spec().name, operation = "create"))]
pub async fn create<R: Resource>(
    State(store): StoreState<R>,
    ValidatedJson(body): ValidatedJson<R::Create>,
) -> Result<Json<R>, HttpAppError> {
    body.validate()?;
    let record = store.create(body.into_input()?).await?;
    tracing::info!(id = record.id(), "Record created");
    Ok(Json(record))
}

#[tracing::instrument(skip_all, fields(resource = R::spec().name, operation = "update", id = id.0))]
pub async fn update<R: Resource>(
    State(store): StoreState<R>,
    id: RecordId,
    ValidatedJson(body): ValidatedJson<R::Update>,
) -> Result<Json<R>, HttpAppError> {
    body.validate()?;
    let record = store
        .update(id.0, body.into_input()?)
        .await?
        .ok_or_else(|| R::spec().not_found())?;
    Ok(Json(record))
}

#[tracing::instrument(skip_all, fields(resource = R::spec().name, operation = "delete", id = id.0))]
pub async fn remove<R: Resource>(
    State(store): StoreState<R>,
    id: RecordId,
) -> Result<Json<DeletedResponse>, HttpAppError> {
    if !store.delete(id.0).await? {
        return Err(R::spec().not_found().into());
    }
    tracing::info!("Record deleted");
    Ok(Json(DeletedResponse {
        message: R::spec().deleted_message(),
    }))
}
