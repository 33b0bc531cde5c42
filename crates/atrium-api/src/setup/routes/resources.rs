//! Resource collection routes under `/api`.

use crate::auth::{auth_middleware, AuthState};
use crate::constants::collection_path;
use crate::handlers::resource::{create, get_one, list, remove, update};
use crate::state::Stores;
use atrium_core::Resource;
use atrium_db::ResourceStore;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub(super) fn resource_routes(stores: &Stores, auth: Arc<AuthState>, json_limit: usize) -> Router {
    Router::new()
        .merge(collection(stores.documents.clone(), auth.clone()))
        .merge(collection(stores.news.clone(), auth.clone()))
        .merge(collection(stores.projects.clone(), auth.clone()))
        .merge(collection(stores.support_measures.clone(), auth.clone()))
        .merge(collection(stores.groups.clone(), auth))
        .layer(DefaultBodyLimit::max(json_limit))
}

/// Reads are public; writes pass the auth gate.
fn collection<R: Resource>(store: Arc<dyn ResourceStore<R>>, auth: Arc<AuthState>) -> Router {
    let base = collection_path(R::spec().name);
    let item = format!("{}/{{id}}", base);

    let public = Router::new()
        .route(&base, get(list::<R>))
        .route(&item, get(get_one::<R>));

    let protected = Router::new()
        .route(&base, post(create::<R>))
        .route(&item, put(update::<R>).delete(remove::<R>))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware));

    public.merge(protected).with_state(store)
}
