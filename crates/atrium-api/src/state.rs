//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so each router only carries what its
//! handlers need: one store per resource collection, one ingestion endpoint
//! per upload route, and the credentials of the auth gate.

use crate::auth::AuthState;
use atrium_core::models::{Document, Group, News, Project, SupportMeasure};
use atrium_core::Config;
use atrium_db::{DocumentGroups, MemoryStore, PgStore, ResourceStore};
use atrium_processing::{IngestPipeline, MediaValidator};
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

/// One store per resource collection.
#[derive(Clone)]
pub struct Stores {
    pub documents: Arc<dyn ResourceStore<Document>>,
    pub news: Arc<dyn ResourceStore<News>>,
    pub projects: Arc<dyn ResourceStore<Project>>,
    pub support_measures: Arc<dyn ResourceStore<SupportMeasure>>,
    pub groups: Arc<dyn ResourceStore<Group>>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            documents: Arc::new(PgStore::<Document>::new(pool.clone())),
            news: Arc::new(PgStore::<News>::new(pool.clone())),
            projects: Arc::new(PgStore::<Project>::new(pool.clone())),
            support_measures: Arc::new(PgStore::<SupportMeasure>::new(pool.clone())),
            groups: Arc::new(PgStore::<Group>::new(pool)),
        }
    }

    /// In-process stores; documents check `groupId` against the group store.
    pub fn in_memory() -> Self {
        let groups = Arc::new(MemoryStore::<Group>::new());
        let relation = Arc::new(DocumentGroups::new(groups.clone()));

        Self {
            documents: Arc::new(MemoryStore::<Document>::with_relation(relation)),
            news: Arc::new(MemoryStore::<News>::new()),
            projects: Arc::new(MemoryStore::<Project>::new()),
            support_measures: Arc::new(MemoryStore::<SupportMeasure>::new()),
            groups,
        }
    }
}

/// Policy and pipeline behind one multipart upload route
#[derive(Clone)]
pub struct UploadEndpoint {
    pub field_name: &'static str,
    pub max_files: usize,
    pub validator: MediaValidator,
    pub pipeline: IngestPipeline,
}

#[derive(Clone)]
pub struct MediaState {
    pub images: UploadEndpoint,
    pub documents: UploadEndpoint,
}

pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub media: MediaState,
    pub auth: Arc<AuthState>,
}

impl FromRef<Arc<AppState>> for Stores {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.stores.clone()
    }
}

impl FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}
