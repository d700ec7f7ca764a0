use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    categories::repo::{CategoryStore, PgCategoryStore},
    config::AppConfig,
    jobs::repo::{AssignmentStore, JobStore, PgAssignmentStore, PgJobStore},
    notifications::{Notifier, PgNotifier},
    users::repo::{PgUserStore, UserStore},
    workers::repo::{DocumentStore, PgDocumentStore, PgWorkerStore, WorkerStore},
};

/// Shared handles injected into every handler. Services are built from it
/// through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub jobs: Arc<dyn JobStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub workers: Arc<dyn WorkerStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            config,
            users: Arc::new(PgUserStore::new(db.clone())),
            jobs: Arc::new(PgJobStore::new(db.clone())),
            assignments: Arc::new(PgAssignmentStore::new(db.clone())),
            workers: Arc::new(PgWorkerStore::new(db.clone())),
            documents: Arc::new(PgDocumentStore::new(db.clone())),
            categories: Arc::new(PgCategoryStore::new(db.clone())),
            notifier: Arc::new(PgNotifier::new(db)),
        }
    }
}
