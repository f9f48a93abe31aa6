//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    repositories::{
        DatabaseHealth, DocumentRepository, DocumentStore, HealthCheck, SessionRepository,
        UserRepository, UserStore,
    },
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: SessionManager,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// State backed by the PostgreSQL repositories
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            documents: Arc::new(DocumentRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            sessions: SessionManager::new(Arc::new(SessionRepository::new(pool.clone()))),
            health: Arc::new(DatabaseHealth::new(pool)),
        }
    }
}
