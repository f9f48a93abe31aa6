//! Repositories for database operations
//!
//! Each entity is reached through a store trait so handlers can be driven by
//! any backend; the PostgreSQL repositories are the production implementation.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{Document, DocumentField, NewDocument, NewUser, Session, User, UserField};

pub mod document;
pub mod health;
#[cfg(test)]
pub mod memory;
pub mod session;
pub mod user;

pub use document::DocumentRepository;
pub use health::DatabaseHealth;
pub use session::SessionRepository;
pub use user::UserRepository;

/// Persistence for wiki documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, stamping `created_at` and `updated_at` with the same instant
    async fn insert(&self, document: &NewDocument) -> DatabaseResult<Document>;

    /// Set a single field and refresh `updated_at`.
    ///
    /// Returns [`common::error::DatabaseError::NotFound`] when no document has `id`.
    async fn update(&self, id: i64, field: DocumentField, value: &str) -> DatabaseResult<()>;

    async fn get_one(&self, id: i64) -> DatabaseResult<Document>;

    /// All documents in primary-key order
    async fn get_all(&self) -> DatabaseResult<Vec<Document>>;
}

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &NewUser) -> DatabaseResult<User>;

    /// Set a single field and refresh `updated_at`
    async fn update(&self, id: i64, field: UserField, value: &str) -> DatabaseResult<()>;

    async fn get_one(&self, id: i64) -> DatabaseResult<User>;

    /// Exact, case-sensitive lookup used by login
    async fn get_one_by_username(&self, username: &str) -> DatabaseResult<User>;

    async fn get_all(&self) -> DatabaseResult<Vec<User>>;
}

/// Persistence for login sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, user_id: i64, token_hash: &str) -> DatabaseResult<Session>;

    /// Username of the session owner, `None` when no session has this token
    async fn get_username(&self, token_hash: &str) -> DatabaseResult<Option<String>>;

    /// Delete the session; true if a row was removed
    async fn delete(&self, token_hash: &str) -> DatabaseResult<bool>;
}

/// Liveness of the backing store, reported by `/health`
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn is_healthy(&self) -> bool;
}
