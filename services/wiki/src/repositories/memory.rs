//! In-memory store used by handler tests

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{DocumentStore, HealthCheck, SessionStore, UserStore};
use crate::models::{Document, DocumentField, NewDocument, NewUser, Session, User, UserField};

#[derive(Default)]
struct MemoryState {
    documents: Vec<Document>,
    users: Vec<User>,
    sessions: Vec<Session>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A single backing state implementing every store trait, so sessions can
/// join against users the way the SQL repositories do.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document_count(&self) -> usize {
        self.state.lock().await.documents.len()
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, document: &NewDocument) -> DatabaseResult<Document> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let document = Document {
            id: state.next_id(),
            title: document.title().to_string(),
            body: document.body().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.documents.push(document.clone());
        Ok(document)
    }

    async fn update(&self, id: i64, field: DocumentField, value: &str) -> DatabaseResult<()> {
        let mut state = self.state.lock().await;
        let document = state
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DatabaseError::NotFound)?;

        match field {
            DocumentField::Title => document.title = value.to_string(),
            DocumentField::Body => document.body = value.to_string(),
        }
        document.updated_at = Utc::now();
        Ok(())
    }

    async fn get_one(&self, id: i64) -> DatabaseResult<Document> {
        let state = self.state.lock().await;
        state
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_all(&self) -> DatabaseResult<Vec<Document>> {
        Ok(self.state.lock().await.documents.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &NewUser) -> DatabaseResult<User> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.username == user.username()) {
            return Err(DatabaseError::Conflict(format!(
                "username {} already exists",
                user.username()
            )));
        }

        let now = Utc::now();
        let user = User {
            id: state.next_id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            password_hash: user.password_hash().map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, field: UserField, value: &str) -> DatabaseResult<()> {
        let mut state = self.state.lock().await;
        let taken = state.users.iter().any(|u| u.username == value && u.id != id);
        if field == UserField::Username && taken {
            return Err(DatabaseError::Conflict(format!(
                "username {} already exists",
                value
            )));
        }

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DatabaseError::NotFound)?;

        match field {
            UserField::Username => user.username = value.to_string(),
            UserField::Email => user.email = value.to_string(),
        }
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn get_one(&self, id: i64) -> DatabaseResult<User> {
        let state = self.state.lock().await;
        state
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_one_by_username(&self, username: &str) -> DatabaseResult<User> {
        let state = self.state.lock().await;
        state
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_all(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.state.lock().await.users.clone())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, user_id: i64, token_hash: &str) -> DatabaseResult<Session> {
        let mut state = self.state.lock().await;
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(DatabaseError::Query(sqlx::Error::Protocol(format!(
                "user {} does not exist",
                user_id
            ))));
        }

        let session = Session {
            id: state.next_id(),
            user_id,
            token_hash: token_hash.to_string(),
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_username(&self, token_hash: &str) -> DatabaseResult<Option<String>> {
        let state = self.state.lock().await;
        let username = state
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash)
            .and_then(|s| state.users.iter().find(|u| u.id == s.user_id))
            .map(|u| u.username.clone());
        Ok(username)
    }

    async fn delete(&self, token_hash: &str) -> DatabaseResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.token_hash != token_hash);
        Ok(state.sessions.len() < before)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn is_healthy(&self) -> bool {
        true
    }
}
