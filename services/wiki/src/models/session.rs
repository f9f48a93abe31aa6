//! Session model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Session entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    /// The session token exactly as the client presents it
    pub token_hash: String,
}

/// Identity attached to every request by the session middleware
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub is_authenticated: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_authenticated: true,
        }
    }
}
