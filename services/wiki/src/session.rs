//! Session management backed by the sessions table
//!
//! A session token is the URL-safe base64 encoding of the SHA-256 digest of
//! 32 bytes read from the OS random source. The token is what the client
//! keeps in its `session` cookie and what the store keeps in `token_hash`;
//! the raw random bytes are dropped as soon as the digest is taken.

use axum_extra::extract::cookie::Cookie;
use base64ct::{Base64Url, Encoding};
use common::error::DatabaseError;
use cookie::time::Duration;
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::{models::Identity, repositories::SessionStore};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

const TOKEN_BYTES: usize = 32;

/// Errors raised while opening a session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The OS random source could not fill the token buffer
    #[error("Failed to read random bytes for session token: {0}")]
    Entropy(#[from] rand::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Mint a fresh session token
pub fn generate_token() -> Result<String, rand::Error> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(encode_digest(&bytes))
}

fn encode_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    Base64Url::encode_string(&digest)
}

/// Session manager for creating, resolving and deleting login sessions
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Open a session for `user_id` and return the token to hand to the client
    pub async fn create_session(&self, user_id: i64) -> Result<String, SessionError> {
        let token = generate_token()?;
        self.store.insert(user_id, &token).await?;

        info!("Created session for user: {}", user_id);
        Ok(token)
    }

    /// Resolve a token to the identity of its owner.
    ///
    /// Unknown tokens and store failures both resolve to the anonymous identity.
    pub async fn resolve_session(&self, token: &str) -> Identity {
        match self.store.get_username(token).await {
            Ok(Some(username)) => Identity::authenticated(username),
            Ok(None) => Identity::anonymous(),
            Err(e) => {
                warn!("Failed to resolve session, continuing anonymously: {}", e);
                Identity::anonymous()
            }
        }
    }

    /// Delete the session for `token`; failures are logged and swallowed
    pub async fn delete_session(&self, token: &str) {
        match self.store.delete(token).await {
            Ok(true) => info!("Deleted session"),
            Ok(false) => warn!("Logout for a session that does not exist"),
            Err(e) => warn!("Failed to delete session: {}", e),
        }
    }
}

/// Cookie carrying `token`: HttpOnly, path `/`, no expiry
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Cookie that makes the client drop its session cookie
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::NewUser,
        repositories::{UserStore, memory::MemoryStore},
    };

    async fn manager_with_user(username: &str) -> (SessionManager, MemoryStore, i64) {
        let store = MemoryStore::new();
        let user = UserStore::insert(
            &store,
            &NewUser::new(username, "someone@example.com", None).unwrap(),
        )
        .await
        .unwrap();

        (SessionManager::new(Arc::new(store.clone())), store, user.id)
    }

    #[test]
    fn test_token_is_url_safe_digest() {
        let token = generate_token().unwrap();
        assert_eq!(token.len(), 44);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let first = generate_token().unwrap();
        let second = generate_token().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_encode_digest_is_sha256() {
        // SHA-256 of 32 zero bytes
        assert_eq!(
            encode_digest(&[0u8; 32]),
            "Zmh6rfhivXdsj8GLjp-OIAiXFIVu4jOzkCpZHQ1fKSU="
        );
    }

    #[tokio::test]
    async fn test_created_session_resolves_to_owner() {
        let (manager, _store, user_id) = manager_with_user("alice").await;

        let token = manager.create_session(user_id).await.unwrap();
        let identity = manager.resolve_session(&token).await;

        assert!(identity.is_authenticated);
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let (manager, _store, _user_id) = manager_with_user("alice").await;

        let token = generate_token().unwrap();
        let identity = manager.resolve_session(&token).await;

        assert_eq!(identity, Identity::anonymous());
    }

    #[tokio::test]
    async fn test_deleted_session_no_longer_resolves() {
        let (manager, store, user_id) = manager_with_user("alice").await;

        let token = manager.create_session(user_id).await.unwrap();
        manager.delete_session(&token).await;

        assert!(!manager.resolve_session(&token).await.is_authenticated);
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_deleting_unknown_session_is_silent() {
        let (manager, _store, _user_id) = manager_with_user("alice").await;
        manager.delete_session("missing").await;
    }

    #[tokio::test]
    async fn test_session_for_missing_user_fails() {
        let (manager, _store, user_id) = manager_with_user("alice").await;

        let result = manager.create_session(user_id + 100).await;
        assert!(matches!(result, Err(SessionError::Database(_))));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.max_age().is_none());
        assert!(cookie.expires().is_none());
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }
}
