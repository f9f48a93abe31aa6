//! Session repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

use super::SessionStore;
use crate::models::Session;

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, user_id: i64, token_hash: &str) -> DatabaseResult<Session> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash)
            VALUES ($1, $2)
            RETURNING id, user_id, token_hash
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn get_username(&self, token_hash: &str) -> DatabaseResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT users.username
            FROM sessions
            JOIN users ON sessions.user_id = users.id
            WHERE sessions.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn delete(&self, token_hash: &str) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
