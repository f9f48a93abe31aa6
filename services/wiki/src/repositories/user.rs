//! User repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use super::UserStore;
use crate::models::{NewUser, User, UserField};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", user.username());

        let now = Utc::now();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn update(&self, id: i64, field: UserField, value: &str) -> DatabaseResult<()> {
        info!("Updating {} of user {}", field.column(), id);

        let query = format!(
            "UPDATE users SET {} = $1, updated_at = $2 WHERE id = $3 RETURNING id",
            field.column()
        );

        sqlx::query_scalar::<_, i64>(&query)
            .bind(value)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?
            .ok_or(DatabaseError::NotFound)?;

        Ok(())
    }

    async fn get_one(&self, id: i64) -> DatabaseResult<User> {
        info!("Finding user by ID: {}", id);

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn get_one_by_username(&self, username: &str) -> DatabaseResult<User> {
        info!("Finding user by username: {}", username);

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn get_all(&self) -> DatabaseResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }
}
