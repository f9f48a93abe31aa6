//! Document repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use super::DocumentStore;
use crate::models::{Document, DocumentField, NewDocument};

/// Document repository
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn insert(&self, document: &NewDocument) -> DatabaseResult<Document> {
        info!("Creating new document: {}", document.title());

        let now = Utc::now();
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (title, body, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, title, body, created_at, updated_at
            "#,
        )
        .bind(document.title())
        .bind(document.body())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn update(&self, id: i64, field: DocumentField, value: &str) -> DatabaseResult<()> {
        info!("Updating {} of document {}", field.column(), id);

        let query = format!(
            "UPDATE documents SET {} = $1, updated_at = $2 WHERE id = $3 RETURNING id",
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

    async fn get_one(&self, id: i64) -> DatabaseResult<Document> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, body, created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn get_all(&self) -> DatabaseResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, body, created_at, updated_at
            FROM documents
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }
}
