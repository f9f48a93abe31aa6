//! Database liveness check

use async_trait::async_trait;
use sqlx::PgPool;

use super::HealthCheck;

/// Probe backed by the connection pool
#[derive(Clone)]
pub struct DatabaseHealth {
    pool: PgPool,
}

impl DatabaseHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealth {
    async fn is_healthy(&self) -> bool {
        // health_check logs its own failures and only errs on misuse
        common::database::health_check(&self.pool)
            .await
            .unwrap_or(false)
    }
}
