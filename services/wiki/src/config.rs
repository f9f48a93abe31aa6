//! Service configuration loaded from the process environment

use common::database::DatabaseConfig;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

/// Wiki service configuration
///
/// # Environment Variables
/// - `DATABASE_URL`: PostgreSQL connection URL (required)
/// - `DATABASE_MAX_CONNECTIONS`: Maximum pool size (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: Minimum pool size (default: 1)
/// - `DATABASE_CONNECTION_TIMEOUT`: Pool acquire timeout in seconds (default: 30)
/// - `HOST` / `PORT`: Listen address (default: 0.0.0.0:8000)
/// - `DEBUG`: Serve `/static` when set to `1`
/// - `STATIC_DIR`: Directory served under `/static` (default: static)
/// - `READ_TIMEOUT`: Request body read timeout in seconds (default: 5)
/// - `WRITE_TIMEOUT`: Whole request timeout in seconds (default: 10)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connection_timeout: u64,
    pub host: String,
    pub port: u16,
    pub debug: String,
    pub static_dir: String,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

impl AppConfig {
    /// Load the configuration from environment variables layered over defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database_max_connections", 10)?
            .set_default("database_min_connections", 1)?
            .set_default("database_connection_timeout", 30)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("debug", "")?
            .set_default("static_dir", "static")?
            .set_default("read_timeout", 5)?
            .set_default("write_timeout", 10)?
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// Static file serving is enabled only by `DEBUG=1`
    pub fn debug_mode(&self) -> bool {
        self.debug == "1"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout)
    }

    /// Pool settings for [`common::database::init_pool`]
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            database_url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            min_connections: self.database_min_connections,
            connection_timeout: self.database_connection_timeout,
        }
    }
}
