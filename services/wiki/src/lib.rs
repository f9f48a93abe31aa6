//! Server-rendered Markdown wiki
//!
//! Users sign up, log in with a session cookie and write Markdown documents
//! that are rendered to sanitized HTML. The same documents and users are also
//! exposed through a JSON API under `/api`.

pub mod config;
pub mod error;
pub mod markdown;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod validation;

pub use config::AppConfig;
pub use state::AppState;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
