//! Error types for the JSON API and the page interface

use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{session::SessionError, templates};

/// Error type for the JSON API
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field is missing or invalid
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body could not be parsed
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::MalformedBody(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound | ApiError::Database(DatabaseError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ApiError::Database(DatabaseError::Conflict(msg)) => {
                (StatusCode::CONFLICT, msg.clone())
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type for the page interface, rendered as an HTML error page
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Page not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PageError::NotFound | PageError::Database(DatabaseError::NotFound) => (
                StatusCode::NOT_FOUND,
                "The page you asked for does not exist.".to_string(),
            ),
            PageError::Database(DatabaseError::Conflict(msg)) => (StatusCode::CONFLICT, msg),
            PageError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong.".to_string(),
            ),
            PageError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.".to_string(),
                )
            }
            PageError::Session(e) => {
                error!("Session error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.".to_string(),
                )
            }
        };

        let heading = status.canonical_reason().unwrap_or("Error");
        (status, Html(templates::error_page(heading, &message))).into_response()
    }
}

/// Type alias for page results
pub type PageResult<T> = Result<T, PageError>;
