//! JSON API handlers

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        CreateDocumentRequest, CreateUserRequest, Document, NewDocument, NewUser,
        UpdateDocumentRequest, UpdateUserRequest, User,
    },
    password::hash_password,
    state::AppState,
    validation::validate_password,
};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::MalformedBody(e.body_text()))
}

fn id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.is_healthy().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}

/// Create a document
pub async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> ApiResult<Json<Document>> {
    let payload = body(payload)?;
    let document = NewDocument::new(payload.title, payload.body).map_err(ApiError::BadRequest)?;

    let document = state.documents.insert(&document).await?;
    info!("Created document {}", document.id);

    Ok(Json(document))
}

/// Get all documents
pub async fn get_documents(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.documents.get_all().await?))
}

/// Get a document by ID
pub async fn get_document(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Document>> {
    let id = id(path)?;
    Ok(Json(state.documents.get_one(id).await?))
}

/// Apply the fields present in the payload, then return the document
pub async fn update_document(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> ApiResult<Json<Document>> {
    let id = id(path)?;
    let payload = body(payload)?;
    let changes = payload.changes().map_err(ApiError::BadRequest)?;

    for (field, value) in changes {
        state.documents.update(id, field, value).await?;
    }

    Ok(Json(state.documents.get_one(id).await?))
}

/// Create a user; the password is optional
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let payload = body(payload)?;

    let mut user =
        NewUser::new(payload.username, &payload.email, None).map_err(ApiError::BadRequest)?;

    if let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) {
        validate_password(password).map_err(ApiError::BadRequest)?;
        let hash = hash_password(password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::Internal
        })?;
        user = user.with_password_hash(hash);
    }

    let user = state.users.insert(&user).await?;
    info!("Created user {}", user.id);

    Ok(Json(user))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_all().await?))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<User>> {
    let id = id(path)?;
    Ok(Json(state.users.get_one(id).await?))
}

/// Apply the fields present in the payload, then return the user
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = id(path)?;
    let payload = body(payload)?;
    let changes = payload.changes().map_err(ApiError::BadRequest)?;

    for (field, value) in changes {
        state.users.update(id, field, &value).await?;
    }

    Ok(Json(state.users.get_one(id).await?))
}
