//! Wiki service routes

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{config::AppConfig, middleware::identity_middleware, state::AppState};

pub mod api;
pub mod pages;

/// Create the router for the wiki service
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/dashboard", get(pages::dashboard))
        .route("/editor", get(pages::editor))
        .route("/docs", get(pages::docs))
        .route("/docs/:id", get(pages::doc))
        .route(
            "/docs/:id/edit",
            get(pages::edit_doc_form).post(pages::edit_doc),
        )
        .route("/new/doc", get(pages::new_doc_form).post(pages::new_doc))
        .route("/signup", get(pages::signup_form).post(pages::signup))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/logout", post(pages::logout))
        .route("/health", get(api::health_check))
        .route(
            "/api/docs",
            get(api::get_documents).post(api::create_document),
        )
        .route(
            "/api/docs/:id",
            get(api::get_document).patch(api::update_document),
        )
        .route("/api/users", get(api::get_users).post(api::create_user))
        .route(
            "/api/users/:id",
            get(api::get_user).patch(api::update_user),
        );

    if config.debug_mode() {
        info!("Serving static files from {}", config.static_dir);
        router = router.nest_service("/static", ServeDir::new(&config.static_dir));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.write_timeout(),
        ))
        .layer(RequestBodyTimeoutLayer::new(config.read_timeout()))
        .with_state(state)
}
