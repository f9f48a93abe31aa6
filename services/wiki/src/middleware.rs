//! Session identity middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;

use crate::{models::Identity, session::SESSION_COOKIE, state::AppState};

/// Attach an [`Identity`] to every request.
///
/// A missing cookie or a token that does not resolve leaves the request
/// anonymous; nothing is rejected here.
pub async fn identity_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = match jar.get(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => {
            state.sessions.resolve_session(cookie.value()).await
        }
        _ => Identity::anonymous(),
    };

    req.extensions_mut().insert(identity);

    next.run(req).await
}
