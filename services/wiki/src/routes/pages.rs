//! HTML page handlers

use axum::{
    Extension, Form,
    extract::{Path, State, rejection::PathRejection},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use common::error::DatabaseError;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    error::{PageError, PageResult},
    markdown,
    models::{DocumentField, Identity, NewDocument, NewUser},
    password::{hash_password, verify_login},
    session::{SESSION_COOKIE, removal_cookie, session_cookie},
    state::AppState,
    templates,
    validation::{require_non_empty, validate_password},
};

/// Shown for every failed login, whatever the cause
const LOGIN_FAILED: &str = "Something went wrong.";

/// Submitted document form
#[derive(Debug, Default, Deserialize)]
pub struct DocumentForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Submitted signup form
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Submitted login form
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn page_id(path: Result<Path<i64>, PathRejection>) -> PageResult<i64> {
    path.map(|Path(id)| id).map_err(|_| PageError::NotFound)
}

pub async fn index(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(templates::index_page(&identity))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> PageResult<Html<String>> {
    let documents = state.documents.get_all().await?;
    Ok(Html(templates::dashboard_page(&identity, &documents)))
}

pub async fn editor(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(templates::editor_page(&identity))
}

pub async fn docs(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> PageResult<Html<String>> {
    let documents = state.documents.get_all().await?;
    Ok(Html(templates::docs_page(&identity, &documents)))
}

/// Render a document body to sanitized HTML
pub async fn doc(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
) -> PageResult<Html<String>> {
    let id = page_id(path)?;
    let document = state.documents.get_one(id).await?;
    let rendered = markdown::render(&document.body);

    Ok(Html(templates::doc_page(&identity, &document, &rendered)))
}

pub async fn edit_doc_form(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
) -> PageResult<Html<String>> {
    let id = page_id(path)?;
    let document = state.documents.get_one(id).await?;

    Ok(Html(templates::edit_doc_page(
        &identity,
        id,
        &document.title,
        &document.body,
        None,
    )))
}

pub async fn edit_doc(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
    Form(form): Form<DocumentForm>,
) -> PageResult<Response> {
    let id = page_id(path)?;

    let valid = require_non_empty("title", &form.title)
        .and_then(|_| require_non_empty("body", &form.body));
    if let Err(message) = valid {
        let page =
            templates::edit_doc_page(&identity, id, &form.title, &form.body, Some(&message));
        return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
    }

    state
        .documents
        .update(id, DocumentField::Title, &form.title)
        .await?;
    state
        .documents
        .update(id, DocumentField::Body, &form.body)
        .await?;
    info!("Updated document {}", id);

    Ok(Redirect::to(&format!("/docs/{id}")).into_response())
}

pub async fn new_doc_form(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(templates::new_doc_page(&identity, "", "", None))
}

pub async fn new_doc(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<DocumentForm>,
) -> PageResult<Response> {
    let document = match NewDocument::new(form.title.as_str(), form.body.as_str()) {
        Ok(document) => document,
        Err(message) => {
            let page = templates::new_doc_page(&identity, &form.title, &form.body, Some(&message));
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let document = state.documents.insert(&document).await?;
    info!("Created document {}", document.id);

    Ok(Redirect::to(&format!("/docs/{}", document.id)).into_response())
}

pub async fn signup_form(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(templates::signup_page(&identity, "", "", None))
}

pub async fn signup(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<SignupForm>,
) -> PageResult<Response> {
    let rejected = |status: StatusCode, message: &str| -> PageResult<Response> {
        let page = templates::signup_page(&identity, &form.username, &form.email, Some(message));
        Ok((status, Html(page)).into_response())
    };

    if let Err(message) = validate_password(&form.password) {
        return rejected(StatusCode::BAD_REQUEST, &message);
    }

    let user = match NewUser::new(form.username.as_str(), &form.email, None) {
        Ok(user) => user,
        Err(message) => return rejected(StatusCode::BAD_REQUEST, &message),
    };

    let password_hash = hash_password(&form.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        PageError::Internal
    })?;
    let user = user.with_password_hash(password_hash);

    match state.users.insert(&user).await {
        Ok(user) => {
            info!("Signed up user {}", user.id);
            Ok(Redirect::to("/login").into_response())
        }
        Err(DatabaseError::Conflict(_)) => {
            rejected(StatusCode::CONFLICT, "That username is already taken.")
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(templates::login_page(&identity, None))
}

/// Check the credentials and open a session.
///
/// Unknown usernames and wrong passwords get the same 401 page.
pub async fn login(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<LoginForm>,
) -> PageResult<Response> {
    let failed = || {
        (
            StatusCode::UNAUTHORIZED,
            Html(templates::login_page(&identity, Some(LOGIN_FAILED))),
        )
            .into_response()
    };

    let user = match state.users.get_one_by_username(&form.username).await {
        Ok(user) => Some(user),
        Err(DatabaseError::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    let stored_hash = user.as_ref().and_then(|u| u.password_hash.as_deref());
    let verified = verify_login(&form.password, stored_hash);

    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!("Failed login attempt");
            return Ok(failed());
        }
    };

    let token = state.sessions.create_session(user.id).await?;
    info!("User {} logged in", user.id);

    Ok(session_response(session_cookie(token)))
}

/// Drop the session and clear the cookie; always redirects home
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.delete_session(cookie.value()).await;
    }

    session_response(removal_cookie())
}

/// Redirect home while setting `cookie`.
///
/// The header is written verbatim so the client holds exactly the token the
/// store knows; `CookieJar` would percent-encode the base64 padding.
fn session_response(cookie: Cookie<'static>) -> Response {
    (
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Redirect::to("/"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::super::tests::{request, test_app, text_body};
    use crate::repositories::SessionStore;
    use axum::http::{StatusCode, header};
    use serde_json::json;

    fn set_cookie(response: &axum::response::Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn session_token(set_cookie: &str) -> String {
        let pair = set_cookie.split(';').next().unwrap();
        pair.strip_prefix("session=").unwrap().to_string()
    }

    #[tokio::test]
    async fn test_index_for_anonymous_visitor() {
        let (app, _store) = test_app();

        let response = app.send(request("GET", "/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains(r#"href="/signup""#));
    }

    #[tokio::test]
    async fn test_new_doc_redirects_to_rendered_page() {
        let (app, store) = test_app();

        let response = app
            .send_form(
                "POST",
                "/new/doc",
                "title=Notes&body=**bold**%0A%0A%3Cscript%3Ealert(1)%3C%2Fscript%3E%0A%0A-+one",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(store.document_count().await, 1);

        let response = app.send(request("GET", &location)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = text_body(response).await;
        assert!(page.contains("<strong>bold</strong>"));
        assert!(page.contains("<li>one</li>"));
        assert!(!page.contains("<script>alert"));
    }

    #[tokio::test]
    async fn test_new_doc_with_empty_body_is_rejected() {
        let (app, store) = test_app();

        let response = app.send_form("POST", "/new/doc", "title=Notes&body=").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(text_body(response).await.contains("Body is required"));
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_edit_doc() {
        let (app, _store) = test_app();

        app.send_form("POST", "/new/doc", "title=Notes&body=first").await;

        let response = app.send(request("GET", "/docs/1/edit")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains("first"));

        let response = app
            .send_form("POST", "/docs/1/edit", "title=Notes&body=second")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = text_body(app.send(request("GET", "/docs/1")).await).await;
        assert!(page.contains("second"));
    }

    #[tokio::test]
    async fn test_missing_doc_pages_are_not_found() {
        let (app, _store) = test_app();

        for uri in ["/docs/5", "/docs/5/edit", "/docs/abc"] {
            let response = app.send(request("GET", uri)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }

        let response = app.send_form("POST", "/docs/5/edit", "title=a&body=b").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_signup_login_logout() {
        let (app, store) = test_app();

        let response = app
            .send_form(
                "POST",
                "/signup",
                "username=alice&email=Alice%40X.com&password=secret123",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let users = json_users(&app).await;
        assert_eq!(users[0]["email"], "alice@x.com");

        // login is keyed on the username, not the email
        let response = app
            .send_form("POST", "/login", "username=Alice%40X.com&password=secret123")
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
        assert!(text_body(response).await.contains("Something went wrong."));

        let response = app
            .send_form("POST", "/login", "username=alice&password=secret123")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Max-Age"));
        let token = session_token(&cookie);
        assert_eq!(token.len(), 44);
        assert!(!token.contains('%'));
        assert_eq!(store.session_count().await, 1);

        // the cookie carries the stored token verbatim
        let owner = SessionStore::get_username(&store, &token).await.unwrap();
        assert_eq!(owner.as_deref(), Some("alice"));

        let response = app
            .send_with_cookie(request("GET", "/dashboard"), &token)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains(r#"action="/logout""#));

        let response = app
            .send_with_cookie(request("POST", "/logout"), &token)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cleared = set_cookie(&response).unwrap();
        assert!(cleared.starts_with("session=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert_eq!(store.session_count().await, 0);

        let response = app
            .send_with_cookie(request("GET", "/dashboard"), &token)
            .await;
        assert!(!text_body(response).await.contains(r#"action="/logout""#));
    }

    #[tokio::test]
    async fn test_wrong_password_matches_unknown_user() {
        let (app, _store) = test_app();

        app.send_form("POST", "/signup", "username=bob&email=bob%40x.com&password=secret123")
            .await;

        let wrong = app
            .send_form("POST", "/login", "username=bob&password=nope")
            .await;
        let unknown = app
            .send_form("POST", "/login", "username=carol&password=nope")
            .await;

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(text_body(wrong).await, text_body(unknown).await);
    }

    #[tokio::test]
    async fn test_passwordless_account_cannot_log_in() {
        let (app, store) = test_app();

        let response = app
            .send_json("POST", "/api/users", json!({"username": "dave", "email": "d@x.com"}))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .send_form("POST", "/login", "username=dave&password=")
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_input_and_duplicates() {
        let (app, _store) = test_app();

        let response = app
            .send_form("POST", "/signup", "username=alice&email=not-an-email&password=secret123")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send_form("POST", "/signup", "username=alice&email=a%40x.com&password=")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        app.send_form("POST", "/signup", "username=alice&email=a%40x.com&password=secret123")
            .await;
        let response = app
            .send_form("POST", "/signup", "username=alice&email=b%40x.com&password=secret123")
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_logout_without_session_still_redirects() {
        let (app, _store) = test_app();

        let response = app.send(request("POST", "/logout")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_unknown_cookie_is_anonymous() {
        let (app, _store) = test_app();

        let response = app
            .send_with_cookie(request("GET", "/"), "not-a-real-token")
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains(r#"href="/login""#));
    }

    async fn json_users(app: &super::super::tests::TestApp) -> serde_json::Value {
        let response = app.send(request("GET", "/api/users")).await;
        serde_json::from_str(&text_body(response).await).unwrap()
    }
}
