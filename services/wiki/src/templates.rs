//! HTML templates for the page interface
//!
//! Inline `format!` templates. Every user-supplied string goes through
//! [`html_escape`]; rendered document bodies arrive as [`SafeHtml`] and are
//! embedded as-is.

use crate::{
    markdown::SafeHtml,
    models::{Document, Identity},
};

fn layout(title: &str, identity: &Identity, content: &str) -> String {
    let account = if identity.is_authenticated {
        format!(
            r#"<span>{}</span>
        <form method="POST" action="/logout"><button type="submit">Log out</button></form>"#,
            html_escape(&identity.username)
        )
    } else {
        r#"<a href="/login">Log in</a>
        <a href="/signup">Sign up</a>"#
            .to_string()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title} - Wiki</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <nav>
        <a href="/">Wiki</a>
        <a href="/docs">Documents</a>
        <a href="/new/doc">New document</a>
        {account}
    </nav>
    <main>
{content}
    </main>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn error_html(error: Option<&str>) -> String {
    error.map_or(String::new(), |e| {
        format!(r#"<div class="error">{}</div>"#, html_escape(e))
    })
}

fn document_list(documents: &[Document]) -> String {
    if documents.is_empty() {
        return r#"<p class="empty">No documents yet.</p>"#.to_string();
    }

    let items: String = documents
        .iter()
        .map(|doc| {
            format!(
                r#"<li><a href="/docs/{}">{}</a> <small>updated {}</small></li>"#,
                doc.id,
                html_escape(&doc.title),
                doc.updated_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect();

    format!("<ul class=\"documents\">{items}</ul>")
}

fn document_form(action: &str, submit: &str, title: &str, body: &str) -> String {
    format!(
        r#"<form method="POST" action="{action}">
            <div class="form-group">
                <label for="title">Title</label>
                <input type="text" id="title" name="title" value="{title}" required>
            </div>
            <div class="form-group">
                <label for="body">Body (Markdown)</label>
                <textarea id="body" name="body" rows="20" required>
{body}</textarea>
            </div>
            <button type="submit">{submit}</button>
        </form>"#,
        action = html_escape(action),
        title = html_escape(title),
        body = html_escape(body),
    )
}

/// Render the landing page
pub fn index_page(identity: &Identity) -> String {
    let greeting = if identity.is_authenticated {
        format!(
            r#"<p>Welcome back, {}. Head to your <a href="/dashboard">dashboard</a>.</p>"#,
            html_escape(&identity.username)
        )
    } else {
        r#"<p><a href="/signup">Sign up</a> or <a href="/login">log in</a> to start writing.</p>"#
            .to_string()
    };

    layout(
        "Home",
        identity,
        &format!("<h1>Wiki</h1>\n{greeting}"),
    )
}

/// Render the dashboard with the most recently updated documents first
pub fn dashboard_page(identity: &Identity, documents: &[Document]) -> String {
    let mut recent: Vec<Document> = documents.to_vec();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let content = format!(
        r#"<h1>Dashboard</h1>
<p>{count} document(s). <a href="/editor">Open the editor</a></p>
{list}"#,
        count = documents.len(),
        list = document_list(&recent),
    );

    layout("Dashboard", identity, &content)
}

/// Render a blank editor
pub fn editor_page(identity: &Identity) -> String {
    let content = format!(
        "<h1>Editor</h1>\n{}",
        document_form("/new/doc", "Save", "", "")
    );

    layout("Editor", identity, &content)
}

/// Render the document index
pub fn docs_page(identity: &Identity, documents: &[Document]) -> String {
    let content = format!("<h1>Documents</h1>\n{}", document_list(documents));
    layout("Documents", identity, &content)
}

/// Render one document with its sanitized body
pub fn doc_page(identity: &Identity, document: &Document, rendered: &SafeHtml) -> String {
    let content = format!(
        r#"<article>
    <h1>{title}</h1>
    <p class="meta">Created {created}, updated {updated}. <a href="/docs/{id}/edit">Edit</a></p>
    <div class="document-body">
{rendered}
    </div>
</article>"#,
        title = html_escape(&document.title),
        created = document.created_at.format("%Y-%m-%d %H:%M"),
        updated = document.updated_at.format("%Y-%m-%d %H:%M"),
        id = document.id,
    );

    layout(&document.title, identity, &content)
}

/// Render the edit form for document `id`
pub fn edit_doc_page(
    identity: &Identity,
    id: i64,
    title: &str,
    body: &str,
    error: Option<&str>,
) -> String {
    let content = format!(
        "<h1>Edit document</h1>\n{}\n{}",
        error_html(error),
        document_form(&format!("/docs/{id}/edit"), "Save changes", title, body)
    );

    layout("Edit document", identity, &content)
}

/// Render the new document form
pub fn new_doc_page(identity: &Identity, title: &str, body: &str, error: Option<&str>) -> String {
    let content = format!(
        "<h1>New document</h1>\n{}\n{}",
        error_html(error),
        document_form("/new/doc", "Create", title, body)
    );

    layout("New document", identity, &content)
}

/// Render the signup page
pub fn signup_page(
    identity: &Identity,
    username: &str,
    email: &str,
    error: Option<&str>,
) -> String {
    let content = format!(
        r#"<h1>Sign up</h1>
{error}
<form method="POST" action="/signup">
    <div class="form-group">
        <label for="username">Username</label>
        <input type="text" id="username" name="username" value="{username}" required autofocus
               pattern="[a-zA-Z0-9_]+">
    </div>
    <div class="form-group">
        <label for="email">Email</label>
        <input type="email" id="email" name="email" value="{email}" required>
    </div>
    <div class="form-group">
        <label for="password">Password</label>
        <input type="password" id="password" name="password" required>
    </div>
    <button type="submit">Create account</button>
</form>
<p>Already have an account? <a href="/login">Log in</a></p>"#,
        error = error_html(error),
        username = html_escape(username),
        email = html_escape(email),
    );

    layout("Sign up", identity, &content)
}

/// Render the login page
pub fn login_page(identity: &Identity, error: Option<&str>) -> String {
    let content = format!(
        r#"<h1>Log in</h1>
{error}
<form method="POST" action="/login">
    <div class="form-group">
        <label for="username">Username</label>
        <input type="text" id="username" name="username" required autofocus>
    </div>
    <div class="form-group">
        <label for="password">Password</label>
        <input type="password" id="password" name="password" required>
    </div>
    <button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup">Sign up</a></p>"#,
        error = error_html(error),
    );

    layout("Log in", identity, &content)
}

/// Render a generic error page
pub fn error_page(heading: &str, message: &str) -> String {
    let content = format!(
        "<h1>{}</h1>\n{}",
        html_escape(heading),
        error_html(Some(message))
    );

    layout(heading, &Identity::anonymous(), &content)
}

/// Escape text for embedding in HTML content or attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
