//! Document model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::require_non_empty;

/// Document entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub title: String,
    /// Raw Markdown source
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated document creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    title: String,
    body: String,
}

impl NewDocument {
    /// Build a new document, rejecting an empty title or body
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, String> {
        let title = title.into();
        let body = body.into();

        require_non_empty("title", &title)?;
        require_non_empty("body", &body)?;

        Ok(Self { title, body })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Columns a document update may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    Title,
    Body,
}

impl DocumentField {
    /// Column name in the `documents` table
    pub fn column(self) -> &'static str {
        match self {
            DocumentField::Title => "title",
            DocumentField::Body => "body",
        }
    }
}

/// Request for document creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(default, alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Body")]
    pub body: String,
}

/// Request for a partial document update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default, alias = "Title")]
    pub title: Option<String>,
    #[serde(default, alias = "Body")]
    pub body: Option<String>,
}

impl UpdateDocumentRequest {
    /// The field updates carried by this request, in column order.
    ///
    /// Fails before anything is written if a present field is empty.
    pub fn changes(&self) -> Result<Vec<(DocumentField, &str)>, String> {
        let mut changes = Vec::new();

        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
            changes.push((DocumentField::Title, title.as_str()));
        }

        if let Some(body) = &self.body {
            require_non_empty("body", body)?;
            changes.push((DocumentField::Body, body.as_str()));
        }

        Ok(changes)
    }
}
