//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::validation::{validate_email, validate_username};

/// User entity
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; `None` for accounts created without a password
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Validated user creation payload
#[derive(Clone)]
pub struct NewUser {
    username: String,
    email: String,
    password_hash: Option<String>,
}

impl NewUser {
    /// Build a new user. The email is stored lowercased.
    pub fn new(
        username: impl Into<String>,
        email: &str,
        password_hash: Option<String>,
    ) -> Result<Self, String> {
        let username = username.into();
        let email = email.to_lowercase();

        validate_username(&username)?;
        validate_email(&email)?;

        Ok(Self {
            username,
            email,
            password_hash,
        })
    }

    /// Attach the Argon2 hash once the rest of the payload has been validated
    pub fn with_password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
}

/// Columns a user update may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Username,
    Email,
}

impl UserField {
    /// Column name in the `users` table
    pub fn column(self) -> &'static str {
        match self {
            UserField::Username => "username",
            UserField::Email => "email",
        }
    }

    /// Validate `value` for this column and return the form it is stored in
    pub fn normalize(self, value: &str) -> Result<String, String> {
        match self {
            UserField::Username => {
                validate_username(value)?;
                Ok(value.to_string())
            }
            UserField::Email => {
                let email = value.to_lowercase();
                validate_email(&email)?;
                Ok(email)
            }
        }
    }
}

/// Request for user creation through the JSON API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
}

/// Request for a partial user update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, alias = "Username")]
    pub username: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// The normalized field updates carried by this request.
    ///
    /// Fails before anything is written if a present field is invalid.
    pub fn changes(&self) -> Result<Vec<(UserField, String)>, String> {
        let mut changes = Vec::new();

        if let Some(username) = &self.username {
            changes.push((UserField::Username, UserField::Username.normalize(username)?));
        }

        if let Some(email) = &self.email {
            changes.push((UserField::Email, UserField::Email.normalize(email)?));
        }

        Ok(changes)
    }
}
