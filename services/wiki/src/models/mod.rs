//! Wiki models for entities and request payloads

pub mod document;
pub mod session;
pub mod user;

// Re-export for convenience
pub use document::{
    CreateDocumentRequest, Document, DocumentField, NewDocument, UpdateDocumentRequest,
};
pub use session::{Identity, Session};
pub use user::{CreateUserRequest, NewUser, UpdateUserRequest, User, UserField};
