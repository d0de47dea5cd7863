//! Data Models
//!
//! This module contains the two document kinds that reference each other:
//!
//! - `Post` - titled content holding attachment identifiers
//! - `Attachment` - a named file holding post identifiers
//!
//! Drafts (`NewPost`, `NewAttachment`) have no identifier; only the store
//! turns a draft into a persisted document.

mod attachment;
mod document;
mod post;

pub use attachment::{Attachment, NewAttachment, MAX_FILE_NAME_LEN};
pub use document::{
    Document, DocumentId, DocumentKind, Linked, NewDocument, ValidationError,
};
pub use post::{NewPost, Post, MAX_CONTENT_LEN, MAX_TITLE_LEN};
