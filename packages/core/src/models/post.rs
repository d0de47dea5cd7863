//! Post Model
//!
//! A post carries a title, free-form content, and the identifiers of the
//! attachments it has been linked to.

use super::attachment::Attachment;
use super::document::{
    check_length, check_references, Document, DocumentId, DocumentKind, Linked, NewDocument,
    ValidationError,
};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LEN: usize = 512;
pub const MAX_CONTENT_LEN: usize = 65_536;

/// A post that has not been stored yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Draft with a title and empty content
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, "")
    }
}

impl NewDocument for NewPost {
    type Output = Post;

    fn validate(&self) -> Result<(), ValidationError> {
        check_length("title", &self.title, MAX_TITLE_LEN)?;
        check_length("content", &self.content, MAX_CONTENT_LEN)
    }

    fn into_document(self, id: DocumentId) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            attachments: Vec::new(),
        }
    }
}

/// A stored post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "uuid")]
    pub id: DocumentId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Attachment identifiers in link order; duplicates are kept
    #[serde(default)]
    pub attachments: Vec<DocumentId>,
}

impl Post {
    /// Record a reference to `attachment` in memory; nothing is persisted
    pub fn attach(&mut self, attachment: DocumentId) {
        self.attachments.push(attachment);
    }

    pub fn references_attachment(&self, attachment: DocumentId) -> bool {
        self.attachments.contains(&attachment)
    }
}

impl Document for Post {
    const KIND: DocumentKind = DocumentKind::Post;

    fn id(&self) -> DocumentId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_length("title", &self.title, MAX_TITLE_LEN)?;
        check_length("content", &self.content, MAX_CONTENT_LEN)?;
        check_references("attachments", &self.attachments)
    }
}

impl Linked for Post {
    type Target = Attachment;

    fn references(&self) -> &[DocumentId] {
        &self.attachments
    }
}
