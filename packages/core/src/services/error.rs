//! Service Layer Error Types
//!
//! This module defines error types for linking, join resolution, and the
//! phased run, wrapping the underlying [`StoreError`] with the context of
//! which step failed.

use crate::db::StoreError;
use crate::models::{DocumentId, DocumentKind};
use thiserror::Error;

/// One side of a link write failed
///
/// The link is written post first. `PostWriteFailed` means neither side was
/// persisted by this call; `AttachmentWriteFailed` means the post references
/// the attachment but the attachment does not reference the post.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Failed to persist post {post_id} while linking attachment {attachment_id}: {source}")]
    PostWriteFailed {
        post_id: DocumentId,
        attachment_id: DocumentId,
        #[source]
        source: StoreError,
    },

    #[error("Post {post_id} now references attachment {attachment_id}, but persisting the attachment failed: {source}")]
    AttachmentWriteFailed {
        post_id: DocumentId,
        attachment_id: DocumentId,
        #[source]
        source: StoreError,
    },
}

impl LinkError {
    pub fn post_write_failed(post_id: DocumentId, attachment_id: DocumentId, source: StoreError) -> Self {
        Self::PostWriteFailed {
            post_id,
            attachment_id,
            source,
        }
    }

    pub fn attachment_write_failed(
        post_id: DocumentId,
        attachment_id: DocumentId,
        source: StoreError,
    ) -> Self {
        Self::AttachmentWriteFailed {
            post_id,
            attachment_id,
            source,
        }
    }

    /// Whether the store was left with a post-side-only reference
    pub fn is_one_sided(&self) -> bool {
        matches!(self, Self::AttachmentWriteFailed { .. })
    }

    pub fn store_error(&self) -> &StoreError {
        match self {
            Self::PostWriteFailed { source, .. } | Self::AttachmentWriteFailed { source, .. } => {
                source
            }
        }
    }
}

/// A read or resolve query failed while materializing links
#[derive(Error, Debug)]
pub enum JoinError {
    #[error("Failed to list {kind} documents: {source}")]
    ListFailed {
        kind: DocumentKind,
        #[source]
        source: StoreError,
    },

    #[error("Failed to resolve references of {kind} {id}: {source}")]
    ResolveFailed {
        kind: DocumentKind,
        id: DocumentId,
        #[source]
        source: StoreError,
    },
}

impl JoinError {
    pub fn list_failed(kind: DocumentKind, source: StoreError) -> Self {
        Self::ListFailed { kind, source }
    }

    pub fn resolve_failed(kind: DocumentKind, id: DocumentId, source: StoreError) -> Self {
        Self::ResolveFailed { kind, id, source }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::ListFailed { kind, .. } | Self::ResolveFailed { kind, .. } => *kind,
        }
    }
}

/// The single failure cause of a phased run
#[derive(Error, Debug)]
pub enum RunError {
    /// Store could not be reached; no phase ran
    #[error("Connection failed: {0}")]
    Connection(#[source] StoreError),

    /// Phase 1: creating a post or attachment failed
    #[error("Create phase failed: {0}")]
    Create(#[source] StoreError),

    /// Phase 2
    #[error("Link phase failed: {0}")]
    Link(#[from] LinkError),

    /// Phase 3
    #[error("Read phase failed: {0}")]
    Join(#[from] JoinError),
}

impl RunError {
    /// Short label of the phase that failed
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connect",
            Self::Create(_) => "create",
            Self::Link(_) => "link",
            Self::Join(_) => "read",
        }
    }

    /// Whether the failure was a store-side constraint violation
    pub fn is_validation(&self) -> bool {
        let store_error = match self {
            Self::Connection(e) | Self::Create(e) => e,
            Self::Link(e) => e.store_error(),
            Self::Join(JoinError::ListFailed { source, .. })
            | Self::Join(JoinError::ResolveFailed { source, .. }) => source,
        };
        matches!(store_error, StoreError::Validation(_))
    }
}
