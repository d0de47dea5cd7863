//! Reference Linker
//!
//! Establishes a bidirectional Post ↔ Attachment link by appending each side's
//! identifier to the other's reference list and persisting both documents.
//!
//! # Consistency Contract
//!
//! Writes are sequential and dependent: the post is appended to and saved
//! first, and the attachment is touched only after the post write is
//! acknowledged. As a result:
//!
//! - On success both lists contain each other's identifier.
//! - If the post write fails, the attachment is neither mutated nor written.
//! - If the attachment write fails, the post references the attachment but the
//!   attachment does not reference the post. The reverse state (attachment-side
//!   evidence without post-side evidence) is never produced.
//!
//! In-memory mutations are never rolled back and nothing is retried. Linking
//! the same pair twice appends both identifiers twice.

use super::error::LinkError;
use crate::db::{collection, DocumentStore};
use crate::models::{Attachment, Post};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ReferenceLinker {
    store: Arc<dyn DocumentStore>,
}

impl ReferenceLinker {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Link `post` and `attachment` in both directions
    ///
    /// Both arguments are persisted documents by construction; only the store
    /// can produce a `Post` or `Attachment` value.
    ///
    /// # Errors
    ///
    /// - `LinkError::PostWriteFailed` if saving the post fails
    /// - `LinkError::AttachmentWriteFailed` if saving the attachment fails after
    ///   the post was saved
    pub async fn link(&self, post: &mut Post, attachment: &mut Attachment) -> Result<(), LinkError> {
        let (post_id, attachment_id) = (post.id, attachment.id);
        debug!(%post_id, %attachment_id, "Linking post to attachment");

        post.attach(attachment_id);
        if let Err(e) = collection::save(self.store.as_ref(), &*post).await {
            warn!(%post_id, %attachment_id, error = %e, "Post side of link failed");
            return Err(LinkError::post_write_failed(post_id, attachment_id, e));
        }

        attachment.share(post_id);
        if let Err(e) = collection::save(self.store.as_ref(), &*attachment).await {
            warn!(
                %post_id,
                %attachment_id,
                error = %e,
                "Attachment side of link failed; post keeps a one-sided reference"
            );
            return Err(LinkError::attachment_write_failed(post_id, attachment_id, e));
        }

        info!(%post_id, %attachment_id, "Post and attachment linked");
        Ok(())
    }
}
