//! Graph Materializer
//!
//! Reconstructs cross-references at read time. For each stored document of a
//! kind, its identifier list is joined against the other kind's collection
//! and returned alongside the document.
//!
//! Reads are lenient: an identifier that no longer resolves (a dangling
//! reference) is left out of the resolved list and recorded in
//! [`Populated::unresolved`], never turned into an error. The link graph has no
//! transactional guarantee, so a read must tolerate one-sided state.

use super::error::JoinError;
use crate::db::collection::{self, Resolved};
use crate::db::DocumentStore;
use crate::models::{DocumentId, Linked};
use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// A document together with the documents its reference list resolves to
#[derive(Debug, Clone)]
pub struct Populated<K: Linked> {
    pub document: K,
    /// Referenced documents in reference-list order, duplicates kept
    pub resolved: Vec<K::Target>,
    /// Identifiers that matched no stored document
    pub unresolved: Vec<DocumentId>,
}

impl<K: Linked> Populated<K> {
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

pub struct GraphMaterializer {
    store: Arc<dyn DocumentStore>,
}

impl GraphMaterializer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Lazily yield every document of kind `K` with its references resolved
    ///
    /// Nothing is read until the stream is polled. Documents are listed once,
    /// oldest first, and each one is joined as it is yielded. Calling this
    /// again starts over from the current store state. The first failed query
    /// is yielded as an error and ends the stream.
    pub fn list_with_links<K: Linked>(
        &self,
    ) -> impl Stream<Item = Result<Populated<K>, JoinError>> + Send + 'static {
        let store = Arc::clone(&self.store);
        try_stream! {
            let documents: Vec<K> = collection::find_all(store.as_ref())
                .await
                .map_err(|e| JoinError::list_failed(K::KIND, e))?;
            debug!(kind = %K::KIND, count = documents.len(), "Materializing links");

            for document in documents {
                let id = document.id();
                let Resolved { found, missing } =
                    collection::populate::<K::Target>(store.as_ref(), document.references())
                        .await
                        .map_err(|e| JoinError::resolve_failed(K::KIND, id, e))?;

                yield Populated {
                    document,
                    resolved: found,
                    unresolved: missing,
                };
            }
        }
    }

    /// Drain [`list_with_links`](Self::list_with_links) into a vector
    pub async fn collect_with_links<K: Linked>(&self) -> Result<Vec<Populated<K>>, JoinError> {
        self.list_with_links::<K>().try_collect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::SurrealStore;
    use crate::models::{Attachment, NewAttachment, NewPost, Post};
    use anyhow::Result;
    use futures::StreamExt;

    async fn create_test_store() -> Result<Arc<dyn DocumentStore>> {
        Ok(Arc::new(
            SurrealStore::connect(&StoreConfig::in_memory()).await?,
        ))
    }

    #[tokio::test]
    async fn test_empty_collection_yields_nothing() -> Result<()> {
        let store = create_test_store().await?;
        let materializer = GraphMaterializer::new(store);

        assert!(materializer.collect_with_links::<Post>().await?.is_empty());
        assert!(materializer
            .collect_with_links::<Attachment>()
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_dangling_reference_is_omitted() -> Result<()> {
        let store = create_test_store().await?;
        let attachment = collection::create(store.as_ref(), NewAttachment::new("f.txt")).await?;
        let mut post = collection::create(store.as_ref(), NewPost::titled("T")).await?;

        let dangling = DocumentId::generate();
        post.attach(dangling);
        post.attach(attachment.id);
        collection::save(store.as_ref(), &post).await?;

        let materializer = GraphMaterializer::new(store);
        let posts = materializer.collect_with_links::<Post>().await?;

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].resolved, vec![attachment]);
        assert_eq!(posts[0].unresolved, vec![dangling]);
        assert!(!posts[0].is_fully_resolved());
        Ok(())
    }

    #[tokio::test]
    async fn test_stream_is_restartable() -> Result<()> {
        let store = create_test_store().await?;
        collection::create(store.as_ref(), NewPost::titled("first")).await?;

        let materializer = GraphMaterializer::new(store.clone());
        let stream = materializer.list_with_links::<Post>();

        // Created before the stream is first polled, so it is visible
        collection::create(store.as_ref(), NewPost::titled("second")).await?;
        let first_pass: Vec<_> = stream.collect().await;
        assert_eq!(first_pass.len(), 2);

        collection::create(store.as_ref(), NewPost::titled("third")).await?;
        let second_pass = materializer.collect_with_links::<Post>().await?;
        let titles: Vec<_> = second_pass
            .iter()
            .map(|p| p.document.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_as_join_error() -> Result<()> {
        let store = create_test_store().await?;
        store.close().await?;

        let materializer = GraphMaterializer::new(store);
        let result = materializer.collect_with_links::<Attachment>().await;
        assert!(matches!(
            result,
            Err(JoinError::ListFailed {
                kind: crate::models::DocumentKind::Attachment,
                ..
            })
        ));
        Ok(())
    }
}
