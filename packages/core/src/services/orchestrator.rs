//! Orchestrator - Three-Phase Link Run
//!
//! Drives one complete run against a single store connection:
//!
//! 1. **Create** - the post and the attachment are stored concurrently; the
//!    phase ends when both are acknowledged, or at the first failure
//! 2. **Link** - [`ReferenceLinker::link`] on the two created documents
//! 3. **Read** - [`GraphMaterializer`] over posts, then over attachments
//!
//! Each phase is awaited to completion before the next starts, so no write
//! from one phase can interleave with another. Any failure ends the run with
//! a single [`RunError`]; the connection is released on every exit path.
//!
//! The created documents are plain values returned by one phase and passed to
//! the next. Nothing is kept in shared state between phases.

use super::error::RunError;
use super::linker::ReferenceLinker;
use super::materializer::GraphMaterializer;
use super::report::LinkReport;
use crate::config::StoreConfig;
use crate::db::{collection, DocumentStore, SurrealStore};
use crate::models::{Attachment, NewAttachment, NewPost, Post};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The post as it stands after linking
    pub post: Post,
    /// The attachment as it stands after linking
    pub attachment: Attachment,
    pub report: LinkReport,
}

/// Phase 1: store both drafts concurrently
///
/// Returns once both inserts are acknowledged. Either may finish first. If one
/// fails, the other is abandoned and the failure is returned.
pub async fn create_phase(
    store: &Arc<dyn DocumentStore>,
    post: NewPost,
    attachment: NewAttachment,
) -> Result<(Post, Attachment), RunError> {
    let started_at = Instant::now();
    info!("Phase 1: creating post and attachment");

    let (post, attachment) = tokio::try_join!(
        collection::create(store.as_ref(), post),
        collection::create(store.as_ref(), attachment),
    )
    .map_err(RunError::Create)?;

    info!(
        post_id = %post.id,
        attachment_id = %attachment.id,
        duration_ms = started_at.elapsed().as_millis() as u64,
        "Phase 1 complete"
    );
    Ok((post, attachment))
}

/// Phase 2: link the two created documents
pub async fn link_phase(
    store: &Arc<dyn DocumentStore>,
    post: &mut Post,
    attachment: &mut Attachment,
) -> Result<(), RunError> {
    let started_at = Instant::now();
    info!("Phase 2: linking post and attachment");

    ReferenceLinker::new(Arc::clone(store))
        .link(post, attachment)
        .await?;

    info!(
        duration_ms = started_at.elapsed().as_millis() as u64,
        "Phase 2 complete"
    );
    Ok(())
}

/// Phase 3: materialize both kinds, posts first
pub async fn read_phase(store: &Arc<dyn DocumentStore>) -> Result<LinkReport, RunError> {
    let started_at = Instant::now();
    info!("Phase 3: materializing links");

    let materializer = GraphMaterializer::new(Arc::clone(store));
    let posts = materializer.collect_with_links::<Post>().await?;
    let attachments = materializer.collect_with_links::<Attachment>().await?;
    let report = LinkReport { posts, attachments };

    info!(
        posts = report.posts.len(),
        attachments = report.attachments.len(),
        unresolved = report.unresolved_count(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "Phase 3 complete"
    );
    Ok(report)
}

/// Owns the store connection for the length of one run
pub struct Orchestrator {
    store: Arc<dyn DocumentStore>,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Open a SurrealDB connection for a run
    ///
    /// # Errors
    ///
    /// `RunError::Connection` if the store cannot be reached. No phase runs.
    pub async fn connect(config: &StoreConfig) -> Result<Self, RunError> {
        let store = SurrealStore::connect(config)
            .await
            .map_err(RunError::Connection)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Run all three phases, then release the connection
    ///
    /// The connection is closed whether the run succeeds or fails. A failure
    /// to close is logged and does not replace the run's own outcome.
    pub async fn run(
        self,
        post: NewPost,
        attachment: NewAttachment,
    ) -> Result<RunSummary, RunError> {
        let started_at = Instant::now();
        let outcome = self.run_phases(post, attachment).await;

        if let Err(e) = self.store.close().await {
            warn!(error = %e, "Failed to release document store connection");
        }

        match &outcome {
            Ok(_) => info!(
                duration_ms = started_at.elapsed().as_millis() as u64,
                "Run complete"
            ),
            Err(e) => error!(phase = e.phase(), error = %e, "Run failed"),
        }
        outcome
    }

    async fn run_phases(
        &self,
        post: NewPost,
        attachment: NewAttachment,
    ) -> Result<RunSummary, RunError> {
        let (mut post, mut attachment) = create_phase(&self.store, post, attachment).await?;
        link_phase(&self.store, &mut post, &mut attachment).await?;
        let report = read_phase(&self.store).await?;

        Ok(RunSummary {
            post,
            attachment,
            report,
        })
    }
}

/// Connect with `config`, then [`Orchestrator::run`]
pub async fn run_with_config(
    config: &StoreConfig,
    post: NewPost,
    attachment: NewAttachment,
) -> Result<RunSummary, RunError> {
    Orchestrator::connect(config)
        .await?
        .run(post, attachment)
        .await
}
