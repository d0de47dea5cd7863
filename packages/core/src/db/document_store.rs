//! DocumentStore Trait - Store Abstraction Layer
//!
//! This module defines the `DocumentStore` trait that abstracts the
//! schemaless document backend. Services talk to the trait, never to a
//! concrete client, which lets tests wrap a real store with fault injection.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: every method is a store round-trip and suspends the caller
//!    until the backend acknowledges
//! 2. **Schemaless Bodies**: documents cross the seam as `serde_json::Value`;
//!    typed conversion lives in [`crate::db::collection`]
//! 3. **Store-Assigned Identity**: `insert` allocates the identifier and writes
//!    it into the body under `uuid`
//! 4. **No Transactions**: each call is independent; callers own ordering

use super::error::StoreResult;
use crate::models::DocumentId;
use async_trait::async_trait;
use serde_json::Value;

/// Field every stored body carries its identifier under
pub const ID_FIELD: &str = "uuid";

/// Abstraction layer for document persistence
///
/// Implementations must be `Send + Sync` so a single connection can be shared
/// by reference across concurrently polled futures.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return the identifier assigned to it
    ///
    /// `body` must be a JSON object. Any `uuid` already present is overwritten.
    async fn insert(&self, collection: &'static str, body: Value) -> StoreResult<DocumentId>;

    /// Overwrite the fields of an existing document
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no document with `id` exists.
    async fn replace(
        &self,
        collection: &'static str,
        id: DocumentId,
        body: Value,
    ) -> StoreResult<()>;

    /// Every document in the collection, oldest first
    async fn find_all(&self, collection: &'static str) -> StoreResult<Vec<Value>>;

    /// Documents whose identifier is in `ids`
    ///
    /// Result order is unspecified and missing identifiers are skipped; the
    /// typed populate step restores reference order.
    async fn find_by_ids(
        &self,
        collection: &'static str,
        ids: &[DocumentId],
    ) -> StoreResult<Vec<Value>>;

    /// Release the connection; later calls fail with `StoreError::Closed`
    async fn close(&self) -> StoreResult<()>;
}
