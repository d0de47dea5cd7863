//! Typed Collection Operations
//!
//! Converts between the schemaless bodies a [`DocumentStore`] speaks and the
//! typed models in [`crate::models`]. Every write runs the document's
//! validation first, so an invalid document never reaches the store.

use super::document_store::DocumentStore;
use super::error::StoreResult;
use crate::models::{Document, DocumentId, NewDocument};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Result of resolving an identifier list
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<D> {
    /// Documents in the order their identifiers appeared, duplicates included
    pub found: Vec<D>,
    /// Identifiers with no matching document, in list order
    pub missing: Vec<DocumentId>,
}

/// Validate a draft, store it, and bind the identifier the store assigned
pub async fn create<N: NewDocument>(store: &dyn DocumentStore, draft: N) -> StoreResult<N::Output> {
    draft.validate()?;
    let body = serde_json::to_value(&draft)?;
    let id = store.insert(<N::Output as Document>::KIND.collection(), body).await?;
    Ok(draft.into_document(id))
}

/// Validate a persisted document and write its current state back
pub async fn save<D: Document>(store: &dyn DocumentStore, document: &D) -> StoreResult<()> {
    document.validate()?;
    let body = serde_json::to_value(document)?;
    store.replace(D::KIND.collection(), document.id(), body).await
}

/// Every document of kind `D`, oldest first
pub async fn find_all<D: Document>(store: &dyn DocumentStore) -> StoreResult<Vec<D>> {
    let bodies = store.find_all(D::KIND.collection()).await?;
    bodies.into_iter().map(decode::<D>).collect()
}

/// A single document of kind `D`, if it exists
pub async fn find_by_id<D: Document>(
    store: &dyn DocumentStore,
    id: DocumentId,
) -> StoreResult<Option<D>> {
    let bodies = store.find_by_ids(D::KIND.collection(), &[id]).await?;
    bodies.into_iter().next().map(decode::<D>).transpose()
}

/// Join an identifier list against the collection of kind `D`
///
/// One round-trip regardless of list length. Output follows `ids` order, so a
/// duplicated identifier yields the document twice. Identifiers that resolve
/// to nothing are reported in `missing` instead of failing the join.
pub async fn populate<D: Document>(
    store: &dyn DocumentStore,
    ids: &[DocumentId],
) -> StoreResult<Resolved<D>> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let bodies = store.find_by_ids(D::KIND.collection(), &unique).await?;
    let mut by_id: HashMap<DocumentId, D> = HashMap::with_capacity(bodies.len());
    for body in bodies {
        let document = decode::<D>(body)?;
        by_id.insert(document.id(), document);
    }

    let mut resolved = Resolved {
        found: Vec::with_capacity(ids.len()),
        missing: Vec::new(),
    };
    for id in ids {
        match by_id.get(id) {
            Some(document) => resolved.found.push(document.clone()),
            None => resolved.missing.push(*id),
        }
    }

    if !resolved.missing.is_empty() {
        warn!(
            collection = D::KIND.collection(),
            missing = resolved.missing.len(),
            "Dangling references skipped during populate"
        );
    }
    Ok(resolved)
}

fn decode<D: Document>(body: Value) -> StoreResult<D> {
    Ok(serde_json::from_value(body)?)
}
