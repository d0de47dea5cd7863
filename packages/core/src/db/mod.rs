//! Database Layer
//!
//! This module handles all document store interactions:
//!
//! - [`DocumentStore`] - the schemaless store seam (insert, replace, find, close)
//! - [`SurrealStore`] - SurrealDB implementation over the `any` engine
//! - [`collection`] - typed create/save/find and the identifier join (`populate`)
//!
//! Nothing in this layer knows about links between kinds; it only stores
//! documents and resolves identifier lists.

pub mod collection;
mod document_store;
mod error;
mod surreal_store;

pub use collection::Resolved;
pub use document_store::{DocumentStore, ID_FIELD};
pub use error::{StoreError, StoreResult};
pub use surreal_store::SurrealStore;
