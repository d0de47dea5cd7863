//! Store Error Types
//!
//! This module defines error types for document store operations, providing
//! clear error handling for connection, validation, and query failures.

use crate::models::{DocumentId, ValidationError};
use std::time::Duration;
use thiserror::Error;

/// Document store operation errors
///
/// Covers connection bootstrap, round-trip failures, and the store-side
/// constraint check that runs before every write. Link and join failures are
/// reported by service-layer error types that wrap this one.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish the store connection
    #[error("Failed to connect to document store at {address}: {source}")]
    ConnectionFailed {
        address: String,
        #[source]
        source: surrealdb::Error,
    },

    /// A document failed store-side constraints
    #[error("Document validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A query round-trip failed
    #[error("Store query failed ({context}): {source}")]
    QueryFailed {
        context: String,
        #[source]
        source: surrealdb::Error,
    },

    /// A query round-trip did not finish before the deadline
    #[error("Store {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A save targeted a document that is not in its collection
    #[error("Document {id} not found in collection {collection}")]
    NotFound {
        collection: &'static str,
        id: DocumentId,
    },

    /// Document body handed to the store was not a JSON object
    #[error("Document body for collection {collection} must be a JSON object")]
    InvalidBody { collection: &'static str },

    /// Document body could not be converted to or from its typed model
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection has been released
    #[error("Document store connection is closed")]
    Closed,

    /// Failure reported by a non-SurrealDB store implementation
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a connection failed error
    pub fn connection_failed(address: impl Into<String>, source: surrealdb::Error) -> Self {
        Self::ConnectionFailed {
            address: address.into(),
            source,
        }
    }

    /// Create a query failed error with context
    pub fn query_failed(context: impl Into<String>, source: surrealdb::Error) -> Self {
        Self::QueryFailed {
            context: context.into(),
            source,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: &'static str, after: Duration) -> Self {
        Self::Timeout { operation, after }
    }

    /// Create a not found error
    pub fn not_found(collection: &'static str, id: DocumentId) -> Self {
        Self::NotFound { collection, id }
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Whether this error is fatal to the whole run rather than one phase
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Closed)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
