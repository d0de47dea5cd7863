//! Crossref Core
//!
//! Keeps a many-to-many Post ↔ Attachment relationship consistent in a
//! schemaless document store where each side stores only the identifiers of
//! the other.
//!
//! # Modules
//!
//! - [`models`] - `Post`, `Attachment`, identifiers and validation
//! - [`db`] - document store seam, SurrealDB implementation, typed collection ops
//! - [`services`] - reference linker, graph materializer, phased orchestrator
//! - [`config`] - store address and timeouts

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::StoreConfig;
pub use models::*;
pub use services::*;
