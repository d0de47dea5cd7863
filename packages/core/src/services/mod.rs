//! Business Services
//!
//! This module contains the link logic built on top of the store layer:
//!
//! - `ReferenceLinker` - writes a Post ↔ Attachment link, post side first
//! - `GraphMaterializer` - resolves reference lists into documents at read time
//! - `Orchestrator` - runs create, link and read as strictly ordered phases
//! - `LinkReport` - plain-text summary of the materialized graph

pub mod error;
pub mod linker;
pub mod materializer;
pub mod orchestrator;
pub mod report;

pub use error::{JoinError, LinkError, RunError};
pub use linker::ReferenceLinker;
pub use materializer::{GraphMaterializer, Populated};
pub use orchestrator::{
    create_phase, link_phase, read_phase, run_with_config, Orchestrator, RunSummary,
};
pub use report::LinkReport;
