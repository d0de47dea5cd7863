//! End-to-end link demo
//!
//! Creates one post and one attachment, links them, then prints the
//! materialized graph from both sides.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store (default)
//! cargo run --bin crossref-demo
//!
//! # Against a running SurrealDB server
//! CROSSREF_STORE_URI=http://127.0.0.1:8000/circular \
//! CROSSREF_STORE_USER=root CROSSREF_STORE_PASS=root \
//! cargo run --bin crossref-demo
//! ```
//!
//! Logging is controlled with `RUST_LOG`, defaulting to
//! `crossref_demo=info,crossref_core=info`.

use crossref_core::{run_with_config, NewAttachment, NewPost, StoreConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "crossref_demo=info,crossref_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = StoreConfig::from_env()?;
    tracing::info!(endpoint = %config.endpoint, database = %config.database, "Using document store");

    let stamp = chrono::Utc::now().timestamp_millis();
    let title = format!("Test post ({stamp})");
    let post = NewPost::new(title.clone(), title);
    let attachment = NewAttachment::new(format!("test_{stamp}.txt"));

    let summary = run_with_config(&config, post, attachment).await?;
    print!("{}", summary.report);
    Ok(())
}
