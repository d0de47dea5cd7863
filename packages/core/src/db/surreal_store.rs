//! SurrealStore - DocumentStore Implementation for SurrealDB
//!
//! This module implements the `DocumentStore` trait on top of SurrealDB,
//! reached through the `any` engine so one type serves every address form in
//! [`StoreConfig`]: embedded memory, embedded RocksDB, or a remote server.
//!
//! # Storage Layout
//!
//! - One SCHEMALESS table per collection (`posts`, `attachments`)
//! - Record IDs are `table:uuid`; the same UUID is duplicated into a `uuid` field,
//!   which is what lookups filter on
//! - `created_at` is stamped on insert and never rewritten, giving a stable
//!   listing order
//!
//! # Examples
//!
//! ```rust,no_run
//! use crossref_core::config::StoreConfig;
//! use crossref_core::db::{DocumentStore, SurrealStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SurrealStore::connect(&StoreConfig::in_memory()).await?;
//!     let id = store.insert("posts", json!({ "title": "Hello" })).await?;
//!     println!("stored post {id}");
//!     store.close().await?;
//!     Ok(())
//! }
//! ```

use super::document_store::{DocumentStore, ID_FIELD};
use super::error::{StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::models::{DocumentId, DocumentKind};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::future::IntoFuture;
use std::time::{Duration, Instant};
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

const CREATED_AT_FIELD: &str = "created_at";

/// Bound a single round-trip by `after`
async fn within<F>(operation: &'static str, after: Duration, fut: F) -> StoreResult<F::Output>
where
    F: IntoFuture,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| StoreError::timeout(operation, after))
}

/// SurrealStore implements DocumentStore for any SurrealDB engine
pub struct SurrealStore {
    /// `None` once the connection has been released
    db: RwLock<Option<Surreal<Any>>>,
    endpoint: String,
    request_timeout: Duration,
}

impl SurrealStore {
    /// Open a connection and make sure both collections exist
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the endpoint cannot be
    /// reached, credentials are rejected, or namespace selection fails;
    /// `StoreError::Timeout` if any bootstrap step exceeds the request timeout.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let started_at = Instant::now();
        let endpoint = config.endpoint.clone();
        info!(
            endpoint = %endpoint,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to document store"
        );

        let db = within(
            "connect",
            config.request_timeout,
            any::connect(endpoint.as_str()),
        )
        .await?
        .map_err(|e| {
            error!(endpoint = %endpoint, error = %e, "Document store connection failed");
            StoreError::connection_failed(&endpoint, e)
        })?;

        if let Some(credentials) = &config.credentials {
            within(
                "signin",
                config.request_timeout,
                db.signin(Root {
                    username: &credentials.username,
                    password: &credentials.password,
                }),
            )
            .await?
            .map_err(|e| StoreError::connection_failed(&endpoint, e))?;
        }

        within(
            "use_ns",
            config.request_timeout,
            db.use_ns(config.namespace.as_str())
                .use_db(config.database.as_str()),
        )
        .await?
        .map_err(|e| StoreError::connection_failed(&endpoint, e))?;

        let store = Self {
            db: RwLock::new(Some(db)),
            endpoint,
            request_timeout: config.request_timeout,
        };
        store.initialize_schema().await?;

        info!(
            endpoint = %store.endpoint,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Document store ready"
        );
        Ok(store)
    }

    /// Define one SCHEMALESS table per document kind
    async fn initialize_schema(&self) -> StoreResult<()> {
        let db = self.handle().await?;
        for kind in DocumentKind::ALL {
            let collection = kind.collection();
            within(
                "define_table",
                self.request_timeout,
                db.query(format!(
                    "DEFINE TABLE IF NOT EXISTS {} SCHEMALESS;",
                    collection
                )),
            )
            .await?
            .and_then(|response| response.check())
            .map_err(|e| StoreError::query_failed(format!("define table {collection}"), e))?;
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn is_closed(&self) -> bool {
        self.db.read().await.is_none()
    }

    async fn handle(&self) -> StoreResult<Surreal<Any>> {
        self.db.read().await.clone().ok_or(StoreError::Closed)
    }

    /// Force the identifier into the body; stamp `created_at` on insert only
    fn stamp(
        collection: &'static str,
        body: Value,
        id: DocumentId,
        inserting: bool,
    ) -> StoreResult<Map<String, Value>> {
        let Value::Object(mut fields) = body else {
            return Err(StoreError::InvalidBody { collection });
        };
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        if inserting {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
            fields.insert(CREATED_AT_FIELD.to_string(), Value::String(now));
        } else {
            fields.remove(CREATED_AT_FIELD);
        }
        Ok(fields)
    }
}

#[async_trait]
impl DocumentStore for SurrealStore {
    async fn insert(&self, collection: &'static str, body: Value) -> StoreResult<DocumentId> {
        let db = self.handle().await?;
        let id = DocumentId::generate();
        let content = Self::stamp(collection, body, id, true)?;

        within(
            "create",
            self.request_timeout,
            db.query("CREATE type::thing($table, $id) CONTENT $content RETURN NONE;")
                .bind(("table", collection))
                .bind(("id", id.to_string()))
                .bind(("content", Value::Object(content))),
        )
        .await?
        .and_then(|response| response.check())
        .map_err(|e| StoreError::query_failed(format!("create in {collection}"), e))?;

        debug!(collection, %id, "Document created");
        Ok(id)
    }

    async fn replace(
        &self,
        collection: &'static str,
        id: DocumentId,
        body: Value,
    ) -> StoreResult<()> {
        let db = self.handle().await?;
        let content = Self::stamp(collection, body, id, false)?;

        let mut response = within(
            "save",
            self.request_timeout,
            db.query("UPDATE type::thing($table, $id) MERGE $content RETURN uuid;")
                .bind(("table", collection))
                .bind(("id", id.to_string()))
                .bind(("content", Value::Object(content))),
        )
        .await?
        .map_err(|e| StoreError::query_failed(format!("save {id} in {collection}"), e))?;

        let updated: Vec<Value> = response
            .take(0)
            .map_err(|e| StoreError::query_failed(format!("save {id} in {collection}"), e))?;

        if updated.is_empty() {
            return Err(StoreError::not_found(collection, id));
        }

        debug!(collection, %id, "Document saved");
        Ok(())
    }

    async fn find_all(&self, collection: &'static str) -> StoreResult<Vec<Value>> {
        let db = self.handle().await?;

        let mut response = within(
            "find",
            self.request_timeout,
            db.query("SELECT * OMIT id FROM type::table($table) ORDER BY created_at ASC;")
                .bind(("table", collection)),
        )
        .await?
        .map_err(|e| StoreError::query_failed(format!("list {collection}"), e))?;

        let documents: Vec<Value> = response
            .take(0)
            .map_err(|e| StoreError::query_failed(format!("list {collection}"), e))?;

        debug!(collection, count = documents.len(), "Documents listed");
        Ok(documents)
    }

    async fn find_by_ids(
        &self,
        collection: &'static str,
        ids: &[DocumentId],
    ) -> StoreResult<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = self.handle().await?;
        let wanted: Vec<String> = ids.iter().map(ToString::to_string).collect();

        let mut response = within(
            "find",
            self.request_timeout,
            db.query("SELECT * OMIT id FROM type::table($table) WHERE uuid INSIDE $ids;")
                .bind(("table", collection))
                .bind(("ids", wanted)),
        )
        .await?
        .map_err(|e| StoreError::query_failed(format!("resolve ids in {collection}"), e))?;

        let documents: Vec<Value> = response
            .take(0)
            .map_err(|e| StoreError::query_failed(format!("resolve ids in {collection}"), e))?;

        debug!(
            collection,
            requested = ids.len(),
            found = documents.len(),
            "Documents resolved by id"
        );
        Ok(documents)
    }

    async fn close(&self) -> StoreResult<()> {
        // Dropping the last handle releases the engine
        match self.db.write().await.take() {
            Some(_) => info!(endpoint = %self.endpoint, "Document store connection released"),
            None => debug!(endpoint = %self.endpoint, "Document store already closed"),
        }
        Ok(())
    }
}
