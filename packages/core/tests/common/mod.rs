//! Shared test helpers: an in-memory store wrapped with fault injection and
//! an operation log.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use crossref_core::config::StoreConfig;
use crossref_core::db::{DocumentStore, StoreError, StoreResult, SurrealStore};
use crossref_core::DocumentId;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

/// One store call as seen by [`FaultyStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert(&'static str),
    Replace(&'static str, DocumentId),
    FindAll(&'static str),
    FindByIds(&'static str),
    Close,
}

/// Wraps a real store; fails selected operations per collection
pub struct FaultyStore {
    inner: SurrealStore,
    fail_insert: HashSet<&'static str>,
    fail_replace: HashSet<&'static str>,
    fail_find: HashSet<&'static str>,
    ops: Mutex<Vec<Op>>,
    close_calls: AtomicUsize,
}

impl FaultyStore {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            inner: SurrealStore::connect(&StoreConfig::in_memory()).await?,
            fail_insert: HashSet::new(),
            fail_replace: HashSet::new(),
            fail_find: HashSet::new(),
            ops: Mutex::new(Vec::new()),
            close_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing_insert(mut self, collection: &'static str) -> Self {
        self.fail_insert.insert(collection);
        self
    }

    pub fn failing_replace(mut self, collection: &'static str) -> Self {
        self.fail_replace.insert(collection);
        self
    }

    pub fn failing_find(mut self, collection: &'static str) -> Self {
        self.fail_find.insert(collection);
        self
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// The wrapped store, bypassing fault injection
    pub fn inner(&self) -> &SurrealStore {
        &self.inner
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }

    fn injected(operation: &str, collection: &str) -> StoreError {
        StoreError::backend(format!("injected {operation} failure on {collection}"))
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn insert(&self, collection: &'static str, body: Value) -> StoreResult<DocumentId> {
        self.record(Op::Insert(collection));
        if self.fail_insert.contains(collection) {
            return Err(Self::injected("insert", collection));
        }
        self.inner.insert(collection, body).await
    }

    async fn replace(
        &self,
        collection: &'static str,
        id: DocumentId,
        body: Value,
    ) -> StoreResult<()> {
        self.record(Op::Replace(collection, id));
        if self.fail_replace.contains(collection) {
            return Err(Self::injected("replace", collection));
        }
        self.inner.replace(collection, id, body).await
    }

    async fn find_all(&self, collection: &'static str) -> StoreResult<Vec<Value>> {
        self.record(Op::FindAll(collection));
        if self.fail_find.contains(collection) {
            return Err(Self::injected("find", collection));
        }
        self.inner.find_all(collection).await
    }

    async fn find_by_ids(
        &self,
        collection: &'static str,
        ids: &[DocumentId],
    ) -> StoreResult<Vec<Value>> {
        self.record(Op::FindByIds(collection));
        if self.fail_find.contains(collection) {
            return Err(Self::injected("find", collection));
        }
        self.inner.find_by_ids(collection, ids).await
    }

    async fn close(&self) -> StoreResult<()> {
        self.record(Op::Close);
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.close().await
    }
}

/// Holds every insert until `parties` inserts are in flight at once
pub struct BarrierStore {
    inner: SurrealStore,
    barrier: Barrier,
}

impl BarrierStore {
    pub async fn new(parties: usize) -> Result<Self> {
        Ok(Self {
            inner: SurrealStore::connect(&StoreConfig::in_memory()).await?,
            barrier: Barrier::new(parties),
        })
    }
}

#[async_trait]
impl DocumentStore for BarrierStore {
    async fn insert(&self, collection: &'static str, body: Value) -> StoreResult<DocumentId> {
        self.barrier.wait().await;
        self.inner.insert(collection, body).await
    }

    async fn replace(
        &self,
        collection: &'static str,
        id: DocumentId,
        body: Value,
    ) -> StoreResult<()> {
        self.inner.replace(collection, id, body).await
    }

    async fn find_all(&self, collection: &'static str) -> StoreResult<Vec<Value>> {
        self.inner.find_all(collection).await
    }

    async fn find_by_ids(
        &self,
        collection: &'static str,
        ids: &[DocumentId],
    ) -> StoreResult<Vec<Value>> {
        self.inner.find_by_ids(collection, ids).await
    }

    async fn close(&self) -> StoreResult<()> {
        self.inner.close().await
    }
}

/// Erase the concrete type while keeping a handle for assertions
pub fn as_dyn(store: &Arc<FaultyStore>) -> Arc<dyn DocumentStore> {
    store.clone()
}
