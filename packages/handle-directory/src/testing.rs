//! Testing utilities: a call-recording store wrapper and an always-failing
//! store.
//!
//! Useful for asserting which store calls a directory operation makes (or
//! that it makes none) without a database.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{DirectoryStore, MatchMode, RecordQuery};
use crate::types::{DirectoryRecord, NewRecord, Platform, RecordChanges, RecordId};

/// Record of a call made to a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Insert { platform: Platform, handle: String },
    FindOne { platform: Platform, handle: String },
    FindById { id: RecordId },
    Update { id: RecordId },
    Query { pattern: String, mode: MatchMode, limit: usize },
    Delete { id: RecordId },
    DistinctCanonicalNames,
    HealthCheck,
}

/// Wraps another store and records every call before delegating.
pub struct RecordingStore<S> {
    inner: S,
    calls: Arc<RwLock<Vec<StoreCall>>>,
}

impl<S: DirectoryStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get all calls made to this store.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl<S: DirectoryStore> DirectoryStore for RecordingStore<S> {
    async fn insert(&self, record: NewRecord) -> StoreResult<DirectoryRecord> {
        self.record(StoreCall::Insert {
            platform: record.platform,
            handle: record.handle.clone(),
        });
        self.inner.insert(record).await
    }

    async fn find_one(
        &self,
        platform: Platform,
        handle: &str,
    ) -> StoreResult<Option<DirectoryRecord>> {
        self.record(StoreCall::FindOne {
            platform,
            handle: handle.to_string(),
        });
        self.inner.find_one(platform, handle).await
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<DirectoryRecord>> {
        self.record(StoreCall::FindById { id });
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: RecordId, changes: RecordChanges) -> StoreResult<DirectoryRecord> {
        self.record(StoreCall::Update { id });
        self.inner.update(id, changes).await
    }

    async fn query(&self, query: &RecordQuery) -> StoreResult<Vec<DirectoryRecord>> {
        self.record(StoreCall::Query {
            pattern: query.pattern.clone(),
            mode: query.mode,
            limit: query.limit,
        });
        self.inner.query(query).await
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.record(StoreCall::Delete { id });
        self.inner.delete(id).await
    }

    async fn distinct_canonical_names(&self) -> StoreResult<Vec<String>> {
        self.record(StoreCall::DistinctCanonicalNames);
        self.inner.distinct_canonical_names().await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.record(StoreCall::HealthCheck);
        self.inner.health_check().await
    }
}

/// A store whose every call fails with [`StoreError::Unavailable`].
#[derive(Debug, Clone)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> StoreResult<T> {
        Err(StoreError::Unavailable(self.message.clone()))
    }
}

#[async_trait]
impl DirectoryStore for FailingStore {
    async fn insert(&self, _record: NewRecord) -> StoreResult<DirectoryRecord> {
        self.fail()
    }

    async fn find_one(
        &self,
        _platform: Platform,
        _handle: &str,
    ) -> StoreResult<Option<DirectoryRecord>> {
        self.fail()
    }

    async fn find_by_id(&self, _id: RecordId) -> StoreResult<Option<DirectoryRecord>> {
        self.fail()
    }

    async fn update(&self, _id: RecordId, _changes: RecordChanges) -> StoreResult<DirectoryRecord> {
        self.fail()
    }

    async fn query(&self, _query: &RecordQuery) -> StoreResult<Vec<DirectoryRecord>> {
        self.fail()
    }

    async fn delete(&self, _id: RecordId) -> StoreResult<()> {
        self.fail()
    }

    async fn distinct_canonical_names(&self) -> StoreResult<Vec<String>> {
        self.fail()
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.fail()
    }
}
