//! The directory store trait.
//!
//! This is the only boundary that touches persistence. Implementations make
//! no atomicity promise across a `find_one` followed by an `insert`; the
//! upsert pipeline closes that gap itself where it can (see
//! [`Directory::upsert`](crate::pipeline::Directory::upsert)).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{DirectoryRecord, NewRecord, Platform, RecordChanges, RecordId};

/// Column a [`RecordQuery`] pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    CanonicalName,
    Handle,
}

/// How a [`RecordQuery`] pattern is matched (always case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Substring,
    Prefix,
}

/// Row order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryOrder {
    /// Verified rows first, then most recently seen.
    #[default]
    VerifiedFirst,
    /// Handle ascending, then platform.
    HandleAsc,
    /// Most recently seen first.
    LastSeenDesc,
}

/// A case-insensitive match over one or more text columns.
///
/// A row matches when ANY of `fields` matches `pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub fields: Vec<QueryField>,
    pub pattern: String,
    pub mode: MatchMode,
    pub order: QueryOrder,
    pub limit: usize,
}

impl RecordQuery {
    pub fn new(fields: impl IntoIterator<Item = QueryField>, pattern: impl Into<String>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            pattern: pattern.into(),
            mode: MatchMode::default(),
            order: QueryOrder::default(),
            limit: 50,
        }
    }

    pub fn prefix(mut self) -> Self {
        self.mode = MatchMode::Prefix;
        self
    }

    pub fn order_by(mut self, order: QueryOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// In-process evaluation of the match rule, shared by non-SQL stores.
    pub fn matches(&self, record: &DirectoryRecord) -> bool {
        let needle = self.pattern.to_lowercase();
        self.fields.iter().any(|field| {
            let value = match field {
                QueryField::CanonicalName => match &record.canonical_name {
                    Some(name) => name.to_lowercase(),
                    None => return false,
                },
                QueryField::Handle => record.handle.to_lowercase(),
            };
            match self.mode {
                MatchMode::Substring => value.contains(&needle),
                MatchMode::Prefix => value.starts_with(&needle),
            }
        })
    }

    /// Ordering rule as a comparator, shared by non-SQL stores.
    pub fn compare(&self, a: &DirectoryRecord, b: &DirectoryRecord) -> std::cmp::Ordering {
        match self.order {
            QueryOrder::VerifiedFirst => b
                .verified
                .cmp(&a.verified)
                .then(b.last_seen_at.cmp(&a.last_seen_at))
                .then(a.handle.cmp(&b.handle)),
            QueryOrder::HandleAsc => a
                .handle
                .cmp(&b.handle)
                .then(a.platform.cmp(&b.platform)),
            QueryOrder::LastSeenDesc => b
                .last_seen_at
                .cmp(&a.last_seen_at)
                .then(a.handle.cmp(&b.handle)),
        }
    }
}

/// Persistence for [`DirectoryRecord`]s.
///
/// Every call may fail; callers propagate the error.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Create a row. Stores that enforce `(platform, handle)` uniqueness
    /// return [`StoreError::Conflict`](crate::error::StoreError::Conflict).
    async fn insert(&self, record: NewRecord) -> StoreResult<DirectoryRecord>;

    /// Exact lookup by platform and normalized handle.
    async fn find_one(&self, platform: Platform, handle: &str)
        -> StoreResult<Option<DirectoryRecord>>;

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<DirectoryRecord>>;

    /// Apply `changes` and return the updated row, or
    /// [`StoreError::NotFound`](crate::error::StoreError::NotFound).
    async fn update(&self, id: RecordId, changes: RecordChanges) -> StoreResult<DirectoryRecord>;

    async fn query(&self, query: &RecordQuery) -> StoreResult<Vec<DirectoryRecord>>;

    /// Remove a row; [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// if it does not exist.
    async fn delete(&self, id: RecordId) -> StoreResult<()>;

    /// Every distinct non-null canonical name.
    async fn distinct_canonical_names(&self) -> StoreResult<Vec<String>>;

    /// Cheap reachability probe.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: DirectoryStore + ?Sized> DirectoryStore for Arc<S> {
    async fn insert(&self, record: NewRecord) -> StoreResult<DirectoryRecord> {
        (**self).insert(record).await
    }

    async fn find_one(
        &self,
        platform: Platform,
        handle: &str,
    ) -> StoreResult<Option<DirectoryRecord>> {
        (**self).find_one(platform, handle).await
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<DirectoryRecord>> {
        (**self).find_by_id(id).await
    }

    async fn update(&self, id: RecordId, changes: RecordChanges) -> StoreResult<DirectoryRecord> {
        (**self).update(id, changes).await
    }

    async fn query(&self, query: &RecordQuery) -> StoreResult<Vec<DirectoryRecord>> {
        (**self).query(query).await
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn distinct_canonical_names(&self) -> StoreResult<Vec<String>> {
        (**self).distinct_canonical_names().await
    }

    async fn health_check(&self) -> StoreResult<()> {
        (**self).health_check().await
    }
}
