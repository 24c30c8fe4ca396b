//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{DirectoryStore, RecordQuery};
use crate::types::{DirectoryRecord, NewRecord, Platform, RecordChanges, RecordId};

/// In-memory directory rows.
///
/// Enforces the `(platform, handle)` unique key like the PostgreSQL store.
/// Not suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, DirectoryRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing rows, bypassing the unique-key check.
    pub fn with_records(records: impl IntoIterator<Item = DirectoryRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write().unwrap();
            for record in records {
                map.insert(record.id, record);
            }
        }
        store
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every row, oldest first.
    pub fn all(&self) -> Vec<DirectoryRecord> {
        let mut rows: Vec<_> = self.records.read().unwrap().values().cloned().collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        rows
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn insert(&self, record: NewRecord) -> StoreResult<DirectoryRecord> {
        let mut records = self.records.write().unwrap();
        if records
            .values()
            .any(|r| r.platform == record.platform && r.handle == record.handle)
        {
            return Err(StoreError::Conflict {
                platform: record.platform,
                handle: record.handle,
            });
        }

        let now = Utc::now();
        let row = DirectoryRecord {
            id: RecordId::new(),
            contributor_id: record.contributor_id,
            canonical_name: record.canonical_name,
            platform: record.platform,
            handle: record.handle,
            verified: record.verified,
            first_seen_at: record.seen_at,
            last_seen_at: record.seen_at,
            created_at: now,
            updated_at: now,
        };
        records.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_one(
        &self,
        platform: Platform,
        handle: &str,
    ) -> StoreResult<Option<DirectoryRecord>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .values()
            .find(|r| r.platform == platform && r.handle == handle)
            .cloned())
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<Option<DirectoryRecord>> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, id: RecordId, changes: RecordChanges) -> StoreResult<DirectoryRecord> {
        let mut records = self.records.write().unwrap();
        let record = records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        changes.apply(record, Utc::now());
        Ok(record.clone())
    }

    async fn query(&self, query: &RecordQuery) -> StoreResult<Vec<DirectoryRecord>> {
        let mut rows: Vec<DirectoryRecord> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.compare(a, b));
        rows.truncate(query.limit);
        Ok(rows)
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        match self.records.write().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { id }),
        }
    }

    async fn distinct_canonical_names(&self) -> StoreResult<Vec<String>> {
        let names: BTreeSet<String> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter_map(|r| r.canonical_name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::store::{QueryField, QueryOrder};

    #[tokio::test]
    async fn insert_enforces_unique_key() {
        let store = MemoryStore::new();
        store
            .insert(NewRecord::new(Platform::Instagram, "nike"))
            .await
            .unwrap();
        let err = store
            .insert(NewRecord::new(Platform::Instagram, "nike"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        // same handle on another platform is a different key
        store
            .insert(NewRecord::new(Platform::Tiktok, "nike"))
            .await
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids() {
        let store = MemoryStore::new();
        let id = RecordId::new();
        assert!(matches!(
            store.update(id, RecordChanges::default()).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_bumps_updated_at_only_for_given_fields() {
        let store = MemoryStore::new();
        let row = store
            .insert(NewRecord::new(Platform::Instagram, "nike").with_name("Nike"))
            .await
            .unwrap();
        let changes = RecordChanges {
            verified: Some(true),
            ..Default::default()
        };
        let updated = store.update(row.id, changes).await.unwrap();
        assert!(updated.verified);
        assert_eq!(updated.canonical_name.as_deref(), Some("Nike"));
        assert!(updated.updated_at >= row.updated_at);
        assert_eq!(updated.first_seen_at, row.first_seen_at);
    }

    #[tokio::test]
    async fn query_is_case_insensitive_and_ordered() {
        let store = MemoryStore::new();
        store
            .insert(NewRecord::new(Platform::Instagram, "nikerunning").with_name("Nike Running"))
            .await
            .unwrap();
        store
            .insert(NewRecord::new(Platform::TwitterX, "nike").with_name("Nike").verified(true))
            .await
            .unwrap();
        store
            .insert(NewRecord::new(Platform::Tiktok, "adidas").with_name("Adidas"))
            .await
            .unwrap();

        let query = RecordQuery::new([QueryField::CanonicalName, QueryField::Handle], "NIKE");
        let rows = store.query(&query).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].handle, "nike");

        let prefix = RecordQuery::new([QueryField::Handle], "nike")
            .prefix()
            .order_by(QueryOrder::HandleAsc)
            .limit(1);
        let rows = store.query(&prefix).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].handle, "nike");
    }

    #[tokio::test]
    async fn distinct_names_skip_nulls() {
        let store = MemoryStore::new();
        for (platform, handle, name) in [
            (Platform::Instagram, "nike", Some("Nike")),
            (Platform::TwitterX, "nike", Some("Nike")),
            (Platform::Tiktok, "mystery", None),
        ] {
            let mut record = NewRecord::new(platform, handle);
            record.canonical_name = name.map(str::to_string);
            store.insert(record).await.unwrap();
        }
        assert_eq!(store.distinct_canonical_names().await.unwrap(), vec!["Nike"]);
    }
}
