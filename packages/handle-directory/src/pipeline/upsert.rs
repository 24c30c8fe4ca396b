//! Write path: merge a submission into an existing row or create one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{DirectoryError, Result, StoreError};
use crate::handles::validate_handle;
use crate::traits::store::DirectoryStore;
use crate::types::{
    ContributorId, DirectoryRecord, NewRecord, Platform, RecordChanges, RecordId, Submission,
};

use super::directory::Directory;

/// Result of an upsert, distinguishing a fresh row from a merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created(DirectoryRecord),
    Updated(DirectoryRecord),
}

impl UpsertOutcome {
    pub fn record(&self) -> &DirectoryRecord {
        match self {
            UpsertOutcome::Created(record) | UpsertOutcome::Updated(record) => record,
        }
    }

    pub fn into_record(self) -> DirectoryRecord {
        match self {
            UpsertOutcome::Created(record) | UpsertOutcome::Updated(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}

impl<S: DirectoryStore> Directory<S> {
    /// Normalize, validate and store one submission.
    ///
    /// See [`upsert_with_outcome`](Self::upsert_with_outcome).
    pub async fn upsert(&self, submission: Submission) -> Result<DirectoryRecord> {
        Ok(self.upsert_with_outcome(submission).await?.into_record())
    }

    /// Normalize, validate and store one submission, reporting whether a row
    /// was created or an existing one updated.
    ///
    /// Upserts of the same `(platform, handle)` are serialized within this
    /// process. If another process inserts the same key first, a store with a
    /// unique constraint reports a conflict and the submission is applied as
    /// an update instead. Stores without such a constraint can still end up
    /// with duplicate rows under cross-process races.
    #[instrument(skip(self, submission), fields(platform = %submission.platform))]
    pub async fn upsert_with_outcome(&self, submission: Submission) -> Result<UpsertOutcome> {
        let platform = submission.platform;
        let handle = validate_handle(platform, &submission.handle)?;
        let name = self
            .resolve_name(submission.name.as_deref(), &submission.handle)
            .await?;
        let now = Utc::now();

        let _guard = self.locks.acquire(platform, &handle).await;

        if let Some(existing) = self.store.find_one(platform, &handle).await? {
            let record = self
                .merge(existing.id, name, submission.contributor_id, now)
                .await?;
            debug!(id = %record.id, handle = %record.handle, "Merged submission");
            return Ok(UpsertOutcome::Updated(record));
        }

        let mut new_record = NewRecord::new(platform, handle.clone())
            .with_contributor(submission.contributor_id);
        new_record.canonical_name = name.clone();
        new_record.seen_at = now;

        match self.store.insert(new_record).await {
            Ok(record) => {
                info!(
                    id = %record.id,
                    handle = %record.handle,
                    canonical_name = ?record.canonical_name,
                    "Created directory record"
                );
                Ok(UpsertOutcome::Created(record))
            }
            Err(StoreError::Conflict { .. }) => {
                warn!(handle = %handle, "Insert lost a race, applying as update");
                let existing = self.store.find_one(platform, &handle).await?.ok_or_else(|| {
                    StoreError::Conflict {
                        platform,
                        handle: handle.clone(),
                    }
                })?;
                let record = self
                    .merge(existing.id, name, submission.contributor_id, now)
                    .await?;
                Ok(UpsertOutcome::Updated(record))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a row verified or unverified.
    #[instrument(skip(self))]
    pub async fn set_verified(&self, id: RecordId, verified: bool) -> Result<DirectoryRecord> {
        let changes = RecordChanges {
            verified: Some(verified),
            ..Default::default()
        };
        let record = self.store.update(id, changes).await?;
        info!(id = %record.id, verified, "Updated verification");
        Ok(record)
    }

    /// Remove a row permanently.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.store.delete(id).await?;
        info!(id = %id, "Deleted directory record");
        Ok(())
    }

    /// Look up a single row by id.
    pub async fn get(&self, id: RecordId) -> Result<DirectoryRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::Store(StoreError::NotFound { id }))
    }

    /// Exact lookup by platform and raw handle (normalized first).
    pub async fn find(&self, platform: Platform, handle: &str) -> Result<Option<DirectoryRecord>> {
        let handle = validate_handle(platform, handle)?;
        Ok(self.store.find_one(platform, &handle).await?)
    }

    /// Submitted name, else one derived from the handle, folded into the
    /// closest canonical name already on file.
    async fn resolve_name(&self, submitted: Option<&str>, raw_handle: &str) -> Result<Option<String>> {
        let candidate = submitted
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.normalizer.extract_from_handle(raw_handle));
        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let normalized = self.normalizer.normalize(&candidate);
        if normalized.is_empty() {
            return Ok(None);
        }

        let existing = self.store.distinct_canonical_names().await?;
        let folded = self
            .resolver
            .best_match(&normalized, &existing, self.config.match_threshold);
        if let Some(canonical) = &folded {
            if *canonical != normalized {
                debug!(from = %normalized, to = %canonical, "Folded name into existing identity");
            }
        }
        Ok(Some(folded.unwrap_or(normalized)))
    }

    async fn merge(
        &self,
        id: RecordId,
        name: Option<String>,
        contributor_id: ContributorId,
        seen_at: DateTime<Utc>,
    ) -> Result<DirectoryRecord> {
        let changes = RecordChanges {
            canonical_name: name,
            contributor_id: Some(contributor_id),
            last_seen_at: Some(seen_at),
            ..Default::default()
        };
        Ok(self.store.update(id, changes).await?)
    }
}
