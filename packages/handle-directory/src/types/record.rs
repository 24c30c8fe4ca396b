use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ContributorId, RecordId};
use super::platform::Platform;

/// A stored directory row: one handle on one platform.
///
/// `(platform, handle)` is the de-facto unique key. `handle` is always the
/// platform-normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub id: RecordId,
    pub contributor_id: ContributorId,
    pub canonical_name: Option<String>,
    pub platform: Platform,
    pub handle: String,
    pub verified: bool,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new row.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub contributor_id: ContributorId,
    pub canonical_name: Option<String>,
    pub platform: Platform,
    pub handle: String,
    pub verified: bool,
    pub seen_at: DateTime<Utc>,
}

impl NewRecord {
    pub fn new(platform: Platform, handle: impl Into<String>) -> Self {
        Self {
            contributor_id: ContributorId::nil(),
            canonical_name: None,
            platform,
            handle: handle.into(),
            verified: false,
            seen_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.canonical_name = Some(name.into());
        self
    }

    pub fn with_contributor(mut self, contributor_id: ContributorId) -> Self {
        self.contributor_id = contributor_id;
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }
}

/// Partial update applied by [`DirectoryStore::update`](crate::traits::store::DirectoryStore::update).
///
/// `None` fields are left untouched; `updated_at` is always bumped.
#[derive(Debug, Clone, Default)]
pub struct RecordChanges {
    pub canonical_name: Option<String>,
    pub contributor_id: Option<ContributorId>,
    pub verified: Option<bool>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl RecordChanges {
    /// Apply to an in-memory record (used by the memory store and tests).
    pub fn apply(&self, record: &mut DirectoryRecord, now: DateTime<Utc>) {
        if let Some(name) = &self.canonical_name {
            record.canonical_name = Some(name.clone());
        }
        if let Some(contributor_id) = self.contributor_id {
            record.contributor_id = contributor_id;
        }
        if let Some(verified) = self.verified {
            record.verified = verified;
        }
        if let Some(seen) = self.last_seen_at {
            record.last_seen_at = seen;
        }
        record.updated_at = now;
    }
}

/// A single contributor submission fed to the upsert pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub platform: Platform,
    /// Raw handle as typed (`@Nike`, `u/spez`, `+1 555 0100 200`).
    pub handle: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "ContributorId::nil")]
    pub contributor_id: ContributorId,
}

impl Submission {
    pub fn new(platform: Platform, handle: impl Into<String>) -> Self {
        Self {
            platform,
            handle: handle.into(),
            name: None,
            contributor_id: ContributorId::nil(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_contributor(mut self, contributor_id: ContributorId) -> Self {
        self.contributor_id = contributor_id;
        self
    }
}
