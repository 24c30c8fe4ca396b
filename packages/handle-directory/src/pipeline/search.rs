//! Read path: bidirectional search over grouped, cross-platform identities.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::normalize::BrandNormalizer;
use crate::traits::store::{DirectoryStore, QueryField, QueryOrder, RecordQuery};
use crate::types::{DirectoryRecord, Platform, SearchResult};

use super::directory::Directory;

/// Queries shorter than this (after stripping `@`) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum results from [`Directory::suggest_from_handle`].
pub const MAX_HANDLE_SUGGESTIONS: usize = 5;

/// Trim and drop one leading `@`; returns the cleaned text and whether `@`
/// was present.
fn clean_query(query: &str) -> (&str, bool) {
    let trimmed = query.trim();
    match trimmed.strip_prefix('@') {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    }
}

/// Display name and comparison key for the identity a row belongs to.
fn identity(normalizer: &BrandNormalizer, record: &DirectoryRecord) -> (String, String) {
    let name = record
        .canonical_name
        .as_deref()
        .map(|n| normalizer.normalize(n))
        .filter(|n| !n.is_empty())
        .or_else(|| {
            normalizer
                .extract_from_handle(&record.handle)
                .map(|n| normalizer.normalize(&n))
                .filter(|n| !n.is_empty())
        })
        .unwrap_or_else(|| record.handle.clone());
    let key = name.to_lowercase();
    (name, key)
}

/// Fold rows sharing a canonical identity into one result, keeping the
/// order in which identities were first seen.
///
/// `verified` is true when any contributing row is verified.
pub fn group_records(normalizer: &BrandNormalizer, records: &[DirectoryRecord]) -> Vec<SearchResult> {
    let mut groups: IndexMap<String, SearchResult> = IndexMap::new();
    for record in records {
        let (name, key) = identity(normalizer, record);
        let group = groups.entry(key).or_insert_with(|| SearchResult {
            representative_record_id: record.id,
            canonical_name: name,
            verified: false,
            usage_count: 0,
            platforms: BTreeSet::new(),
            handles_by_platform: BTreeMap::new(),
        });
        group.verified |= record.verified;
        group.platforms.insert(record.platform);
        group
            .handles_by_platform
            .entry(record.platform)
            .or_insert_with(|| record.handle.clone());
        group.usage_count = group.platforms.len();
    }
    groups.into_values().collect()
}

impl<S: DirectoryStore> Directory<S> {
    /// Search names and handles for `query`, grouped by identity.
    ///
    /// Ranked by exact (case-insensitive) name match, then verified, then
    /// the number of platforms. A leading `@` only switches the raw rows to
    /// handle order; matching is the same either way.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let (cleaned, had_at) = clean_query(query);
        if cleaned.chars().count() < MIN_QUERY_CHARS || limit == 0 {
            return Ok(Vec::new());
        }

        let order = if had_at {
            QueryOrder::HandleAsc
        } else {
            QueryOrder::VerifiedFirst
        };
        let rows = self
            .store
            .query(
                &RecordQuery::new([QueryField::CanonicalName, QueryField::Handle], cleaned)
                    .order_by(order)
                    .limit(limit.saturating_mul(2)),
            )
            .await?;

        let needle = cleaned.to_lowercase();
        let mut results = group_records(&self.normalizer, &rows);
        results.sort_by(|a, b| {
            let a_exact = a.canonical_name.to_lowercase() == needle;
            let b_exact = b.canonical_name.to_lowercase() == needle;
            b_exact
                .cmp(&a_exact)
                .then(b.verified.cmp(&a.verified))
                .then(b.usage_count.cmp(&a.usage_count))
        });
        results.truncate(limit);
        debug!(rows = rows.len(), results = results.len(), "Search complete");
        Ok(results)
    }

    /// Identities whose handles start with `partial` ("@elonm" → Elon Musk).
    ///
    /// Ranked by verified, then the number of platforms; at most
    /// [`MAX_HANDLE_SUGGESTIONS`].
    #[instrument(skip(self))]
    pub async fn suggest_from_handle(&self, partial: &str) -> Result<Vec<SearchResult>> {
        let (cleaned, _) = clean_query(partial);
        if cleaned.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let rows = self
            .store
            .query(
                &RecordQuery::new([QueryField::Handle], cleaned)
                    .prefix()
                    .order_by(QueryOrder::VerifiedFirst)
                    .limit(self.config.suggest_fetch_limit),
            )
            .await?;

        let mut results = group_records(&self.normalizer, &rows);
        results.sort_by(|a, b| {
            b.verified
                .cmp(&a.verified)
                .then(b.platforms.len().cmp(&a.platforms.len()))
        });
        results.truncate(MAX_HANDLE_SUGGESTIONS);
        Ok(results)
    }

    /// One handle per platform for rows whose name contains `name`,
    /// preferring verified rows.
    #[instrument(skip(self))]
    pub async fn handles_for_brand(&self, name: &str) -> Result<BTreeMap<Platform, String>> {
        let cleaned = name.trim();
        if cleaned.chars().count() < MIN_QUERY_CHARS {
            return Ok(BTreeMap::new());
        }

        let rows = self
            .store
            .query(
                &RecordQuery::new([QueryField::CanonicalName], cleaned)
                    .order_by(QueryOrder::VerifiedFirst)
                    .limit(self.config.brand_fetch_limit),
            )
            .await?;

        let mut handles: BTreeMap<Platform, String> = BTreeMap::new();
        // rows arrive verified-first, so the first row per platform wins
        for row in rows {
            handles.entry(row.platform).or_insert(row.handle);
        }
        Ok(handles)
    }

    /// Known canonical names for an autocomplete box.
    pub async fn suggest_names(&self, partial: &str) -> Result<Vec<String>> {
        let known = self.store.distinct_canonical_names().await?;
        Ok(self.resolver.suggest_canonical(partial, &known))
    }
}
