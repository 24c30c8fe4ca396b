use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::id::RecordId;
use super::platform::Platform;

/// One candidate produced by the duplicate resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// Normalized form of the existing name this match collapses onto.
    pub canonical_name: String,
    pub score: f64,
    /// Every name that triggered this match, in the order seen.
    pub matched_variations: Vec<String>,
}

/// A grouped, cross-platform view over one or more stored rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub representative_record_id: RecordId,
    pub canonical_name: String,
    /// True if any contributing row is verified.
    pub verified: bool,
    /// Number of distinct platforms folded into this result.
    pub usage_count: usize,
    pub platforms: BTreeSet<Platform>,
    pub handles_by_platform: BTreeMap<Platform, String>,
}
