//! Name similarity scoring.
//!
//! Three metrics over normalized names, combined by taking the maximum:
//! edit distance, word-set Jaccard and substring containment.

use std::collections::HashSet;

use crate::normalize::BrandNormalizer;

/// Score awarded when one normalized name contains the other.
pub const CONTAINMENT_SCORE: f64 = 0.8;

/// Scores pairs of names in `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    normalizer: BrandNormalizer,
}

impl SimilarityEngine {
    pub fn new(normalizer: BrandNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &BrandNormalizer {
        &self.normalizer
    }

    /// Symmetric similarity of two raw names.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = self.normalizer.normalize(a);
        let b = self.normalizer.normalize(b);
        similarity_normalized(&a, &b)
    }
}

/// Similarity of two already-normalized names.
///
/// Comparison is case-insensitive so alias canonicals such as `McDonald's`
/// line up with title-cased spellings.
pub fn similarity_normalized(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let score = edit_score(&a, &b)
        .max(jaccard(&a, &b))
        .max(containment(&a, &b));
    score.clamp(0.0, 1.0)
}

fn edit_score(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f64 / max_len as f64
}

fn jaccard(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

fn containment(a: &str, b: &str) -> f64 {
    if a.contains(b) || b.contains(a) {
        CONTAINMENT_SCORE
    } else {
        0.0
    }
}
