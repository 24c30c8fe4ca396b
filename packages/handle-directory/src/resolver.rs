//! Duplicate resolution: fold new names into canonical names already on file.

use indexmap::IndexMap;

use crate::normalize::BrandNormalizer;
use crate::similarity::{similarity_normalized, SimilarityEngine};
use crate::types::SimilarityMatch;

/// Default minimum score for folding a name into an existing one.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Default similarity floor for autocomplete (strictly greater than).
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.6;

/// Maximum names returned by [`DuplicateResolver::suggest_canonical`].
pub const MAX_SUGGESTIONS: usize = 5;

/// Partial names shorter than this only match by substring.
const MIN_FUZZY_PARTIAL: usize = 3;

/// Ranks existing canonical names against a new or partial name.
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DuplicateResolver {
    engine: SimilarityEngine,
    suggest_threshold: f64,
}

impl Default for DuplicateResolver {
    fn default() -> Self {
        Self::new(SimilarityEngine::default())
    }
}

impl DuplicateResolver {
    pub fn new(engine: SimilarityEngine) -> Self {
        Self {
            engine,
            suggest_threshold: DEFAULT_SUGGEST_THRESHOLD,
        }
    }

    pub fn with_suggest_threshold(mut self, threshold: f64) -> Self {
        self.suggest_threshold = threshold;
        self
    }

    pub fn normalizer(&self) -> &BrandNormalizer {
        self.engine.normalizer()
    }

    /// Existing names scoring at least `threshold` against `new_name`,
    /// grouped by their normalized form and sorted by descending score.
    ///
    /// Each match lists the raw existing names that collapsed onto it,
    /// followed by `new_name` itself.
    pub fn find_candidates<S: AsRef<str>>(
        &self,
        new_name: &str,
        existing: &[S],
        threshold: f64,
    ) -> Vec<SimilarityMatch> {
        let normalizer = self.engine.normalizer();
        let new_normalized = normalizer.normalize(new_name);
        if new_normalized.is_empty() {
            return Vec::new();
        }

        let mut groups: IndexMap<String, SimilarityMatch> = IndexMap::new();
        for name in existing {
            let name = name.as_ref();
            let normalized = normalizer.normalize(name);
            if normalized.is_empty() {
                continue;
            }
            let score = similarity_normalized(&new_normalized, &normalized);
            if score < threshold {
                continue;
            }
            let entry = groups
                .entry(normalized.clone())
                .or_insert_with(|| SimilarityMatch {
                    canonical_name: normalized,
                    score,
                    matched_variations: Vec::new(),
                });
            entry.score = entry.score.max(score);
            entry.matched_variations.push(name.to_string());
        }

        let mut matches: Vec<SimilarityMatch> = groups
            .into_values()
            .map(|mut m| {
                m.matched_variations.push(new_name.to_string());
                m
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    }

    /// Top match's canonical name, if any clears `threshold`.
    pub fn best_match<S: AsRef<str>>(
        &self,
        new_name: &str,
        existing: &[S],
        threshold: f64,
    ) -> Option<String> {
        self.find_candidates(new_name, existing, threshold)
            .into_iter()
            .next()
            .map(|m| m.canonical_name)
    }

    /// Up to [`MAX_SUGGESTIONS`] known names for an autocomplete box.
    ///
    /// Prefix matches rank first, then substring matches, then names that
    /// only clear the fuzzy threshold (partials of three or more characters).
    pub fn suggest_canonical<S: AsRef<str>>(&self, partial: &str, known: &[S]) -> Vec<String> {
        let partial = partial.trim();
        if partial.is_empty() {
            return Vec::new();
        }
        let needle = partial.to_lowercase();
        let fuzzy = partial.chars().count() >= MIN_FUZZY_PARTIAL;

        let mut ranked: Vec<(u8, f64, &str)> = Vec::new();
        for name in known {
            let name = name.as_ref();
            if ranked.iter().any(|(_, _, seen)| *seen == name) {
                continue;
            }
            let lowered = name.to_lowercase();
            let score = self.engine.similarity(partial, name);
            let tier = if lowered.starts_with(&needle) {
                0
            } else if lowered.contains(&needle) {
                1
            } else if fuzzy && score > self.suggest_threshold {
                2
            } else {
                continue;
            };
            ranked.push((tier, score, name));
        }

        ranked.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.total_cmp(&a.1)));
        ranked
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, _, name)| name.to_string())
            .collect()
    }
}
