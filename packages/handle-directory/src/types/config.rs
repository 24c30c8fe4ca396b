//! Configuration for the directory engine.

use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// Tunables for resolution, search and the query surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Minimum similarity for a new name to fold into an existing one.
    ///
    /// Default: 0.8.
    pub match_threshold: f64,

    /// Similarity floor for autocomplete suggestions (strictly greater than).
    ///
    /// Default: 0.6.
    pub suggest_threshold: f64,

    /// Results returned when the caller gives no limit. Default: 10.
    pub default_limit: usize,

    /// Largest limit the query surface accepts. Default: 100.
    pub max_limit: usize,

    /// Raw rows fetched for handle-prefix suggestions before grouping.
    ///
    /// Default: 50.
    pub suggest_fetch_limit: usize,

    /// Raw rows fetched for brand → handles lookups. Default: 200.
    pub brand_fetch_limit: usize,

    /// Detection priority for ambiguous input such as a bare `@name`.
    ///
    /// Platforms missing from the list are appended in declaration order.
    /// Default: declaration order of [`Platform`].
    pub platform_priority: Vec<Platform>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.8,
            suggest_threshold: 0.6,
            default_limit: 10,
            max_limit: 100,
            suggest_fetch_limit: 50,
            brand_fetch_limit: 200,
            platform_priority: Platform::ALL.to_vec(),
        }
    }
}

impl DirectoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_suggest_threshold(mut self, threshold: f64) -> Self {
        self.suggest_threshold = threshold;
        self
    }

    pub fn with_platform_priority(mut self, priority: impl IntoIterator<Item = Platform>) -> Self {
        self.platform_priority = priority.into_iter().collect();
        self
    }

    pub fn with_limits(mut self, default_limit: usize, max_limit: usize) -> Self {
        self.default_limit = default_limit;
        self.max_limit = max_limit;
        self
    }
}
