//! The query surface: validate raw request parameters, then dispatch.
//!
//! Validation happens before any store access, so a rejected request never
//! touches the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DirectoryError, Result};
use crate::pipeline::{Directory, MIN_QUERY_CHARS};
use crate::traits::store::DirectoryStore;
use crate::types::{DirectoryConfig, Platform, SearchResult};

/// Which read path a query takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Names and handles by substring
    #[default]
    Search,
    /// Handle prefix → identity
    Suggest,
    /// Name → one handle per platform
    Brand,
}

impl std::str::FromStr for QueryMode {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(QueryMode::Search),
            "suggest" => Ok(QueryMode::Suggest),
            "brand" => Ok(QueryMode::Brand),
            other => Err(DirectoryError::validation(format!(
                "mode must be one of search, suggest, brand (got {:?})",
                other
            ))),
        }
    }
}

/// Raw, unvalidated query parameters as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryQuery {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub mode: Option<QueryMode>,
    pub brand: Option<String>,
}

impl DirectoryQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Check bounds against `config`.
    pub fn validate(&self, config: &DirectoryConfig) -> Result<ValidatedQuery> {
        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| DirectoryError::validation("query is required"))?;
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(DirectoryError::validation(format!(
                "query must be at least {} characters",
                MIN_QUERY_CHARS
            )));
        }

        let limit = self.limit.unwrap_or(config.default_limit);
        if !(1..=config.max_limit).contains(&limit) {
            return Err(DirectoryError::validation(format!(
                "limit must be between 1 and {}",
                config.max_limit
            )));
        }

        let brand = match self.brand.as_deref().map(str::trim) {
            Some(brand) if brand.chars().count() < MIN_QUERY_CHARS => {
                return Err(DirectoryError::validation(format!(
                    "brand must be at least {} characters",
                    MIN_QUERY_CHARS
                )));
            }
            Some(brand) => Some(brand.to_string()),
            None => None,
        };

        Ok(ValidatedQuery {
            query: query.to_string(),
            limit,
            mode: self.mode.unwrap_or_default(),
            brand,
        })
    }
}

/// Query parameters that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub query: String,
    pub limit: usize,
    pub mode: QueryMode,
    pub brand: Option<String>,
}

/// Response for each [`QueryMode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum QueryResponse {
    Search {
        results: Vec<SearchResult>,
    },
    Suggest {
        results: Vec<SearchResult>,
    },
    Brand {
        brand: String,
        handles: BTreeMap<Platform, String>,
    },
}

impl<S: DirectoryStore> Directory<S> {
    /// Validate `params` and run the selected read path.
    pub async fn query(&self, params: &DirectoryQuery) -> Result<QueryResponse> {
        let validated = params.validate(self.config())?;
        debug!(mode = ?validated.mode, limit = validated.limit, "Directory query");

        match validated.mode {
            QueryMode::Search => Ok(QueryResponse::Search {
                results: self.search(&validated.query, validated.limit).await?,
            }),
            QueryMode::Suggest => {
                let mut results = self.suggest_from_handle(&validated.query).await?;
                results.truncate(validated.limit);
                Ok(QueryResponse::Suggest { results })
            }
            QueryMode::Brand => {
                let brand = validated.brand.unwrap_or(validated.query);
                let handles = self.handles_for_brand(&brand).await?;
                Ok(QueryResponse::Brand { brand, handles })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::{RecordingStore, StoreCall};
    use crate::types::Submission;

    fn config() -> DirectoryConfig {
        DirectoryConfig::default()
    }

    #[test]
    fn query_length_boundaries() {
        assert!(DirectoryQuery::default().validate(&config()).is_err());
        assert!(DirectoryQuery::new("").validate(&config()).is_err());
        assert!(DirectoryQuery::new("a").validate(&config()).is_err());
        assert!(DirectoryQuery::new("  a  ").validate(&config()).is_err());
        assert!(DirectoryQuery::new("ab").validate(&config()).is_ok());
    }

    #[test]
    fn limit_boundaries() {
        let q = || DirectoryQuery::new("nike");
        assert!(q().with_limit(0).validate(&config()).is_err());
        assert!(q().with_limit(101).validate(&config()).is_err());
        assert_eq!(q().with_limit(1).validate(&config()).unwrap().limit, 1);
        assert_eq!(q().with_limit(100).validate(&config()).unwrap().limit, 100);
        assert_eq!(q().validate(&config()).unwrap().limit, 10);
    }

    #[test]
    fn mode_defaults_and_parsing() {
        let v = DirectoryQuery::new("nike").validate(&config()).unwrap();
        assert_eq!(v.mode, QueryMode::Search);
        assert_eq!("Brand".parse::<QueryMode>().unwrap(), QueryMode::Brand);
        assert!(matches!(
            "fuzzy".parse::<QueryMode>(),
            Err(DirectoryError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let store = RecordingStore::new(MemoryStore::new());
        let directory = Directory::new(store);

        for params in [
            DirectoryQuery::new(""),
            DirectoryQuery::new("a"),
            DirectoryQuery::new("nike").with_limit(0),
            DirectoryQuery::new("nike").with_limit(101),
            DirectoryQuery::new("nike").with_mode(QueryMode::Brand).with_brand("x"),
        ] {
            let err = directory.query(&params).await.unwrap_err();
            assert!(matches!(err, DirectoryError::Validation { .. }));
        }
        assert!(directory.store().calls().is_empty());

        directory
            .query(&DirectoryQuery::new("nike").with_limit(100))
            .await
            .unwrap();
        assert!(matches!(directory.store().calls()[0], StoreCall::Query { limit: 200, .. }));
    }

    #[tokio::test]
    async fn dispatches_by_mode() {
        let directory = Directory::new(MemoryStore::new());
        directory
            .upsert(Submission::new(Platform::Instagram, "nike").with_name("Nike"))
            .await
            .unwrap();

        let search = directory.query(&DirectoryQuery::new("nike")).await.unwrap();
        assert!(matches!(search, QueryResponse::Search { ref results } if results.len() == 1));

        let suggest = directory
            .query(&DirectoryQuery::new("@ni").with_mode(QueryMode::Suggest))
            .await
            .unwrap();
        assert!(matches!(suggest, QueryResponse::Suggest { ref results } if results.len() == 1));

        let brand = directory
            .query(
                &DirectoryQuery::new("ignored")
                    .with_mode(QueryMode::Brand)
                    .with_brand("Nike"),
            )
            .await
            .unwrap();
        match brand {
            QueryResponse::Brand { brand, handles } => {
                assert_eq!(brand, "Nike");
                assert_eq!(handles[&Platform::Instagram], "nike");
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn response_is_tagged_by_mode() {
        let json = serde_json::to_value(QueryResponse::Search { results: vec![] }).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "search", "results": []}));
    }
}
