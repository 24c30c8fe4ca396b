//! The Directory - main entry point for the handle directory engine.
//!
//! Bundles a store with the immutable normalization tables and exposes the
//! write path ([`upsert`](Directory::upsert), bulk import) and the read path
//! (search, suggestions, brand lookup, the validated query surface).

use crate::normalize::{AliasTable, BrandNormalizer};
use crate::parser::HandleParser;
use crate::patterns::PatternLibrary;
use crate::resolver::DuplicateResolver;
use crate::similarity::SimilarityEngine;
use crate::traits::store::DirectoryStore;
use crate::types::DirectoryConfig;

use super::locks::KeyedLocks;

/// A directory over one store.
///
/// # Example
///
/// ```rust,ignore
/// let directory = Directory::new(MemoryStore::new());
///
/// directory.upsert(Submission::new(Platform::Instagram, "@Nike").with_name("Nike Inc.")).await?;
/// let results = directory.search("nike", 10).await?;
/// ```
pub struct Directory<S: DirectoryStore> {
    pub(super) store: S,
    pub(super) config: DirectoryConfig,
    pub(super) normalizer: BrandNormalizer,
    pub(super) resolver: DuplicateResolver,
    pub(super) parser: HandleParser,
    pub(super) locks: KeyedLocks,
}

impl<S: DirectoryStore> Directory<S> {
    /// Create with default configuration and tables.
    pub fn new(store: S) -> Self {
        Self::with_config(store, DirectoryConfig::default())
    }

    /// Create with custom configuration and the default tables.
    pub fn with_config(store: S, config: DirectoryConfig) -> Self {
        Self::with_tables(store, config, AliasTable::default_table(), PatternLibrary::default())
    }

    /// Create with explicit alias and pattern tables.
    ///
    /// The pattern library is reordered by `config.platform_priority`.
    pub fn with_tables(
        store: S,
        config: DirectoryConfig,
        aliases: AliasTable,
        patterns: PatternLibrary,
    ) -> Self {
        let normalizer = BrandNormalizer::new(aliases);
        let resolver = DuplicateResolver::new(SimilarityEngine::new(normalizer.clone()))
            .with_suggest_threshold(config.suggest_threshold);
        let parser = HandleParser::new(patterns.reordered(&config.platform_priority));
        Self {
            store,
            config,
            normalizer,
            resolver,
            parser,
            locks: KeyedLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &BrandNormalizer {
        &self.normalizer
    }

    pub fn resolver(&self) -> &DuplicateResolver {
        &self.resolver
    }

    pub fn parser(&self) -> &HandleParser {
        &self.parser
    }
}
