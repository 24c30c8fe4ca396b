//! Social Handle Directory
//!
//! Keeps a shared directory of social-media handles clean and searchable
//! while many contributors submit noisy input: the same brand under many
//! spellings, the same handle from many people, platforms that have to be
//! inferred from free text.
//!
//! # Usage
//!
//! ```rust,ignore
//! use handle_directory::{Directory, MemoryStore, Platform, Submission};
//!
//! let directory = Directory::new(MemoryStore::new());
//!
//! // "@Nike", "nike" and "NIKE" all land on one row
//! directory.upsert(Submission::new(Platform::Instagram, "@Nike").with_name("Nike Inc.")).await?;
//!
//! // Name or handle → grouped cross-platform identities
//! let results = directory.search("nike", 10).await?;
//!
//! // Partial handle → identity
//! let suggestions = directory.suggest_from_handle("@elonm").await?;
//! ```
//!
//! # Modules
//!
//! - [`patterns`] - Platform pattern library (URL / `@handle` / phone shapes)
//! - [`parser`] - Raw text and tables → candidate records
//! - [`normalize`] - Brand name canonicalization and alias table
//! - [`similarity`] / [`resolver`] - Name scoring and duplicate folding
//! - [`handles`] - Per-platform handle normalization and validation
//! - [`pipeline`] - Upsert, search and bulk import over a store
//! - [`query`] - Validated query surface
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`testing`] - Recording and failing stores for tests

pub mod error;
pub mod handles;
pub mod normalize;
pub mod parser;
pub mod patterns;
pub mod pipeline;
pub mod query;
pub mod resolver;
pub mod similarity;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DirectoryError, Result, StoreError, StoreResult};
pub use handles::{is_valid_handle, normalize_handle, validate_handle};
pub use normalize::{AliasTable, BrandNormalizer};
pub use parser::{HandleParser, InputFormat};
pub use patterns::{Detection, PatternLibrary, PlatformPatterns, Recognizer};
pub use pipeline::{Directory, ImportSummary, UpsertOutcome};
pub use query::{DirectoryQuery, QueryMode, QueryResponse, ValidatedQuery};
pub use resolver::DuplicateResolver;
pub use similarity::{similarity_normalized, SimilarityEngine};
pub use traits::store::{DirectoryStore, MatchMode, QueryField, QueryOrder, RecordQuery};
pub use types::{
    CandidateRecord, Confidence, ContributorId, DirectoryConfig, DirectoryRecord, NewRecord,
    ParseOutcome, Platform, RecordChanges, RecordId, SearchResult, SimilarityMatch, SkipReason,
    SkippedLine, Submission,
};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
