//! Directory pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Upsert (normalize → validate → resolve name → merge or create)
//! - Bidirectional search (substring/prefix queries, grouping, ranking)
//! - Bulk import (parse → upsert each → summary)

pub mod directory;
pub mod import;
pub mod locks;
pub mod search;
pub mod upsert;

pub use directory::Directory;
pub use import::ImportSummary;
pub use locks::KeyedLocks;
pub use search::{group_records, MAX_HANDLE_SUGGESTIONS, MIN_QUERY_CHARS};
pub use upsert::UpsertOutcome;
