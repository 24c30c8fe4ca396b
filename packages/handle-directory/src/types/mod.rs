pub mod candidate;
pub mod config;
pub mod id;
pub mod platform;
pub mod record;
pub mod search;

pub use candidate::{CandidateRecord, ParseOutcome, SkipReason, SkippedLine};
pub use config::DirectoryConfig;
pub use id::{Contributor, ContributorId, DirectoryEntry, Id, RecordId};
pub use platform::{Confidence, Platform};
pub use record::{DirectoryRecord, NewRecord, RecordChanges, Submission};
pub use search::{SearchResult, SimilarityMatch};
