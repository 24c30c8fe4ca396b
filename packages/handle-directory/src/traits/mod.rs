//! Trait seams between the engine and its collaborators.

pub mod store;

pub use store::{DirectoryStore, MatchMode, QueryField, QueryOrder, RecordQuery};
