// Social Handle Directory - API Core
//
// HTTP surface and process wiring for the handle directory. The engine itself
// (parsing, normalization, deduplication, search) lives in `handle-directory`.

pub mod config;
pub mod server;
pub mod store;

pub use config::*;
