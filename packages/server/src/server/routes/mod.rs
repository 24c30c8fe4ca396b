// HTTP routes
pub mod directory;
pub mod health;

pub use directory::*;
pub use health::*;
