// Shared data types for the linkstash engine.

pub mod bookmark;
pub mod errors;
pub mod import;
pub mod query;
