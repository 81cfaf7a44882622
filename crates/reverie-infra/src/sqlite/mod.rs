//! SQLite-backed persistence.

pub mod pool;
pub mod transcript;

pub use pool::DatabasePool;
pub use transcript::SqliteTranscriptStore;
