//! Output sinks
//!
//! The pipeline only needs something that accepts records one at a time;
//! what happens to them afterwards is the sink's business. Two backends are
//! provided: line-delimited JSON batches and a small relational schema.

mod jsonl;
mod sqlite;

pub use jsonl::JsonlSink;
pub use sqlite::SqliteSink;

use crate::model::Job;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Accepts the harvested record sequence
pub trait Sink {
    /// Persists one record.
    fn write(&mut self, job: &Job) -> SinkResult<()>;

    /// Flushes anything buffered; called once after the last record.
    fn finish(&mut self) -> SinkResult<()> {
        Ok(())
    }
}
