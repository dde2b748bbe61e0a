//! Result sink trait and output errors
//!
//! Every output format implements [`ResultSink`]. The crawler hands each
//! configured sink the finished run exactly once.

use crate::output::record::CrawlRun;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to write output to {path}: {message}")]
    Write { path: String, message: String },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Durable destination for a finished crawl run
///
/// Implementations write the whole run in one step; a failed write must not
/// leave a half-written artifact behind where the format allows it.
pub trait ResultSink {
    /// Short human-readable name used in log lines
    fn name(&self) -> String;

    /// Persists the complete run
    fn persist(&mut self, run: &CrawlRun) -> OutputResult<()>;
}
