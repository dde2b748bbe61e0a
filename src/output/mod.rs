//! Output module for persisting crawl results
//!
//! This module handles:
//! - The per-URL `CrawlRecord` and the finished `CrawlRun`
//! - The `ResultSink` trait and its JSON, SQLite and markdown implementations
//! - Statistics over a set of records

mod json_output;
mod markdown;
mod record;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json_output::{load_results, JsonFileSink};
pub use markdown::{format_markdown_summary, MarkdownSummarySink};
pub use record::{iso_timestamp, CrawlRecord, CrawlRun};
pub use sqlite_output::SqliteSink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ResultSink};

use crate::config::OutputConfig;
use std::path::Path;

/// Builds the sinks named by the output configuration
///
/// The JSON results file is always present and always first.
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `config_hash` - Hash of the config file, stored with SQLite runs
pub fn build_sinks(
    config: &OutputConfig,
    config_hash: Option<&str>,
) -> OutputResult<Vec<Box<dyn ResultSink>>> {
    let mut sinks: Vec<Box<dyn ResultSink>> =
        vec![Box::new(JsonFileSink::new(&config.results_path))];

    if let Some(path) = &config.database_path {
        sinks.push(Box::new(SqliteSink::open(
            Path::new(path),
            config_hash.map(str::to_string),
        )?));
    }

    if let Some(path) = &config.summary_path {
        sinks.push(Box::new(MarkdownSummarySink::new(path)));
    }

    Ok(sinks)
}
