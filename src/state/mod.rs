//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunPhase`: Tracks the run as a whole (resolving, crawling, finalizing, ...)
//! - `UrlPhase`: Tracks one URL through its desktop and mobile probes

mod run_phase;
mod url_phase;

// Re-export main types
pub use run_phase::RunPhase;
pub use url_phase::UrlPhase;
