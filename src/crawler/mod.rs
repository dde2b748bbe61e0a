//! Crawler module for sitemap-driven page probing
//!
//! This module contains the core crawling logic, including:
//! - Run orchestration from sitemap to persisted results
//! - Fixed-interval pacing between probes and URLs

mod coordinator;
mod pacing;

pub use coordinator::{run_crawl, Coordinator};
pub use pacing::RateLimiter;
