//! Sitemap-Sweep: render-checks every page a site publishes in its sitemap
//!
//! This crate resolves a sitemap (following one level of sitemap-index indirection),
//! loads each listed page in headless Chromium under a desktop and a mobile profile,
//! and writes one result record per page.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;

use thiserror::Error;

/// Main error type for Sitemap-Sweep operations
///
/// Every variant is fatal for a run. Failures of individual page visits never
/// surface here; they are recorded in the run output instead.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching or parsing a sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed sitemap XML at {url}: {message}")]
    Parse { url: String, message: String },
}

/// Errors raised by the browser engine
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browsing context error: {0}")]
    Context(String),

    #[error("Navigation timeout of {0} ms exceeded")]
    Timeout(u64),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("navigation produced no response")]
    NoResponse,
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Navigation(err.to_string())
    }
}

/// Result type alias for Sitemap-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

// Re-export commonly used types
pub use browser::{PageProbe, ProbeOutcome, ViewportKind, ViewportProfile};
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, RateLimiter};
pub use output::{CrawlRecord, CrawlRun, ResultSink};
pub use sitemap::{SitemapDocument, SitemapResolver};
pub use state::{RunPhase, UrlPhase};
