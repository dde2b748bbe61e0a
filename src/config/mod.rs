//! Configuration module for Sitemap-Sweep
//!
//! Configuration comes from an optional TOML file, with command-line flags and
//! environment variables layered on top. Every key has a default except the
//! sitemap URL.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Sitemap: {}", config.sitemap.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, OutputConfig, PacingConfig, SitemapConfig, DEFAULT_RESULTS_PATH,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
