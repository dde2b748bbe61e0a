//! Sitemap module for discovering the pages to probe
//!
//! This module contains:
//! - XML parsing of `urlset` and `sitemapindex` documents
//! - HTTP fetching and one-level sitemap-index resolution

mod parser;
mod resolver;

pub use parser::{parse_sitemap, SitemapDocument};
pub use resolver::{build_http_client, SitemapResolver};
