//! Sitemap fetching and resolution
//!
//! Turns a sitemap URL into the flat, ordered list of page URLs to probe.
//! A sitemap index is followed one level deep, and only through its first
//! entry; the remaining sub-sitemaps are never fetched.

use crate::config::SitemapConfig;
use crate::sitemap::parser::{parse_sitemap, SitemapDocument};
use crate::{SitemapError, SitemapResult};
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for sitemap requests
///
/// # Arguments
///
/// * `user_agent` - The user agent string to send
/// * `timeout` - Per-request timeout
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Resolves sitemap URLs into page URLs
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    /// Creates a resolver around an existing HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a resolver from configuration
    pub fn from_config(config: &SitemapConfig, user_agent: &str) -> SitemapResult<Self> {
        let client = build_http_client(user_agent, Duration::from_secs(config.request_timeout_secs))
            .map_err(|source| SitemapError::Http {
                url: config.url.clone(),
                source,
            })?;
        Ok(Self::new(client))
    }

    /// Resolves a sitemap into an ordered list of page URLs
    ///
    /// | Document at `sitemap_url` | Result |
    /// |---------------------------|--------|
    /// | `urlset` | its `loc` values, in order |
    /// | `sitemapindex` | the `urlset` of the **first** sub-sitemap only |
    /// | `sitemapindex` inside a sitemap index | empty |
    /// | `sitemapindex` whose first entry has no `loc` | parse error |
    /// | anything else | empty |
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Page URLs (duplicates preserved)
    /// * `Err(SitemapError)` - A fetch failed, returned non-2xx, or was malformed
    pub async fn resolve(&self, sitemap_url: &str) -> SitemapResult<Vec<String>> {
        tracing::info!("Fetching sitemap: {}", sitemap_url);

        match self.fetch_document(sitemap_url).await? {
            SitemapDocument::UrlSet(urls) => Ok(urls),
            SitemapDocument::SitemapIndex(sitemaps) => {
                let first = match sitemaps.first() {
                    Some(Some(first)) => first,
                    Some(None) => {
                        return Err(SitemapError::Parse {
                            url: sitemap_url.to_string(),
                            message: "first sitemap entry has no loc".to_string(),
                        })
                    }
                    None => {
                        tracing::warn!("Sitemap index {} lists no sitemaps", sitemap_url);
                        return Ok(Vec::new());
                    }
                };

                tracing::info!("Detected sitemap index, using first sitemap...");
                if sitemaps.len() > 1 {
                    tracing::warn!(
                        "Sitemap index lists {} sitemaps; {} will not be crawled",
                        sitemaps.len(),
                        sitemaps.len() - 1
                    );
                }

                tracing::info!("Fetching sub-sitemap: {}", first);
                match self.fetch_document(first).await? {
                    SitemapDocument::UrlSet(urls) => Ok(urls),
                    SitemapDocument::SitemapIndex(_) => {
                        tracing::warn!(
                            "Sub-sitemap {} is itself a sitemap index; nested indexes are not followed",
                            first
                        );
                        Ok(Vec::new())
                    }
                    SitemapDocument::Unrecognized => {
                        tracing::warn!("Sub-sitemap {} is not a urlset", first);
                        Ok(Vec::new())
                    }
                }
            }
            SitemapDocument::Unrecognized => {
                tracing::warn!(
                    "{} is neither a urlset nor a sitemap index; nothing to crawl",
                    sitemap_url
                );
                Ok(Vec::new())
            }
        }
    }

    /// Fetches and parses a single sitemap document
    pub async fn fetch_document(&self, url: &str) -> SitemapResult<SitemapDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SitemapError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| SitemapError::Http {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Parsing sitemap XML ({} bytes) from {}", body.len(), url);
        parse_sitemap(&body).map_err(|message| SitemapError::Parse {
            url: url.to_string(),
            message,
        })
    }
}
