use serde::Deserialize;

/// Default user agent sent by the sitemap fetcher and the browser
pub const DEFAULT_USER_AGENT: &str = "SitemapCrawler/1.0";

/// Default location of the JSON results file
pub const DEFAULT_RESULTS_PATH: &str = "./crawl-results.json";

/// Main configuration structure for Sitemap-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the sitemap lives and how it is fetched
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// URL of the sitemap or sitemap index
    #[serde(default)]
    pub url: String,

    /// Timeout for each sitemap request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Base user agent; the mobile profile appends its own suffix
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on navigation plus network-idle wait (seconds)
    #[serde(rename = "navigation-timeout-secs", default = "default_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Run Chromium without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Pass --no-sandbox to Chromium (needed in most containers)
    #[serde(rename = "no-sandbox", default = "default_true")]
    pub no_sandbox: bool,

    /// Explicit Chromium binary; auto-detected when absent
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            navigation_timeout_secs: default_timeout_secs(),
            headless: true,
            no_sandbox: true,
            chrome_executable: None,
        }
    }
}

/// Fixed delays between network-facing operations
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Pause after each successful page load before the context is released (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_ms")]
    pub settle_delay_ms: u64,

    /// Pause after each URL before the next one is probed (milliseconds)
    #[serde(rename = "between-urls-delay-ms", default = "default_between_urls_ms")]
    pub between_urls_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_ms(),
            between_urls_delay_ms: default_between_urls_ms(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON results file
    #[serde(rename = "results-path", default = "default_results_path")]
    pub results_path: String,

    /// Optional SQLite database receiving a copy of the run
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Optional markdown report
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            database_path: None,
            summary_path: None,
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_results_path() -> String {
    DEFAULT_RESULTS_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_between_urls_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
