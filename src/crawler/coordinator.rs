//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the run state machine and the ordered list of
//! records. It drives:
//! - Sitemap resolution (once)
//! - The per-URL desktop then mobile probe sequence, strictly in order
//! - Pacing between URLs
//! - Handing the finished run to every result sink (once)
//!
//! The browser itself is not owned here. [`run_crawl`] launches it only once
//! the sitemap has produced at least one URL, and shuts it down after the loop.

use crate::browser::{BrowserEngine, ChromeProbe, PageProbe};
use crate::config::Config;
use crate::crawler::pacing::RateLimiter;
use crate::output::{build_sinks, CrawlRecord, CrawlRun, ResultSink};
use crate::sitemap::SitemapResolver;
use crate::state::{RunPhase, UrlPhase};
use crate::{Result, SweepError};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    phase: RunPhase,
    pacing: RateLimiter,
    sitemap_url: String,
    started_at: DateTime<Utc>,
    records: Vec<CrawlRecord>,
}

impl Coordinator {
    /// Creates a new coordinator in the `Init` phase
    pub fn new(pacing: RateLimiter) -> Self {
        Self {
            phase: RunPhase::Init,
            pacing,
            sitemap_url: String::new(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Current run phase
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Records produced so far, in resolution order
    pub fn records(&self) -> &[CrawlRecord] {
        &self.records
    }

    fn transition(&mut self, next: RunPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(SweepError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Run phase: {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Marks the run as aborted after a fatal error
    ///
    /// Records collected so far are discarded; an aborted run never reaches
    /// the sinks.
    pub fn abort(&mut self) {
        if self.phase.can_transition_to(RunPhase::Aborted) {
            tracing::error!("Aborting run during {}", self.phase);
            self.phase = RunPhase::Aborted;
            self.records.clear();
        }
    }

    /// Resolves the sitemap into the list of URLs to probe
    ///
    /// Moves to `Empty` or `Crawling` on success and to `Aborted` on failure.
    pub async fn resolve(
        &mut self,
        resolver: &SitemapResolver,
        sitemap_url: &str,
    ) -> Result<Vec<String>> {
        self.transition(RunPhase::ResolvingSitemap)?;
        self.sitemap_url = sitemap_url.to_string();
        self.started_at = Utc::now();

        let urls = match resolver.resolve(sitemap_url).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!("Failed to resolve sitemap: {}", e);
                self.abort();
                return Err(e.into());
            }
        };

        tracing::info!("Found {} URLs to crawl", urls.len());
        if urls.is_empty() {
            self.transition(RunPhase::Empty)?;
        } else {
            self.transition(RunPhase::Crawling)?;
        }

        Ok(urls)
    }

    /// Probes every URL in order, appending one record per URL
    ///
    /// Individual probe failures are recorded and never stop the loop. The
    /// between-URL delay follows every URL, including the last one.
    pub async fn crawl<P: PageProbe>(&mut self, probe: &P, urls: &[String]) -> Result<()> {
        if self.phase != RunPhase::Crawling {
            return Err(SweepError::InvalidTransition {
                from: self.phase,
                to: RunPhase::Crawling,
            });
        }

        let total = urls.len();
        self.records.reserve(total);

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("[{}/{}] Crawling: {}", index + 1, total, url);

            let record = visit_url(probe, url).await;
            self.records.push(record);

            self.pacing.between_urls().await;
        }

        Ok(())
    }

    /// Hands the finished run to every sink and completes the run
    ///
    /// Sinks are written in order; the first failing sink stops the run with
    /// an output error.
    pub fn finalize(&mut self, sinks: &mut [Box<dyn ResultSink>]) -> Result<CrawlRun> {
        self.transition(RunPhase::Finalizing)?;

        let run = CrawlRun {
            sitemap_url: self.sitemap_url.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            records: std::mem::take(&mut self.records),
        };

        for sink in sinks.iter_mut() {
            tracing::debug!("Persisting {} records to {}", run.len(), sink.name());
            sink.persist(&run)?;
        }

        self.transition(RunPhase::Done)?;
        Ok(run)
    }

    /// Runs resolution, the probe loop and finalization with a ready probe
    ///
    /// Useful when the probe does not depend on the resolved URLs.
    /// [`run_crawl`] uses the individual steps instead, so the browser is
    /// only launched when there is something to crawl.
    pub async fn run<P: PageProbe>(
        &mut self,
        resolver: &SitemapResolver,
        sitemap_url: &str,
        probe: &P,
        sinks: &mut [Box<dyn ResultSink>],
    ) -> Result<CrawlRun> {
        let urls = self.resolve(resolver, sitemap_url).await?;
        if self.phase == RunPhase::Crawling {
            self.crawl(probe, &urls).await?;
        }
        self.finalize(sinks)
    }
}

/// Runs the desktop/mobile probe sequence for one URL
async fn visit_url<P: PageProbe>(probe: &P, url: &str) -> CrawlRecord {
    let start = Instant::now();
    let mut phase = UrlPhase::start();

    while let Some(kind) = phase.pending_viewport() {
        let outcome = probe.visit(url, kind.profile()).await;
        match outcome.status() {
            Some(status) => tracing::info!("  {}: {}", kind, status),
            None => tracing::debug!("  {}: failed", kind),
        }
        phase = phase.advance(outcome);
    }

    if let UrlPhase::Failed {
        viewport, message, ..
    } = &phase
    {
        tracing::warn!("  Error crawling {} ({}): {}", url, viewport, message);
    }

    CrawlRecord::from_phase(url, phase, start.elapsed())
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire crawl process:
///
/// 1. Resolve the sitemap (fatal on failure, nothing written)
/// 2. Launch the browser if there is anything to crawl (fatal on failure)
/// 3. Probe every URL under desktop then mobile
/// 4. Shut the browser down
/// 5. Persist the run to the JSON file and any optional sinks
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the config file, if one was loaded
///
/// # Returns
///
/// * `Ok(CrawlRun)` - The persisted run
/// * `Err(SweepError)` - A fatal error; no results were written
///
/// # Example
///
/// ```no_run
/// use sitemap_sweep::config::Config;
/// use sitemap_sweep::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.sitemap.url = "https://example.com/sitemap.xml".to_string();
/// let run = run_crawl(&config, None).await?;
/// println!("{} / {} URLs rendered", run.succeeded(), run.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: Option<&str>) -> Result<CrawlRun> {
    let resolver = SitemapResolver::from_config(&config.sitemap, &config.browser.user_agent)?;
    let pacing = RateLimiter::from_config(&config.pacing);
    let mut coordinator = Coordinator::new(pacing);

    let urls = coordinator.resolve(&resolver, &config.sitemap.url).await?;

    if coordinator.phase() == RunPhase::Crawling {
        let engine = match BrowserEngine::launch(&config.browser).await {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!("Failed to launch browser: {}", e);
                coordinator.abort();
                return Err(e.into());
            }
        };

        let probe = ChromeProbe::new(
            &engine,
            Duration::from_secs(config.browser.navigation_timeout_secs),
            pacing,
        );
        let result = coordinator.crawl(&probe, &urls).await;
        drop(probe);
        engine.shutdown().await;
        result?;
    } else {
        tracing::info!("Sitemap contained no URLs; skipping browser launch");
    }

    let mut sinks = build_sinks(&config.output, config_hash)?;
    let run = coordinator.finalize(&mut sinks)?;

    tracing::info!(
        "Successfully crawled: {}/{} URLs",
        run.succeeded(),
        run.len()
    );
    tracing::info!("Results saved to {}", config.output.results_path);

    Ok(run)
}
