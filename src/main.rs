//! Sitemap-Sweep main entry point
//!
//! This is the command-line interface for the Sitemap-Sweep render checker.

use clap::Parser;
use sitemap_sweep::config::{self, Config};
use sitemap_sweep::crawler::run_crawl;
use sitemap_sweep::output::{load_results, print_statistics, CrawlStatistics};
use sitemap_sweep::sitemap::SitemapResolver;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Sweep: render-checks every page listed in a sitemap
///
/// Sitemap-Sweep resolves a sitemap, loads each page in headless Chromium
/// under a desktop and a mobile profile, and writes one JSON record per page.
/// Failing pages are recorded; only a broken sitemap or browser stops the run.
#[derive(Parser, Debug)]
#[command(name = "sitemap-sweep")]
#[command(version = "1.0.0")]
#[command(about = "Render-checks every page listed in a sitemap", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sitemap URL to crawl (overrides the config file)
    #[arg(long, env = "SITEMAP_URL", value_name = "URL")]
    sitemap_url: Option<String>,

    /// Base user agent for sitemap requests and page probes
    #[arg(long, env = "USER_AGENT")]
    user_agent: Option<String>,

    /// Path of the JSON results file
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Also store the run in this SQLite database
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Also write a markdown report to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resolve the sitemap and list the URLs without launching a browser
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print statistics for an existing results file and exit
    #[arg(long, value_name = "RESULTS", conflicts_with = "dry_run")]
    stats: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.stats {
        return handle_stats(path);
    }

    let (config, config_hash) = match build_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config).await
    } else {
        handle_crawl(&config, config_hash.as_deref()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_sweep=info,warn"),
            1 => EnvFilter::new("sitemap_sweep=debug,info"),
            2 => EnvFilter::new("sitemap_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and validates
fn build_config(cli: &Cli) -> Result<(Config, Option<String>), sitemap_sweep::ConfigError> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = config::load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(url) = &cli.sitemap_url {
        config.sitemap.url = url.clone();
    }
    if let Some(user_agent) = &cli.user_agent {
        config.browser.user_agent = user_agent.clone();
    }
    if let Some(output) = &cli.output {
        config.output.results_path = output.clone();
    }
    if let Some(database) = &cli.database {
        config.output.database_path = Some(database.clone());
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.clone());
    }
    if cli.headed {
        config.browser.headless = false;
    }

    config::validate(&config)?;
    Ok((config, hash))
}

/// Handles the --dry-run mode: resolves the sitemap and lists what would be probed
async fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sitemap-Sweep Dry Run ===\n");

    println!("Sitemap: {}", config.sitemap.url);
    println!("User agent: {}", config.browser.user_agent);
    println!(
        "Navigation timeout: {}s",
        config.browser.navigation_timeout_secs
    );
    println!(
        "Pacing: {}ms settle, {}ms between URLs",
        config.pacing.settle_delay_ms, config.pacing.between_urls_delay_ms
    );
    println!("Results: {}", config.output.results_path);
    if let Some(path) = &config.output.database_path {
        println!("Database: {}", path);
    }
    if let Some(path) = &config.output.summary_path {
        println!("Summary: {}", path);
    }

    let resolver = SitemapResolver::from_config(&config.sitemap, &config.browser.user_agent)?;
    let urls = resolver.resolve(&config.sitemap.url).await?;

    println!("\nURLs ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would probe {} URLs under desktop and mobile viewports",
        urls.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics for an existing results file
fn handle_stats(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Results: {}\n", path.display());

    let records = load_results(path)?;
    let stats = CrawlStatistics::from_records(&records);
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting crawl of {}", config.sitemap.url);

    match run_crawl(config, config_hash).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
