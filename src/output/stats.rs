//! Statistics over crawl records
//!
//! Used for the end-of-run summary, the markdown report and `--stats`.

use crate::browser::ViewportKind;
use crate::output::record::CrawlRecord;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Number of records (one per resolved URL)
    pub total_urls: u64,

    /// URLs where both probes succeeded
    pub succeeded: u64,

    /// URLs whose desktop probe failed
    pub desktop_failures: u64,

    /// URLs whose mobile probe failed after a successful desktop probe
    pub mobile_failures: u64,

    /// Failure records without a recorded viewport
    pub other_failures: u64,

    /// Desktop status code -> count
    pub desktop_statuses: BTreeMap<u16, u64>,

    /// Mobile status code -> count
    pub mobile_statuses: BTreeMap<u16, u64>,

    /// Sum of per-URL durations in seconds
    pub total_duration_seconds: f64,
}

impl CrawlStatistics {
    /// Computes statistics from a list of records
    pub fn from_records(records: &[CrawlRecord]) -> Self {
        let mut stats = Self::default();

        for record in records {
            stats.total_urls += 1;
            stats.total_duration_seconds += record.duration_seconds;

            if let Some(status) = record.desktop_status {
                *stats.desktop_statuses.entry(status).or_insert(0) += 1;
            }
            if let Some(status) = record.mobile_status {
                *stats.mobile_statuses.entry(status).or_insert(0) += 1;
            }

            if record.success {
                stats.succeeded += 1;
            } else {
                match record.failed_viewport {
                    Some(ViewportKind::Desktop) => stats.desktop_failures += 1,
                    Some(ViewportKind::Mobile) => stats.mobile_failures += 1,
                    None => stats.other_failures += 1,
                }
            }
        }

        stats
    }

    /// Number of URLs with a failed probe
    pub fn failed(&self) -> u64 {
        self.total_urls - self.succeeded
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total_urls as f64) * 100.0
    }

    /// Mean per-URL duration in seconds
    pub fn mean_duration_seconds(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        self.total_duration_seconds / self.total_urls as f64
    }

    /// Number of probes that completed with a 4xx or 5xx status
    pub fn http_error_responses(&self) -> u64 {
        self.desktop_statuses
            .iter()
            .chain(self.mobile_statuses.iter())
            .filter(|(status, _)| **status >= 400)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs probed: {}", stats.total_urls);
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed());
    println!(
        "  Mean duration: {:.2}s (total {:.1}s)",
        stats.mean_duration_seconds(),
        stats.total_duration_seconds
    );
    println!();

    if stats.failed() > 0 {
        println!("Failures by Viewport:");
        println!("  desktop: {}", stats.desktop_failures);
        println!("  mobile: {}", stats.mobile_failures);
        if stats.other_failures > 0 {
            println!("  unknown: {}", stats.other_failures);
        }
        println!();
    }

    for (label, statuses) in [
        ("Desktop", &stats.desktop_statuses),
        ("Mobile", &stats.mobile_statuses),
    ] {
        if statuses.is_empty() {
            continue;
        }
        println!("{} Status Codes:", label);
        for (status, count) in statuses {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs rendered under both viewports)",
        stats.success_rate(),
        stats.succeeded,
        stats.total_urls
    );
}
