//! Markdown report generation
//!
//! Produces a human-readable report of a run: run information, overall
//! statistics, status code breakdown and a table of failed URLs.

use crate::output::json_output::write_atomic;
use crate::output::record::{iso_timestamp, CrawlRun};
use crate::output::stats::CrawlStatistics;
use crate::output::traits::{OutputResult, ResultSink};
use std::path::PathBuf;

/// Result sink writing a markdown report
#[derive(Debug, Clone)]
pub struct MarkdownSummarySink {
    path: PathBuf,
}

impl MarkdownSummarySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for MarkdownSummarySink {
    fn name(&self) -> String {
        format!("markdown:{}", self.path.display())
    }

    fn persist(&mut self, run: &CrawlRun) -> OutputResult<()> {
        let markdown = format_markdown_summary(run);
        write_atomic(&self.path, markdown.as_bytes())
    }
}

/// Formats a crawl run as markdown
pub fn format_markdown_summary(run: &CrawlRun) -> String {
    let stats = CrawlStatistics::from_records(&run.records);
    let mut md = String::new();

    md.push_str("# Sitemap Sweep Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Sitemap**: {}\n", run.sitemap_url));
    md.push_str(&format!("- **Started**: {}\n", iso_timestamp(run.started_at)));
    md.push_str(&format!("- **Finished**: {}\n", iso_timestamp(run.finished_at)));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n\n",
        run.duration_seconds()
    ));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **URLs Probed**: {}\n", stats.total_urls));
    md.push_str(&format!("- **Succeeded**: {}\n", stats.succeeded));
    md.push_str(&format!("- **Failed**: {}\n", stats.failed()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        stats.success_rate()
    ));
    md.push_str(&format!(
        "- **Mean Duration per URL**: {:.2}s\n",
        stats.mean_duration_seconds()
    ));
    md.push_str(&format!(
        "- **HTTP Error Responses**: {}\n\n",
        stats.http_error_responses()
    ));

    if run.is_empty() {
        md.push_str("_The sitemap resolved to no URLs._\n");
        return md;
    }

    // Status codes
    md.push_str("## Status Codes\n\n");
    md.push_str("| Status | Desktop | Mobile |\n");
    md.push_str("|--------|---------|--------|\n");
    let mut statuses: Vec<u16> = stats
        .desktop_statuses
        .keys()
        .chain(stats.mobile_statuses.keys())
        .copied()
        .collect();
    statuses.sort_unstable();
    statuses.dedup();
    for status in statuses {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            status,
            stats.desktop_statuses.get(&status).unwrap_or(&0),
            stats.mobile_statuses.get(&status).unwrap_or(&0)
        ));
    }
    md.push('\n');

    // Failures
    let failures: Vec<_> = run.records.iter().filter(|r| !r.success).collect();
    md.push_str("## Failed URLs\n\n");
    if failures.is_empty() {
        md.push_str("_None._\n");
    } else {
        md.push_str("| URL | Viewport | Error |\n");
        md.push_str("|-----|----------|-------|\n");
        for record in failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                record.url,
                record
                    .failed_viewport
                    .map(|v| v.as_str())
                    .unwrap_or("-"),
                escape_cell(record.error_message.as_deref().unwrap_or(""))
            ));
        }
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
