//! Crawl result records
//!
//! A [`CrawlRecord`] is produced once per resolved URL and never changes
//! afterwards. A [`CrawlRun`] holds them in resolution order.

use crate::browser::ViewportKind;
use crate::state::UrlPhase;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of probing one URL under both viewports
///
/// Serialized with camelCase keys; absent values are omitted:
///
/// ```json
/// {"url": "...", "success": true, "desktopStatus": 200, "mobileStatus": 200,
///  "duration": 4.2, "timestamp": "2024-05-01T10:00:00.000Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRecord {
    pub url: String,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_status: Option<u16>,

    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Which probe failed, for failure records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_viewport: Option<ViewportKind>,

    /// Wall time across both probes and their settle delays
    #[serde(rename = "duration", default)]
    pub duration_seconds: f64,

    /// ISO-8601 UTC time at which the record was created
    pub timestamp: String,
}

impl CrawlRecord {
    /// Builds the record for a URL whose probe sequence has finished
    ///
    /// A phase that is still active is recorded as a failure.
    pub fn from_phase(url: &str, phase: UrlPhase, elapsed: Duration) -> Self {
        let mut record = Self {
            url: url.to_string(),
            success: false,
            desktop_status: None,
            mobile_status: None,
            error_message: None,
            failed_viewport: None,
            duration_seconds: round_millis(elapsed),
            timestamp: iso_timestamp(Utc::now()),
        };

        match phase {
            UrlPhase::Succeeded {
                desktop_status,
                mobile_status,
            } => {
                record.success = true;
                record.desktop_status = Some(desktop_status);
                record.mobile_status = Some(mobile_status);
            }
            UrlPhase::Failed {
                viewport,
                desktop_status,
                message,
            } => {
                record.desktop_status = desktop_status;
                record.failed_viewport = Some(viewport);
                record.error_message = Some(message);
            }
            UrlPhase::ProbingDesktop | UrlPhase::ProbingMobile { .. } => {
                record.error_message = Some("probe sequence did not complete".to_string());
            }
        }

        record
    }
}

/// Formats a timestamp the way JavaScript's `toISOString` does
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}

/// A finished crawl: one record per resolved URL, in resolution order
#[derive(Debug, Clone)]
pub struct CrawlRun {
    pub sitemap_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub records: Vec<CrawlRecord>,
}

impl CrawlRun {
    /// Number of records in the run
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the sitemap resolved to no URLs
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of URLs where both probes succeeded
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.success).count()
    }

    /// Number of URLs where a probe failed
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Wall time of the whole run in seconds
    pub fn duration_seconds(&self) -> f64 {
        let millis = (self.finished_at - self.started_at).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }
}
