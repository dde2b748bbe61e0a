//! The page probe seam
//!
//! The orchestrator only sees [`PageProbe`]; the Chromium-backed
//! implementation lives in `chrome_probe`, and tests substitute scripted ones.

use crate::browser::viewport::ViewportProfile;

/// Result of a single page visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The page loaded; `status` is the top-level navigation response code.
    /// 4xx and 5xx responses land here too.
    Success { status: u16 },

    /// Navigation failed (timeout, DNS, refused connection, renderer crash)
    Failure { message: String },
}

impl ProbeOutcome {
    /// Creates a failure outcome
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Returns true if the page loaded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the status code of a successful visit
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status } => Some(*status),
            Self::Failure { .. } => None,
        }
    }
}

/// Performs full page loads under a viewport profile
///
/// Implementations must never panic or return early on an ordinary HTTP
/// error status, and must release whatever per-visit resources they acquire
/// on every exit path.
#[allow(async_fn_in_trait)]
pub trait PageProbe {
    /// Visits `url` under `viewport` and reports the outcome
    async fn visit(&self, url: &str, viewport: &ViewportProfile) -> ProbeOutcome;
}
