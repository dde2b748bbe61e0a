/// Per-URL probe sequencing
///
/// ```text
/// ProbingDesktop ──ok──▶ ProbingMobile ──ok──▶ Succeeded
///        │                     │
///        └──fail──▶ Failed ◀──fail
/// ```
///
/// A failure on either probe ends the sequence; the mobile probe is never
/// attempted after a desktop failure.
use crate::browser::{ProbeOutcome, ViewportKind};

/// Represents where a single URL is in its desktop/mobile probe sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPhase {
    // ===== Active Phases =====
    /// Waiting for the desktop probe
    ProbingDesktop,

    /// Desktop succeeded, waiting for the mobile probe
    ProbingMobile { desktop_status: u16 },

    // ===== Terminal Phases =====
    /// Both probes succeeded
    Succeeded {
        desktop_status: u16,
        mobile_status: u16,
    },

    /// A probe failed; later probes were skipped
    Failed {
        viewport: ViewportKind,
        desktop_status: Option<u16>,
        message: String,
    },
}

impl UrlPhase {
    /// The starting phase for every URL
    pub fn start() -> Self {
        Self::ProbingDesktop
    }

    /// Returns the viewport to probe next, or None once terminal
    pub fn pending_viewport(&self) -> Option<ViewportKind> {
        match self {
            Self::ProbingDesktop => Some(ViewportKind::Desktop),
            Self::ProbingMobile { .. } => Some(ViewportKind::Mobile),
            Self::Succeeded { .. } | Self::Failed { .. } => None,
        }
    }

    /// Folds the outcome of the pending probe into the next phase
    ///
    /// Terminal phases are returned unchanged.
    pub fn advance(self, outcome: ProbeOutcome) -> Self {
        match (self, outcome) {
            (Self::ProbingDesktop, ProbeOutcome::Success { status }) => Self::ProbingMobile {
                desktop_status: status,
            },
            (Self::ProbingDesktop, ProbeOutcome::Failure { message }) => Self::Failed {
                viewport: ViewportKind::Desktop,
                desktop_status: None,
                message,
            },
            (Self::ProbingMobile { desktop_status }, ProbeOutcome::Success { status }) => {
                Self::Succeeded {
                    desktop_status,
                    mobile_status: status,
                }
            }
            (Self::ProbingMobile { desktop_status }, ProbeOutcome::Failure { message }) => {
                Self::Failed {
                    viewport: ViewportKind::Mobile,
                    desktop_status: Some(desktop_status),
                    message,
                }
            }
            (terminal, _) => terminal,
        }
    }
}
