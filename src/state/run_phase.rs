/// Run-level phases of a crawl
///
/// ```text
/// Init → ResolvingSitemap → Empty    → Finalizing → Done
///                         ↘ Crawling ↗
///        ResolvingSitemap → Aborted
/// ```
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    // ===== Active Phases =====
    /// Nothing has happened yet
    Init,

    /// Fetching and parsing the sitemap
    ResolvingSitemap,

    /// The sitemap resolved to zero URLs
    Empty,

    /// Probing the resolved URLs
    Crawling,

    /// Handing the finished run to the result sinks
    Finalizing,

    // ===== Terminal Phases =====
    /// Results persisted
    Done,

    /// A fatal error stopped the run before any result was written
    Aborted,
}

impl RunPhase {
    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::ResolvingSitemap)
                | (Self::ResolvingSitemap, Self::Empty)
                | (Self::ResolvingSitemap, Self::Crawling)
                | (Self::ResolvingSitemap, Self::Aborted)
                | (Self::Crawling, Self::Aborted)
                | (Self::Empty, Self::Finalizing)
                | (Self::Crawling, Self::Finalizing)
                | (Self::Finalizing, Self::Done)
        )
    }

    /// Converts the phase to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ResolvingSitemap => "resolving_sitemap",
            Self::Empty => "empty",
            Self::Crawling => "crawling",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
