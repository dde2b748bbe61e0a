/// Viewport profiles used for each probe
///
/// The two profiles are fixed for the lifetime of a run.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two viewport profiles a probe runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportKind {
    Desktop,
    Mobile,
}

impl ViewportKind {
    /// Converts the kind to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }

    /// Returns the fixed profile for this kind
    pub fn profile(&self) -> &'static ViewportProfile {
        match self {
            Self::Desktop => &ViewportProfile::DESKTOP,
            Self::Mobile => &ViewportProfile::MOBILE,
        }
    }
}

impl fmt::Display for ViewportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Window size and user-agent suffix for one kind of visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportProfile {
    pub kind: ViewportKind,
    pub width: u32,
    pub height: u32,
    /// Appended to the configured base user agent
    pub user_agent_suffix: &'static str,
}

impl ViewportProfile {
    pub const DESKTOP: ViewportProfile = ViewportProfile {
        kind: ViewportKind::Desktop,
        width: 1280,
        height: 800,
        user_agent_suffix: "",
    };

    pub const MOBILE: ViewportProfile = ViewportProfile {
        kind: ViewportKind::Mobile,
        width: 375,
        height: 667,
        user_agent_suffix: " Mobile",
    };

    /// Builds the user agent for this profile from the configured base
    pub fn user_agent(&self, base: &str) -> String {
        format!("{}{}", base, self.user_agent_suffix)
    }
}
