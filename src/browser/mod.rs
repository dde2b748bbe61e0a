//! Browser module for rendering pages
//!
//! This module contains:
//! - The fixed desktop and mobile viewport profiles
//! - The `PageProbe` abstraction the crawler drives
//! - A shared Chromium engine handing out isolated browsing contexts
//! - The Chromium-backed probe implementation

mod chrome_probe;
mod engine;
mod probe;
mod viewport;

pub use chrome_probe::ChromeProbe;
pub use engine::{BrowserEngine, BrowsingContext};
pub use probe::{PageProbe, ProbeOutcome};
pub use viewport::{ViewportKind, ViewportProfile};
