//! Chromium-backed page probe
//!
//! Each visit follows the same protocol:
//!
//! 1. Acquire a fresh browsing context sized and user-agented for the profile
//! 2. Navigate and capture the top-level response status
//! 3. Wait for the `networkIdle` lifecycle event of that navigation
//! 4. Settle, so late client-side rendering gets a chance to fail
//! 5. Release the context
//!
//! Steps 2 and 3 share one timeout. The context is released whatever happens.

use crate::browser::engine::BrowserEngine;
use crate::browser::probe::{PageProbe, ProbeOutcome};
use crate::browser::viewport::ViewportProfile;
use crate::crawler::RateLimiter;
use crate::{BrowserError, BrowserResult};
use chromiumoxide::cdp::browser_protocol::network::LoaderId;
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;

/// Lifecycle event Chromium emits once no requests have been in flight for 500 ms
const NETWORK_IDLE: &str = "networkIdle";

/// Lifecycle event that opens a new document load
const LOAD_INIT: &str = "init";

/// Page probe driving a shared [`BrowserEngine`]
pub struct ChromeProbe<'a> {
    engine: &'a BrowserEngine,
    navigation_timeout: Duration,
    pacing: RateLimiter,
}

impl<'a> ChromeProbe<'a> {
    /// Creates a probe that borrows the engine for the length of the crawl
    pub fn new(engine: &'a BrowserEngine, navigation_timeout: Duration, pacing: RateLimiter) -> Self {
        Self {
            engine,
            navigation_timeout,
            pacing,
        }
    }

    async fn navigate(&self, page: &Page, url: &str) -> BrowserResult<u16> {
        // Subscribe before navigating so the new document's events are buffered
        let mut lifecycle = page.event_listener::<EventLifecycleEvent>().await?;

        let navigation = async {
            page.goto(url).await?;

            let request = page.wait_for_navigation_response().await?;
            let status = request
                .as_ref()
                .and_then(|request| request.response.as_ref())
                .map(|response| response.status)
                .ok_or(BrowserError::NoResponse)?;
            let status = u16::try_from(status)
                .map_err(|_| BrowserError::Navigation(format!("invalid status code {}", status)))?;

            let main_frame = page.mainframe().await?;
            let mut loader: Option<LoaderId> = None;
            while let Some(event) = lifecycle.next().await {
                if main_frame.as_ref().is_some_and(|frame| frame != &event.frame_id) {
                    continue;
                }
                if event.name == LOAD_INIT {
                    loader = Some(event.loader_id.clone());
                } else if event.name == NETWORK_IDLE && loader.as_ref() == Some(&event.loader_id) {
                    break;
                }
            }

            Ok::<u16, BrowserError>(status)
        };

        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Timeout(self.navigation_timeout.as_millis() as u64)),
        }
    }
}

impl PageProbe for ChromeProbe<'_> {
    async fn visit(&self, url: &str, viewport: &ViewportProfile) -> ProbeOutcome {
        let context = match self.engine.acquire(viewport).await {
            Ok(context) => context,
            Err(e) => return ProbeOutcome::failure(e.to_string()),
        };

        let result = self.navigate(context.page(), url).await;
        if result.is_ok() {
            self.pacing.settle().await;
        }

        context.release().await;

        match result {
            Ok(status) => ProbeOutcome::Success { status },
            Err(e) => ProbeOutcome::failure(e.to_string()),
        }
    }
}
