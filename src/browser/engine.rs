//! Browser lifecycle management
//!
//! One Chromium process is launched per run and shared by every probe. Each
//! probe gets its own CDP browser context (separate cookies, storage and
//! cache), which is disposed as soon as the probe finishes.
//!
//! Lifecycle: `launch → (acquire → release)* → shutdown`.

use crate::browser::viewport::ViewportProfile;
use crate::config::BrowserConfig;
use crate::{BrowserError, BrowserResult};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::SetLifecycleEventsEnabledParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
    GetBrowserContextsParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Distinguishes profile directories of engines launched by the same process
static LAUNCH_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Shared headless Chromium instance
///
/// Dropping the engine aborts the CDP handler task, which kills the browser
/// process, and removes the temporary profile directory. Prefer
/// [`shutdown`](Self::shutdown) for an orderly close.
pub struct BrowserEngine {
    browser: Arc<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    user_agent: String,
}

impl BrowserEngine {
    /// Launches Chromium
    ///
    /// Failure here is fatal for the run.
    pub async fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        tracing::info!("Launching browser...");

        let user_data_dir = std::env::temp_dir().join(format!(
            "sitemap_sweep_chrome_{}_{}",
            std::process::id(),
            LAUNCH_COUNT.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&user_data_dir).map_err(|e| {
            BrowserError::Launch(format!(
                "failed to create profile directory {}: {}",
                user_data_dir.display(),
                e
            ))
        })?;

        let mut builder = ChromeConfig::builder()
            .request_timeout(Duration::from_secs(config.navigation_timeout_secs))
            .window_size(1280, 800)
            .user_data_dir(user_data_dir.clone())
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let chrome_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {:?}", e);
                }
            }
            tracing::debug!("Browser event handler task completed");
        });

        Ok(Self {
            browser: Arc::new(browser),
            handler,
            user_data_dir: Some(user_data_dir),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Opens a fresh, isolated browsing context configured for `profile`
    ///
    /// The context is disposed again if any configuration step fails.
    pub async fn acquire(&self, profile: &ViewportProfile) -> BrowserResult<BrowsingContext> {
        let created = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))?;
        let context_id = created.result.browser_context_id.clone();

        match self.open_page(&context_id, profile).await {
            Ok(page) => Ok(BrowsingContext {
                browser: Arc::clone(&self.browser),
                context_id: Some(context_id),
                page,
            }),
            Err(e) => {
                dispose_context(&self.browser, context_id).await;
                Err(e)
            }
        }
    }

    async fn open_page(
        &self,
        context_id: &BrowserContextId,
        profile: &ViewportProfile,
    ) -> BrowserResult<Page> {
        let mut target = CreateTargetParams::new("about:blank");
        target.browser_context_id = Some(context_id.clone());

        let page = self
            .browser
            .new_page(target)
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(profile.width))
            .height(i64::from(profile.height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(BrowserError::Context)?;
        page.execute(metrics).await?;

        page.execute(SetUserAgentOverrideParams::new(
            profile.user_agent(&self.user_agent),
        ))
        .await?;

        page.execute(SetLifecycleEventsEnabledParams::new(true)).await?;

        Ok(page)
    }

    /// Number of browsing contexts acquired and not yet disposed
    pub async fn open_context_count(&self) -> BrowserResult<usize> {
        let contexts = self
            .browser
            .execute(GetBrowserContextsParams::default())
            .await
            .map_err(|e| BrowserError::Context(e.to_string()))?;
        Ok(contexts.result.browser_context_ids.len())
    }

    /// Closes the browser and waits for the process to exit
    pub async fn shutdown(mut self) {
        tracing::info!("Closing browser");

        match self.open_context_count().await {
            Ok(0) => {}
            Ok(open) => tracing::warn!("{} browsing contexts still open at shutdown", open),
            Err(e) => tracing::debug!("Could not list browsing contexts: {}", e),
        }

        match Arc::get_mut(&mut self.browser) {
            Some(browser) => {
                if let Err(e) = browser.close().await {
                    tracing::warn!("Failed to close browser cleanly: {}", e);
                }
                if let Err(e) = browser.wait().await {
                    tracing::warn!("Failed to wait for browser exit: {}", e);
                }
            }
            None => {
                tracing::warn!("Browser still referenced by a browsing context; killing on drop");
            }
        }
    }

    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            tracing::debug!("Cleaning up browser profile directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!(
                    "Failed to clean up profile directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        self.handler.abort();
        self.cleanup_temp_dir();
    }
}

/// A single isolated browsing context with one page
///
/// Call [`release`](Self::release) when done. A context dropped without
/// release is disposed on a background task.
pub struct BrowsingContext {
    browser: Arc<Browser>,
    context_id: Option<BrowserContextId>,
    page: Page,
}

impl BrowsingContext {
    /// The page opened in this context
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Closes the page and disposes the context
    pub async fn release(mut self) {
        if let Err(e) = self.page.clone().close().await {
            tracing::debug!("Failed to close page: {}", e);
        }
        if let Some(context_id) = self.context_id.take() {
            dispose_context(&self.browser, context_id).await;
        }
    }
}

impl Drop for BrowsingContext {
    fn drop(&mut self) {
        let Some(context_id) = self.context_id.take() else {
            return;
        };

        tracing::warn!("Browsing context dropped without release; disposing in background");
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let browser = Arc::clone(&self.browser);
            runtime.spawn(async move {
                dispose_context(&browser, context_id).await;
            });
        }
    }
}

async fn dispose_context(browser: &Browser, context_id: BrowserContextId) {
    if let Err(e) = browser
        .execute(DisposeBrowserContextParams::new(context_id))
        .await
    {
        tracing::warn!("Failed to dispose browsing context: {}", e);
    }
}
