// Base page - shared waits and actions for every screen
//
// Every interaction follows "wait for the element (or URL), then act". Waits
// that run out of time become `Error::Timeout` naming what was awaited.

use crate::error::{Error, Result};
use crate::page_log::PageLog;
use crate::settings::Settings;
use crate::{CHECK_TIMEOUT, DASHBOARD_TIMEOUT};
use async_trait::async_trait;
use playwright_rs::{ClickOptions, FillOptions, GotoOptions, Locator, Page, WaitUntil};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Interval between URL polls
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A screen of the application
#[async_trait]
pub trait PageObject: Send + Sync {
    fn base(&self) -> &BasePage;

    /// True when the screen's landmark is present
    async fn is_loaded(&self) -> Result<bool>;

    fn page(&self) -> &Page {
        self.base().page()
    }

    fn current_url(&self) -> String {
        self.base().current_url()
    }
}

/// Page handle plus the settings and log of its session
#[derive(Clone)]
pub struct BasePage {
    page: Page,
    settings: Arc<Settings>,
    log: PageLog,
}

impl BasePage {
    pub fn new(page: Page, settings: Arc<Settings>, log: PageLog) -> Self {
        Self {
            page,
            settings,
            log,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn log(&self) -> &PageLog {
        &self.log
    }

    /// Absolute URL of an application path
    pub fn url_for(&self, path: &str) -> String {
        self.settings.url(path)
    }

    pub fn current_url(&self) -> String {
        self.page.url()
    }

    pub async fn locator(&self, selector: &str) -> Locator {
        self.page.locator(selector).await
    }

    /// Opens `url` and waits for the network to go idle.
    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        self.navigate_with_timeout(url, DASHBOARD_TIMEOUT).await
    }

    pub async fn navigate_with_timeout(&self, url: &str, timeout: Duration) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        let options = GotoOptions::new()
            .timeout(timeout)
            .wait_until(WaitUntil::NetworkIdle);

        let response = self
            .page
            .goto(url, Some(options))
            .await
            .map_err(|e| Error::from(e).context(format!("Failed to open {}", url)))?;

        if let Some(response) = response {
            self.log.record_response(&response);
        }
        tracing::info!("Loaded {}", self.page.url());
        Ok(())
    }

    /// Waits until the first element matching `selector` is visible.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<Locator> {
        let locator = self.page.locator(selector).await.first();
        self.wait_visible(&locator, selector, timeout).await?;
        Ok(locator)
    }

    /// Waits until `locator` is visible; `label` names it in the timeout error.
    pub async fn wait_visible(&self, locator: &Locator, label: &str, timeout: Duration) -> Result<()> {
        playwright_rs::expect(locator.clone())
            .with_timeout(timeout)
            .to_be_visible()
            .await
            .map_err(|e| driver_wait_error(e, format!("selector '{}' to be visible", label), timeout))
    }

    /// Waits until no element matching `selector` is visible.
    pub async fn wait_for_hidden(&self, selector: &str, timeout: Duration) -> Result<()> {
        let locator = self.page.locator(selector).await.first();
        playwright_rs::expect(locator)
            .with_timeout(timeout)
            .to_be_hidden()
            .await
            .map_err(|e| driver_wait_error(e, format!("selector '{}' to be hidden", selector), timeout))
    }

    /// Waits until the page URL equals `url` (a trailing slash is ignored).
    pub async fn wait_for_url(&self, url: &str, timeout: Duration) -> Result<()> {
        let expected = url.trim_end_matches('/');
        self.wait_for_url_matching(url, timeout, |current| {
            current.trim_end_matches('/') == expected
        })
        .await
    }

    /// Polls the page URL until `matches` accepts it.
    pub async fn wait_for_url_matching<F>(&self, what: &str, timeout: Duration, matches: F) -> Result<()>
    where
        F: Fn(&str) -> bool,
    {
        let page = &self.page;
        let matches = &matches;
        let outcome = self
            .poll_until(&format!("URL {}", what), timeout, || async move {
                let current = page.url();
                Ok(matches(&current).then_some(current))
            })
            .await;

        match outcome {
            Ok(current) => {
                tracing::debug!("URL reached: {}", current);
                Ok(())
            }
            Err(Error::Timeout { what, timeout_ms }) => Err(Error::Timeout {
                what: format!("{} (last URL: {})", what, page.url()),
                timeout_ms,
            }),
            Err(e) => Err(e),
        }
    }

    /// Re-runs `check` every poll interval until it yields a value.
    pub async fn poll_until<T, F, Fut>(&self, what: &str, timeout: Duration, mut check: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(value) = check().await? {
                return Ok(value);
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    what: what.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Runs `action`; on error captures `<name>.png` and `<name>.html`, then
    /// returns the error.
    pub async fn capture_on_error<T, F>(&self, name: &str, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match action.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!("{}: {}", name, e);
                self.capture(name).await;
                Err(e)
            }
        }
    }

    pub async fn wait_for_timeout(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Waits for `selector` then clicks it.
    pub async fn click(&self, selector: &str, timeout: Duration) -> Result<()> {
        let locator = self.wait_for_selector(selector, timeout).await?;
        locator
            .click(Some(ClickOptions {
                timeout: Some(timeout.as_millis() as f64),
                ..Default::default()
            }))
            .await
            .map_err(|e| Error::from(e).context(format!("Failed to click '{}'", selector)))?;
        tracing::debug!("Clicked '{}'", selector);
        Ok(())
    }

    /// Waits for `selector` then fills it with `value`.
    pub async fn fill(&self, selector: &str, value: &str, timeout: Duration) -> Result<()> {
        let locator = self.wait_for_selector(selector, timeout).await?;
        locator
            .fill(
                value,
                Some(FillOptions {
                    timeout: Some(timeout.as_millis() as f64),
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| Error::from(e).context(format!("Failed to fill '{}'", selector)))?;
        tracing::debug!("Filled '{}'", selector);
        Ok(())
    }

    /// Trimmed text of the first element matching `selector`, once visible.
    pub async fn text_of(&self, selector: &str, timeout: Duration) -> Result<String> {
        let locator = self.wait_for_selector(selector, timeout).await?;
        let text = locator.text_content().await?.unwrap_or_default();
        Ok(text.trim().to_string())
    }

    /// Current visibility of `selector`, without waiting.
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.page.locator(selector).await.first().is_visible().await?)
    }

    /// Visibility of `selector` after waiting up to `timeout`; a timeout means `false`.
    pub async fn becomes_visible(&self, selector: &str, timeout: Duration) -> Result<bool> {
        match self.wait_for_selector(selector, timeout).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// True once the URL equals `url` within [`CHECK_TIMEOUT`].
    pub async fn reaches_url(&self, url: &str) -> Result<bool> {
        match self.wait_for_url(url, CHECK_TIMEOUT).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn take_screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        self.page.screenshot_to_file(path, None).await?;
        tracing::info!("Screenshot saved to {}", path.display());
        Ok(())
    }

    /// Saves `<name>.png` and `<name>.html` under `<artifacts>/pages/`.
    ///
    /// Used on failure paths, so errors are logged and swallowed.
    pub async fn capture(&self, name: &str) {
        let dir = self.settings.artifacts_dir.join("pages");
        let stem = format!("{}_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"), name);

        if let Err(e) = self.take_screenshot(&dir.join(format!("{}.png", stem))).await {
            tracing::warn!("Could not save screenshot '{}': {}", name, e);
        }
        if let Err(e) = self.save_html(&dir.join(format!("{}.html", stem))).await {
            tracing::warn!("Could not save HTML '{}': {}", name, e);
        }
    }

    async fn save_html(&self, path: &Path) -> Result<()> {
        let html = self.page.content().await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, html).await?;
        Ok(())
    }
}

/// Exact-match text selector for `text`
pub(crate) fn text_selector(text: &str) -> String {
    format!("text=\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Maps driver-side wait timeouts onto `Error::Timeout`.
fn driver_wait_error(err: playwright_rs::Error, what: String, timeout: Duration) -> Error {
    match err {
        playwright_rs::Error::Timeout(_) | playwright_rs::Error::AssertionTimeout(_) => Error::Timeout {
            what,
            timeout_ms: timeout.as_millis() as u64,
        },
        other => Error::from(other).context(format!("Failed waiting for {}", what)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_timeouts_become_wait_timeouts() {
        let err = driver_wait_error(
            playwright_rs::Error::AssertionTimeout("#email".into()),
            "selector '#email' to be visible".into(),
            Duration::from_secs(2),
        );
        assert!(matches!(err, Error::Timeout { timeout_ms: 2000, .. }));
        assert_eq!(
            err.to_string(),
            "Timeout after 2000ms waiting for selector '#email' to be visible"
        );
    }

    #[test]
    fn test_text_selector_quotes() {
        assert_eq!(text_selector("Test Task"), r#"text="Test Task""#);
        assert_eq!(text_selector(r#"say "hi""#), r#"text="say \"hi\"""#);
        assert_eq!(text_selector(r"a\b"), r#"text="a\\b""#);
    }

    #[test]
    fn test_other_driver_errors_keep_context() {
        let err = driver_wait_error(
            playwright_rs::Error::ChannelClosed,
            "selector 'h1' to be visible".into(),
            Duration::from_secs(1),
        );
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("Failed waiting for selector 'h1'"));
    }
}
