// Browser fixtures
//
// A `Harness` owns the Playwright driver and one Chromium instance for the
// duration of a test. Sessions are isolated browser contexts opened from it,
// each with a page and a `PageLog` already attached.

use crate::error::{Error, Result};
use crate::page_log::PageLog;
use crate::pages::BasePage;
use crate::report::TestCase;
use crate::settings::Settings;
use playwright_rs::{Browser, BrowserContext, BrowserContextOptions, LaunchOptions, Page, Playwright};
use std::sync::Arc;

/// Driver and browser for one test
pub struct Harness {
    playwright: Playwright,
    browser: Browser,
    settings: Arc<Settings>,
}

impl Harness {
    /// Starts the driver and launches Chromium as configured by `settings`.
    pub async fn launch(settings: Settings) -> Result<Self> {
        tracing::info!(
            "Launching Chromium (headless: {}, slow_mo: {:?})",
            settings.headless,
            settings.slow_mo_ms
        );

        let playwright = Playwright::launch()
            .await
            .map_err(|e| Error::from(e).context("Failed to start Playwright driver"))?;

        let mut options = LaunchOptions::new().headless(settings.headless);
        if let Some(ms) = settings.slow_mo_ms {
            options = options.slow_mo(ms);
        }

        let browser = playwright
            .chromium()
            .launch_with_options(options)
            .await
            .map_err(|e| Error::from(e).context("Failed to launch Chromium"))?;

        tracing::info!("Browser started: {} {}", browser.name(), browser.version());

        Ok(Self {
            playwright,
            browser,
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Opens an anonymous session.
    pub async fn new_session(&self) -> Result<Session> {
        self.new_session_with_options(BrowserContextOptions::default())
            .await
    }

    /// Opens a session with custom context options (e.g. injected storage state).
    pub async fn new_session_with_options(&self, options: BrowserContextOptions) -> Result<Session> {
        let context = self
            .browser
            .new_context_with_options(options)
            .await
            .map_err(|e| Error::from(e).context("Failed to create browser context"))?;
        let page = context.new_page().await?;

        let log = PageLog::new();
        log.attach(&page).await?;

        tracing::debug!("New session opened");
        Ok(Session {
            context,
            page,
            log,
            settings: Arc::clone(&self.settings),
        })
    }

    /// Closes the browser and stops the driver.
    pub async fn close(self) -> Result<()> {
        tracing::info!("Closing browser");
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}

/// One browser context with its active page
pub struct Session {
    context: BrowserContext,
    page: Page,
    log: PageLog,
    settings: Arc<Settings>,
}

impl Session {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn context(&self) -> &BrowserContext {
        &self.context
    }

    pub fn log(&self) -> &PageLog {
        &self.log
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Page-object base bound to this session's page
    pub fn base(&self) -> BasePage {
        BasePage::new(self.page.clone(), Arc::clone(&self.settings), self.log.clone())
    }

    /// Opens another page in the same context, sharing the session log.
    pub async fn new_page(&self) -> Result<Page> {
        let page = self.context.new_page().await?;
        self.log.attach(&page).await?;
        Ok(page)
    }

    /// Attaches the console and network logs to `case`.
    ///
    /// Console messages still buffered in the page are pulled first; a page
    /// that can no longer be evaluated only loses those.
    pub async fn attach_logs(&self, case: &mut TestCase) -> Result<()> {
        if let Err(e) = self.log.drain_console(&self.page).await {
            tracing::warn!("Could not read console buffer: {}", e);
        }
        case.attach_text("Console Logs", &self.log.console_lines())
            .await?;
        case.attach_text("Network Logs", &self.log.network_lines())
            .await?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.context.close().await?;
        Ok(())
    }
}
