use super::{BasePage, PageObject};
use crate::{DASHBOARD_TIMEOUT, Result};
use async_trait::async_trait;

pub struct MembersPage {
    base: BasePage,
}

impl MembersPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn url(&self) -> String {
        self.base.url_for("/members")
    }
}

#[async_trait]
impl PageObject for MembersPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    /// Waits for the members URL
    async fn is_loaded(&self) -> Result<bool> {
        tracing::info!("Checking members page, URL: {}", self.base.current_url());
        match self.base.wait_for_url(&self.url(), DASHBOARD_TIMEOUT).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
