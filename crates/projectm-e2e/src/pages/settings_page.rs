// Settings page
//
// /settings has no route in the application yet, so the expected state is
// the framework's 404 page.

use super::{BasePage, PageObject};
use crate::{CHECK_TIMEOUT, Result};
use async_trait::async_trait;

const ERROR_H1: &str = "h1.next-error-h1";
const ERROR_404_H1: &str = "h1.next-error-h1:has-text('404')";
const ERROR_H2: &str = "h2:has-text('This page could not be found.')";

pub struct SettingsPage {
    base: BasePage,
}

impl SettingsPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn url(&self) -> String {
        self.base.url_for("/settings")
    }

    /// Both the "404" heading and the not-found message are visible.
    ///
    /// Any failure while checking counts as `false`.
    pub async fn is_error_404_displayed(&self) -> bool {
        tracing::info!("Waiting for the 404 page");
        let check = async {
            self.base.wait_for_selector(ERROR_H1, CHECK_TIMEOUT).await?;
            Ok::<_, crate::Error>(
                self.base.is_visible(ERROR_404_H1).await? && self.base.is_visible(ERROR_H2).await?,
            )
        };
        match check.await {
            Ok(shown) => {
                tracing::info!("404 page shown: {}", shown);
                shown
            }
            Err(e) => {
                tracing::error!("404 check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl PageObject for SettingsPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    async fn is_loaded(&self) -> Result<bool> {
        self.base.reaches_url(&self.url()).await
    }
}
