use super::{BasePage, PageObject};
use crate::{CHECK_TIMEOUT, Result};
use async_trait::async_trait;

const NO_CHAT: &str = "text='No chat selected'";

/// Chat page at /messages
pub struct MessagesPage {
    base: BasePage,
}

impl MessagesPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn url(&self) -> String {
        self.base.url_for("/messages")
    }

    /// Placeholder shown while no conversation is open
    pub async fn has_no_chat_text(&self) -> Result<bool> {
        self.base.becomes_visible(NO_CHAT, CHECK_TIMEOUT).await
    }
}

#[async_trait]
impl PageObject for MessagesPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    async fn is_loaded(&self) -> Result<bool> {
        tracing::info!("Checking messages page, URL: {}", self.base.current_url());
        self.base.reaches_url(&self.url()).await
    }
}
