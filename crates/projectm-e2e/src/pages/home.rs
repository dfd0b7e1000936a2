use super::{BasePage, PageObject};
use crate::Result;
use async_trait::async_trait;

/// Landing page at the base URL
pub struct HomePage {
    base: BasePage,
}

impl HomePage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub async fn navigate(&self) -> Result<()> {
        let url = self.base.url_for("");
        self.base.navigate_to(&url).await
    }
}

#[async_trait]
impl PageObject for HomePage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    /// Title contains `ProjectM`
    async fn is_loaded(&self) -> Result<bool> {
        let title = self.base.page().title().await?;
        let loaded = title.contains("ProjectM");
        if loaded {
            tracing::info!("Home page loaded, title: {}", title);
        }
        Ok(loaded)
    }
}
