use super::{BasePage, PageObject};
use crate::{CHECK_TIMEOUT, Result};
use async_trait::async_trait;

const HEADING: &str = ":is(h1, h2):has-text('Tasks')";

/// "My Tasks" page at /tasks
pub struct TasksPage {
    base: BasePage,
}

impl TasksPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn url(&self) -> String {
        self.base.url_for("/tasks")
    }

    pub async fn navigate(&self) -> Result<()> {
        self.base.navigate_to(&self.url()).await
    }
}

#[async_trait]
impl PageObject for TasksPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    /// A heading mentioning "Tasks" is visible
    async fn is_loaded(&self) -> Result<bool> {
        tracing::info!("Checking tasks page");
        self.base.becomes_visible(HEADING, CHECK_TIMEOUT).await
    }
}
