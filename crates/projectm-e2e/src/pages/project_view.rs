// Project board at /projects/{id} and its "Create new Task" modal

use super::base::text_selector;
use super::{BasePage, PageObject};
use crate::data::TaskForm;
use crate::error::{Error, Result};
use crate::{CHECK_TIMEOUT, DASHBOARD_TIMEOUT, MODAL_TIMEOUT};
use async_trait::async_trait;
use std::time::Duration;

const TODO_COLUMN: &str = "div.border-green-400";
const TODO_ADD_BUTTON: &str = "div.border-green-400 button:has(svg.lucide-plus)";
const TASK_FORM_TITLE: &str = "h1:has-text('Create new Task')";
const TASK_TITLE_INPUT: &str = "input[placeholder='Task Title']";
const TASK_DESCRIPTION_INPUT: &str = "textarea[placeholder='Task Description']";
const TASK_TAGS_INPUT: &str = "input[placeholder='Tags (comma separated)']";
const TASK_START_DATE_INPUT: &str = "input[placeholder='Start Date']";
const TASK_DUE_DATE_INPUT: &str = "input[placeholder='Due Date']";
const TASK_POINTS_INPUT: &str = "input[placeholder='Story Points']";
const TASK_SUBMIT: &str = "button[type='submit']:has-text('Create New Task')";

const TASK_FORM_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ProjectViewPage {
    base: BasePage,
    project_id: Option<String>,
}

impl ProjectViewPage {
    pub fn new(base: BasePage) -> Self {
        Self {
            base,
            project_id: None,
        }
    }

    pub fn url_for_project(&self, project_id: &str) -> String {
        self.base.url_for(&format!("/projects/{}", project_id))
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Opens the board of `project_id` and waits for its URL.
    pub async fn navigate_to_project(&mut self, project_id: &str) -> Result<()> {
        tracing::info!("Opening project {}", project_id);
        let url = self.url_for_project(project_id);
        self.base
            .capture_on_error("navigation_error", async {
                self.base.navigate_to(&url).await?;
                self.base.wait_for_url(&url, DASHBOARD_TIMEOUT).await
            })
            .await?;
        self.project_id = Some(project_id.to_string());
        Ok(())
    }

    /// URL is the board of `project_id`
    pub async fn is_loaded_for(&self, project_id: &str) -> Result<bool> {
        self.base.reaches_url(&self.url_for_project(project_id)).await
    }

    pub async fn is_todo_column_visible(&self) -> Result<bool> {
        self.base.becomes_visible(TODO_COLUMN, CHECK_TIMEOUT).await
    }

    /// Clicks "+" in the To Do column and waits for the task modal.
    pub async fn open_create_task_form(&self) -> Result<()> {
        self.base
            .capture_on_error("plus_button_error", self.base.click(TODO_ADD_BUTTON, CHECK_TIMEOUT))
            .await?;
        tracing::info!("Clicked '+' in the To Do column");

        self.base
            .capture_on_error(
                "task_form_error",
                self.base.wait_for_selector(TASK_FORM_TITLE, TASK_FORM_TIMEOUT),
            )
            .await?;
        tracing::info!("Task form opened");
        Ok(())
    }

    pub async fn is_task_form_open(&self) -> Result<bool> {
        self.base.is_visible(TASK_FORM_TITLE).await
    }

    pub async fn fill_task_form(&self, form: &TaskForm) -> Result<()> {
        let fields = [
            (TASK_TITLE_INPUT, form.title.as_str()),
            (TASK_DESCRIPTION_INPUT, form.description.as_str()),
            (TASK_TAGS_INPUT, form.tags.as_str()),
            (TASK_START_DATE_INPUT, form.start_date.as_str()),
            (TASK_DUE_DATE_INPUT, form.due_date.as_str()),
            (TASK_POINTS_INPUT, form.story_points.as_str()),
        ];
        self.base
            .capture_on_error("task_form_fill_error", async {
                for (selector, value) in fields {
                    self.base.fill(selector, value, CHECK_TIMEOUT).await?;
                }
                Ok(())
            })
            .await?;
        tracing::info!("Task form filled: {}", form.title);
        Ok(())
    }

    pub async fn submit_task_form(&self) -> Result<()> {
        self.base
            .capture_on_error("task_form_submit_error", self.base.click(TASK_SUBMIT, CHECK_TIMEOUT))
            .await?;
        tracing::info!("Clicked 'Create New Task'");
        Ok(())
    }

    /// Opens the modal, fills `form` and submits it.
    pub async fn create_task(&self, form: &TaskForm) -> Result<()> {
        if !self.is_task_form_open().await? {
            self.open_create_task_form().await?;
        }
        self.fill_task_form(form).await?;
        self.submit_task_form().await
    }

    /// Waits for the task modal to close after a submit.
    pub async fn wait_task_form_closed(&self) -> Result<()> {
        self.base
            .wait_for_hidden(TASK_FORM_TITLE, MODAL_TIMEOUT)
            .await
            .map_err(|e| e.context("Task modal still open after submit"))
    }

    /// Waits for a task card titled `title`.
    pub async fn is_task_visible(&self, title: &str) -> Result<bool> {
        self.base
            .becomes_visible(&text_selector(title), MODAL_TIMEOUT)
            .await
    }
}

#[async_trait]
impl PageObject for ProjectViewPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    /// URL is a project board (the one navigated to, when known)
    async fn is_loaded(&self) -> Result<bool> {
        match &self.project_id {
            Some(id) => self.is_loaded_for(id).await,
            None => {
                let prefix = self.base.url_for("/projects/");
                match self
                    .base
                    .wait_for_url_matching("of a project board", CHECK_TIMEOUT, |url| {
                        url.starts_with(&prefix)
                    })
                    .await
                {
                    Ok(()) => Ok(true),
                    Err(Error::Timeout { .. }) => Ok(false),
                    Err(e) => Err(e),
                }
            }
        }
    }
}
