// "Create New Project" modal
//
// Every action captures the page HTML and a screenshot when it fails.

use super::base::text_selector;
use super::BasePage;
use crate::data::{ProjectForm, ProjectStatus};
use crate::error::Result;
use crate::MODAL_TIMEOUT;

const TITLE: &str = "h1:has-text('Create New Project')";
const NAME_INPUT: &str = "input[placeholder='Project Name']";
const DESCRIPTION_INPUT: &str = "textarea[placeholder='Project Description']";
const START_DATE_INPUT: &str = "input[placeholder='Start Date']";
const END_DATE_INPUT: &str = "input[placeholder='End Date']";
const STATUS_SELECT: &str = "select.mb-4.block.w-full";
const CREATE_BUTTON: &str = "button[type='submit']";
const ENABLED_CREATE_BUTTON: &str = "button[type='submit']:not([disabled])";
const CLOSE_BUTTON: &str = "button:has(svg.lucide-x)";
const CREATED_TOAST: &str = "text=Project created successfully!";

/// Text inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Description,
    StartDate,
    EndDate,
}

impl ProjectField {
    fn selector(&self) -> &'static str {
        match self {
            ProjectField::Name => NAME_INPUT,
            ProjectField::Description => DESCRIPTION_INPUT,
            ProjectField::StartDate => START_DATE_INPUT,
            ProjectField::EndDate => END_DATE_INPUT,
        }
    }
}

pub struct ProjectFormModal {
    base: BasePage,
}

impl ProjectFormModal {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub async fn wait_open(&self) -> Result<()> {
        self.base
            .capture_on_error("project_form_error", async {
                self.base.wait_for_selector(TITLE, MODAL_TIMEOUT).await?;
                Ok(())
            })
            .await
    }

    async fn fill_field(&self, field: ProjectField, value: &str, capture: &str) -> Result<()> {
        self.base
            .capture_on_error(capture, self.base.fill(field.selector(), value, MODAL_TIMEOUT))
            .await?;
        tracing::info!("{:?} filled: {}", field, value);
        Ok(())
    }

    pub async fn fill_name(&self, name: &str) -> Result<()> {
        self.fill_field(ProjectField::Name, name, "project_name_error")
            .await
    }

    pub async fn fill_description(&self, description: &str) -> Result<()> {
        self.fill_field(ProjectField::Description, description, "description_error")
            .await
    }

    pub async fn fill_start_date(&self, date: &str) -> Result<()> {
        self.fill_field(ProjectField::StartDate, date, "start_date_error")
            .await
    }

    pub async fn fill_end_date(&self, date: &str) -> Result<()> {
        self.fill_field(ProjectField::EndDate, date, "end_date_error")
            .await
    }

    pub async fn select_status(&self, status: ProjectStatus) -> Result<()> {
        self.base
            .capture_on_error("status_error", async {
                let select = self.base.wait_for_selector(STATUS_SELECT, MODAL_TIMEOUT).await?;
                select.select_option(status.as_str(), None).await?;
                Ok(())
            })
            .await?;
        tracing::info!("Status selected: {}", status.as_str());
        Ok(())
    }

    /// Fills every field of the form.
    pub async fn fill(&self, form: &ProjectForm) -> Result<()> {
        self.fill_name(&form.name).await?;
        self.fill_description(&form.description).await?;
        self.fill_start_date(&form.start_date).await?;
        self.fill_end_date(&form.end_date).await?;
        self.select_status(form.status).await
    }

    /// Waits for "Create" to become enabled, then clicks it.
    pub async fn submit(&self) -> Result<()> {
        self.base
            .capture_on_error(
                "submit_error",
                self.base.click(ENABLED_CREATE_BUTTON, MODAL_TIMEOUT),
            )
            .await?;
        tracing::info!("Project form submitted");
        Ok(())
    }

    /// Whether the success toast shows up after submitting
    pub async fn is_created_message_visible(&self) -> Result<bool> {
        self.base.becomes_visible(CREATED_TOAST, MODAL_TIMEOUT).await
    }

    pub async fn cancel(&self) -> Result<()> {
        self.base
            .capture_on_error("form_close_error", self.base.click(CLOSE_BUTTON, MODAL_TIMEOUT))
            .await?;
        tracing::info!("Project form closed");
        Ok(())
    }

    /// Waits for the modal to go away (after cancel or submit).
    pub async fn wait_closed(&self) -> Result<()> {
        self.base.wait_for_hidden(TITLE, MODAL_TIMEOUT).await
    }

    /// The name input is visible
    pub async fn is_visible(&self) -> Result<bool> {
        self.base.is_visible(NAME_INPUT).await
    }

    pub async fn is_field_empty(&self, field: ProjectField) -> Result<bool> {
        let value = self
            .base
            .capture_on_error("field_empty_error", async {
                let input = self.base.wait_for_selector(field.selector(), MODAL_TIMEOUT).await?;
                Ok(input.input_value(None).await?)
            })
            .await?;
        Ok(value.is_empty())
    }

    /// Status select still shows "Not Started"
    pub async fn is_status_default(&self) -> Result<bool> {
        let value = self
            .base
            .capture_on_error("status_default_error", async {
                let select = self.base.wait_for_selector(STATUS_SELECT, MODAL_TIMEOUT).await?;
                Ok(select.input_value(None).await?)
            })
            .await?;
        Ok(value == ProjectStatus::NotStarted.as_str())
    }

    pub async fn is_create_button_enabled(&self) -> Result<bool> {
        self.base
            .capture_on_error("create_button_error", async {
                let button = self.base.wait_for_selector(CREATE_BUTTON, MODAL_TIMEOUT).await?;
                Ok(button.is_enabled().await?)
            })
            .await
    }

    /// Waits for a project named `name` to appear on the page.
    pub async fn is_project_visible(&self, name: &str) -> Result<bool> {
        let selector = text_selector(name);
        self.base
            .capture_on_error(
                "project_visibility_error",
                self.base.wait_for_selector(&selector, MODAL_TIMEOUT),
            )
            .await?;
        Ok(true)
    }
}
