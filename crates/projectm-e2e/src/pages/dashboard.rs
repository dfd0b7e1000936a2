// Dashboard page - profile menu, sidebar navigation and the project list
//
// The sidebar collapses to icons; project titles, the "MY PROJECTS" header
// and the per-project options menu only render while it is expanded.

use super::{
    AuthenticationPage, BasePage, MembersPage, MessagesPage, PageObject, ProjectFormModal,
    ProjectViewPage, SettingsPage, TasksPage,
};
use crate::error::{Error, Result};
use crate::{CHECK_TIMEOUT, DASHBOARD_TIMEOUT, MODAL_TIMEOUT};
use async_trait::async_trait;
use std::time::Duration;

const PROFILE_MENU: &str = "div.relative:has(svg.lucide-chevron-down)";
const LOGOUT_ITEM: &str = "text=Logout";
const SIDEBAR_TOGGLE: &str = "div.cursor-pointer:has(> svg.lucide-chevrons-right)";
const MY_PROJECTS: &str = "p:has-text('MY PROJECTS')";
const NEW_PROJECT_BUTTON: &str = "div:has(> p:has-text('MY PROJECTS')) > button";
const PROJECT_LINK: &str = "a[href^='/projects/']";
/// Email input of the sign-in form, rendered in place of the layout when
/// the tab holds no token
const SIGN_IN_EMAIL: &str = "#email";

/// Delay for the profile dropdown to open
const MENU_SETTLE: Duration = Duration::from_millis(500);

pub struct DashboardPage {
    base: BasePage,
}

impl DashboardPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn url(&self) -> String {
        self.base.url_for("/dashboard")
    }

    pub async fn navigate(&self) -> Result<()> {
        self.base.navigate_to(&self.url()).await
    }

    pub async fn is_profile_menu_visible(&self) -> Result<bool> {
        self.base.becomes_visible(PROFILE_MENU, DASHBOARD_TIMEOUT).await
    }

    /// Whether the signed-in layout rendered: profile menu shown, no sign-in form.
    ///
    /// An anonymous tab still sits on /dashboard while the sign-in form is
    /// shown, so the URL is not enough.
    pub async fn is_signed_in(&self) -> Result<bool> {
        let base = &self.base;
        let outcome = base
            .poll_until("signed-in dashboard", DASHBOARD_TIMEOUT, || async move {
                if base.is_visible(SIGN_IN_EMAIL).await? {
                    return Ok(Some(false));
                }
                if base.is_visible(PROFILE_MENU).await? {
                    return Ok(Some(true));
                }
                Ok(None)
            })
            .await;

        match outcome {
            Ok(signed_in) => {
                tracing::info!("Signed in: {}, URL: {}", signed_in, base.current_url());
                Ok(signed_in)
            }
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Logs out through the profile dropdown.
    pub async fn logout(&self) -> Result<AuthenticationPage> {
        let profile = self
            .base
            .capture_on_error(
                "logout_profile_error",
                self.base.wait_for_selector(PROFILE_MENU, DASHBOARD_TIMEOUT),
            )
            .await?;
        profile.hover(None).await?;
        profile.click(None).await?;
        tracing::info!("Profile menu opened");
        self.base.wait_for_timeout(MENU_SETTLE).await;

        self.base
            .capture_on_error(
                "logout_error",
                self.base.click(LOGOUT_ITEM, Duration::from_secs(5)),
            )
            .await?;
        tracing::info!("Clicked Logout");

        let auth = AuthenticationPage::new(self.base.clone());
        self.base.wait_for_url(&auth.url(), DASHBOARD_TIMEOUT).await?;
        tracing::info!("Logged out, URL: {}", self.base.current_url());
        Ok(auth)
    }

    async fn go_to(&self, path: &str) -> Result<()> {
        let link = format!("a[href='{}']", path);
        self.base.click(&link, DASHBOARD_TIMEOUT).await?;
        self.base
            .wait_for_url(&self.base.url_for(path), DASHBOARD_TIMEOUT)
            .await?;
        tracing::info!("Opened {}", path);
        Ok(())
    }

    pub async fn go_to_messages(&self) -> Result<MessagesPage> {
        self.go_to("/messages").await?;
        Ok(MessagesPage::new(self.base.clone()))
    }

    pub async fn go_to_members(&self) -> Result<MembersPage> {
        self.go_to("/members").await?;
        Ok(MembersPage::new(self.base.clone()))
    }

    pub async fn go_to_tasks(&self) -> Result<TasksPage> {
        self.go_to("/tasks").await?;
        Ok(TasksPage::new(self.base.clone()))
    }

    pub async fn go_to_settings(&self) -> Result<SettingsPage> {
        self.go_to("/settings").await?;
        Ok(SettingsPage::new(self.base.clone()))
    }

    /// Expands the sidebar unless it already is.
    pub async fn open_side_menu(&self) -> Result<()> {
        if self.base.is_visible(MY_PROJECTS).await? {
            return Ok(());
        }
        self.base.click(SIDEBAR_TOGGLE, DASHBOARD_TIMEOUT).await?;
        self.base.wait_for_selector(MY_PROJECTS, CHECK_TIMEOUT).await?;
        tracing::info!("Sidebar expanded");
        Ok(())
    }

    /// Number of projects listed in the sidebar
    pub async fn project_count(&self) -> Result<usize> {
        self.open_side_menu().await?;
        let count = self.base.locator(PROJECT_LINK).await.count().await?;
        tracing::info!("{} projects listed", count);
        Ok(count)
    }

    /// Opens the project at `index` in the sidebar list.
    ///
    /// Returns the project page and the project id from the link.
    pub async fn open_project(&self, index: usize) -> Result<(ProjectViewPage, String)> {
        self.open_side_menu().await?;
        self.base
            .wait_for_selector(PROJECT_LINK, DASHBOARD_TIMEOUT)
            .await?;

        let links = self.base.locator(PROJECT_LINK).await;
        let count = links.count().await?;
        if index >= count {
            return Err(Error::Assertion(format!(
                "project #{} requested but only {} listed",
                index + 1,
                count
            )));
        }

        let link = links.nth(index as i32);
        let href = link
            .get_attribute("href")
            .await?
            .ok_or_else(|| Error::Assertion("project link has no href".into()))?;
        let id = href.trim_start_matches("/projects/").to_string();

        link.click(None).await?;
        self.base
            .wait_for_url(&self.base.url_for(&href), DASHBOARD_TIMEOUT)
            .await?;
        tracing::info!("Opened project {}", id);

        Ok((ProjectViewPage::new(self.base.clone()), id))
    }

    pub async fn open_second_project(&self) -> Result<(ProjectViewPage, String)> {
        self.open_project(1).await
    }

    pub async fn open_third_project(&self) -> Result<(ProjectViewPage, String)> {
        self.open_project(2).await
    }

    /// Deletes the first project through its options menu and returns its id.
    ///
    /// The options menu only renders for the active project, so the project
    /// is opened first.
    pub async fn delete_first_project(&self) -> Result<String> {
        let (_, id) = self.open_project(0).await?;
        self.open_side_menu().await?;

        let item = format!("a[href='/projects/{}']", id);
        self.base
            .capture_on_error("delete_project_error", async {
                self.base
                    .click(&format!("{} svg.lucide-ellipsis", item), MODAL_TIMEOUT)
                    .await?;
                self.base
                    .click(&format!("{} p:has-text('Delete')", item), MODAL_TIMEOUT)
                    .await?;
                self.base.wait_for_hidden(&item, MODAL_TIMEOUT).await
            })
            .await?;

        tracing::info!("Deleted project {}", id);
        Ok(id)
    }

    /// Opens the "Create New Project" modal from the sidebar.
    pub async fn open_create_project_form(&self) -> Result<ProjectFormModal> {
        self.open_side_menu().await?;
        self.base.click(NEW_PROJECT_BUTTON, DASHBOARD_TIMEOUT).await?;
        let modal = ProjectFormModal::new(self.base.clone());
        modal.wait_open().await?;
        Ok(modal)
    }
}

#[async_trait]
impl PageObject for DashboardPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    /// URL is the dashboard
    async fn is_loaded(&self) -> Result<bool> {
        tracing::info!("Checking dashboard, URL: {}", self.base.current_url());
        self.base.reaches_url(&self.url()).await
    }
}
