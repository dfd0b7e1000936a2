// Page objects, one per screen of the application

mod authentication;
mod base;
mod dashboard;
mod home;
mod members;
mod messages;
mod project_form;
mod project_view;
mod settings_page;
mod tasks;

pub use authentication::AuthenticationPage;
pub use base::{BasePage, PageObject};
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use members::MembersPage;
pub use messages::MessagesPage;
pub use project_form::{ProjectField, ProjectFormModal};
pub use project_view::ProjectViewPage;
pub use settings_page::SettingsPage;
pub use tasks::TasksPage;
