// Integration tests for the tasks page and the task modal
//
// Live deployment only (BASE_URL, EMAIL, PASSWORD); the account needs at
// least one project.

mod common;

use projectm_e2e::pages::{DashboardPage, PageObject, TasksPage};
use projectm_e2e::{Result, Tag, TestCase};

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_navigate_to_tasks() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(&settings, "Navigate to tasks", &[Tag::Tasks]) else {
        return Ok(());
    };
    let (harness, session) = match common::signed_in(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let tasks = TasksPage::new(session.base());
        case.step(session.page(), "Open tasks", tasks.navigate())
            .await?;

        let url = session.page().url();
        case.ensure(
            session.page(),
            "URL is /tasks",
            url.trim_end_matches('/') == tasks.url(),
            format!("expected {}, URL: {}", tasks.url(), url),
        )
        .await?;
        let loaded = tasks.is_loaded().await?;
        case.ensure(session.page(), "Tasks heading is visible", loaded, "no tasks heading")
            .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_open_task_form_in_project() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(&settings, "Open task form", &[Tag::Tasks]) else {
        return Ok(());
    };
    let (harness, session) = match common::signed_in(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let dashboard = DashboardPage::new(session.base());
        let (project, id) = case
            .step(session.page(), "Open first project", dashboard.open_project(0))
            .await?;
        let loaded = project.is_loaded_for(&id).await?;
        case.ensure(
            session.page(),
            "Project board is open",
            loaded,
            format!("project {} not loaded, URL: {}", id, session.page().url()),
        )
        .await?;

        let column = project.is_todo_column_visible().await?;
        case.ensure(session.page(), "To Do column is visible", column, "no To Do column")
            .await?;
        case.step(session.page(), "Open task form", project.open_create_task_form())
            .await?;
        let open = project.is_task_form_open().await?;
        case.ensure(session.page(), "Task form is open", open, "task form did not open")
            .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}
