// Integration tests for signing out
//
// Live deployment only (BASE_URL, EMAIL, PASSWORD).

mod common;

use projectm_e2e::pages::{DashboardPage, PageObject};
use projectm_e2e::{Result, Tag, TestCase};

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_logout() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(&settings, "Logout", &[Tag::Regression, Tag::Logout])
    else {
        return Ok(());
    };
    let (harness, session) = match common::signed_in(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let dashboard = DashboardPage::new(session.base());
        let loaded = dashboard.is_loaded().await?;
        case.ensure(session.page(), "Dashboard is loaded", loaded, "dashboard not loaded")
            .await?;

        let auth_page = case
            .step(session.page(), "Log out", dashboard.logout())
            .await?;
        let on_auth = auth_page.is_loaded().await?;
        case.ensure(
            session.page(),
            "Authentication page is shown",
            on_auth,
            "authentication page not loaded after logout",
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}
