// Integration tests for the settings route
//
// /settings is not implemented by the app, so the framework 404 is expected.
// Live deployment only (BASE_URL, EMAIL, PASSWORD).

mod common;

use projectm_e2e::pages::{DashboardPage, PageObject};
use projectm_e2e::{Result, Tag, TestCase};

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_settings_shows_not_found() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) =
        TestCase::begin(&settings, "Settings navigation", &[Tag::Settings, Tag::Regression])
    else {
        return Ok(());
    };
    let (harness, session) = match common::signed_in(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let dashboard = DashboardPage::new(session.base());
        let settings_page = case
            .step(session.page(), "Open settings", dashboard.go_to_settings())
            .await?;

        let on_settings = settings_page.is_loaded().await?;
        case.ensure(
            session.page(),
            "URL is /settings",
            on_settings,
            format!("expected {}, URL: {}", settings_page.url(), session.page().url()),
        )
        .await?;

        let not_found = settings_page.is_error_404_displayed().await;
        case.ensure(session.page(), "404 page is shown", not_found, "no 404 page on /settings")
            .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}
