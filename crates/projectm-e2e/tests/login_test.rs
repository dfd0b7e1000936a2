// Integration tests for signing in through the form
//
// Live deployment only (BASE_URL, EMAIL, PASSWORD).

mod common;

use projectm_e2e::pages::{AuthenticationPage, PageObject};
use projectm_e2e::{Result, Tag, TestCase};

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_login_through_form() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) =
        TestCase::begin(&settings, "Login", &[Tag::Smoke, Tag::Authentication])
    else {
        return Ok(());
    };
    let email = settings.email.clone();
    let password = settings.password.clone();
    let (harness, session) = match common::anonymous(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let auth_page = AuthenticationPage::new(session.base());
        let dashboard = case
            .step(session.page(), "Sign in", auth_page.login(&email, &password))
            .await?;

        let loaded = dashboard.is_loaded().await?;
        case.ensure(session.page(), "Dashboard is loaded", loaded, "dashboard not loaded after login")
            .await?;
        let menu = dashboard.is_profile_menu_visible().await?;
        case.ensure(session.page(), "Profile menu is visible", menu, "no profile menu on the dashboard")
            .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}
