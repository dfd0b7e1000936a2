// Integration tests for authentication and sign-up
//
// Run against a live deployment: set BASE_URL, EMAIL and PASSWORD, then
// `cargo test -p projectm-e2e --test auth_test -- --ignored --test-threads=1`.

mod common;

use projectm_e2e::data::{self, SignupForm};
use projectm_e2e::pages::{AuthenticationPage, DashboardPage, PageObject};
use projectm_e2e::{CHECK_TIMEOUT, Result, Tag, TestCase};

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_login_with_injected_session() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(&settings, "Login success", &[Tag::Smoke, Tag::Auth])
    else {
        return Ok(());
    };
    let (harness, session) = match common::signed_in(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome: Result<()> = async {
        let dashboard = DashboardPage::new(session.base());
        case.step(session.page(), "Open dashboard", dashboard.navigate())
            .await?;
        let loaded = dashboard.is_loaded().await?;
        case.ensure(session.page(), "Dashboard is loaded", loaded, "dashboard not loaded")
            .await?;
        let heading = dashboard.base().becomes_visible("h1, h2", CHECK_TIMEOUT).await?;
        case.ensure(
            session.page(),
            "Dashboard content is visible",
            heading,
            "no heading on the dashboard",
        )
        .await?;
        case.attach_screenshot(session.page(), "Dashboard").await?;
        Ok(())
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_logout_from_injected_session() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) =
        TestCase::begin(&settings, "Logout success", &[Tag::Auth, Tag::Regression])
    else {
        return Ok(());
    };
    let (harness, session) = match common::signed_in(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let dashboard = DashboardPage::new(session.base());
        case.step(session.page(), "Open dashboard", dashboard.navigate())
            .await?;
        let auth_page = case
            .step(session.page(), "Log out", dashboard.logout())
            .await?;
        let loaded = auth_page.is_loaded().await?;
        case.ensure(
            session.page(),
            "Authentication page is shown",
            loaded,
            format!("authentication page not loaded, URL: {}", session.page().url()),
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_login_invalid_data() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let cases = data::invalid_login_cases(&settings);
    let mut failures = Vec::new();

    for login_case in cases {
        let title = format!("Invalid login: {}", login_case.id);
        let Some(mut case) = TestCase::begin(&settings, title, &[Tag::Auth, Tag::Regression])
        else {
            continue;
        };
        let (harness, session) = match common::anonymous(settings.clone()).await {
            Ok(fixture) => fixture,
            Err(e) => return case.finish(Err(e)),
        };

        let outcome: Result<()> = async {
            let auth_page = AuthenticationPage::new(session.base());
            case.step(session.page(), "Open authentication page", auth_page.navigate())
                .await?;
            case.step(session.page(), "Submit credentials", async {
                auth_page.fill_email(&login_case.email).await?;
                auth_page.fill_password(&login_case.password).await?;
                auth_page.submit_invalid_login().await
            })
            .await?;
            let shown = auth_page.is_error_visible().await?;
            case.ensure(session.page(), "Error message is shown", shown, "no error message")
                .await?;
            case.attach_screenshot(session.page(), &format!("Error {}", login_case.id))
                .await?;
            Ok(())
        }
        .await;

        if let Err(e) = common::finish(case, harness, session, outcome).await {
            failures.push(format!("{}: {}", login_case.id, e));
        }
    }

    assert!(failures.is_empty(), "Invalid-login cases failed: {:?}", failures);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_authentication_form_displayed() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) =
        TestCase::begin(&settings, "Authentication form", &[Tag::Auth, Tag::Regression])
    else {
        return Ok(());
    };
    let (harness, session) = match common::anonymous(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let auth_page = AuthenticationPage::new(session.base());
        case.step(session.page(), "Open authentication page", auth_page.navigate())
            .await?;

        let form = auth_page.is_form_visible().await?;
        case.ensure(session.page(), "Form container is visible", form, "form not visible")
            .await?;
        let fields = auth_page.are_fields_visible().await?;
        case.ensure(session.page(), "Fields are visible", fields, "form fields not visible")
            .await?;

        let email_type = auth_page.email_field_type().await?;
        case.ensure(
            session.page(),
            "Email field type",
            email_type.as_deref() == Some("email"),
            format!("email field type is {:?}", email_type),
        )
        .await?;
        let password_type = auth_page.password_field_type().await?;
        case.ensure(
            session.page(),
            "Password field type",
            password_type.as_deref() == Some("password"),
            format!("password field type is {:?}", password_type),
        )
        .await?;
        let button = auth_page.submit_button_text().await?;
        case.ensure(
            session.page(),
            "Submit button reads 'Sign In'",
            button == "Sign In",
            format!("button reads '{}'", button),
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_login_after_ten_failed_attempts() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(
        &settings,
        "Login after ten failed attempts",
        &[Tag::Auth, Tag::Regression],
    ) else {
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
        case.step(session.page(), "Open authentication page", auth_page.navigate())
            .await?;

        for attempt in 1..=10 {
            let text = case
                .step(session.page(), &format!("Failed attempt {}", attempt), async {
                    auth_page.fill_email(&email).await?;
                    auth_page.fill_password("wrongpass").await?;
                    auth_page.submit_invalid_login().await
                })
                .await?;
            tracing::info!("Attempt {} refused: {}", attempt, text);
        }

        let dashboard = case
            .step(session.page(), "Login with valid credentials", auth_page.login(&email, &password))
            .await?;
        let loaded = dashboard.is_loaded().await?;
        case.ensure(
            session.page(),
            "Dashboard is loaded",
            loaded,
            format!("dashboard not loaded, URL: {}", session.page().url()),
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_form_displayed() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(&settings, "Sign-up form", &[Tag::Auth, Tag::Regression])
    else {
        return Ok(());
    };
    let (harness, session) = match common::anonymous(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let auth_page = AuthenticationPage::new(session.base());
        case.step(session.page(), "Open authentication page", auth_page.navigate())
            .await?;
        case.step(session.page(), "Open sign-up form", auth_page.open_signup_form())
            .await?;
        let header = auth_page.is_signup_header_visible().await?;
        case.ensure(session.page(), "'Sign Up' header is visible", header, "no 'Sign Up' header")
            .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_empty_fields() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) =
        TestCase::begin(&settings, "Sign-up with empty fields", &[Tag::Auth, Tag::Regression])
    else {
        return Ok(());
    };
    let (harness, session) = match common::anonymous(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let auth_page = AuthenticationPage::new(session.base());
        case.step(session.page(), "Open authentication page", auth_page.navigate())
            .await?;
        case.step(session.page(), "Submit empty sign-up form", async {
            auth_page.open_signup_form().await?;
            auth_page.fill_signup(&SignupForm::empty()).await?;
            auth_page.submit_signup().await
        })
        .await?;
        let text = case
            .step(session.page(), "Read error message", auth_page.signup_error_text())
            .await?;
        case.ensure(
            session.page(),
            "Error asks for all fields",
            text.contains("All fields are required"),
            format!("got '{}'", text),
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

/// Signs up with `form` and checks whether the dashboard was reached.
async fn signup_case(title: &str, form: SignupForm, expect_dashboard: bool) -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(&settings, title, &[Tag::Auth, Tag::Regression]) else {
        return Ok(());
    };
    let (harness, session) = match common::anonymous(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let outcome = async {
        let auth_page = AuthenticationPage::new(session.base());
        case.step(session.page(), "Open authentication page", auth_page.navigate())
            .await?;
        case.step(session.page(), "Sign up", auth_page.signup(&form, expect_dashboard))
            .await?;

        let dashboard = DashboardPage::new(session.base());
        let on_dashboard = dashboard.is_loaded().await?;
        let message = if expect_dashboard {
            format!("dashboard not loaded after sign-up, URL: {}", session.page().url())
        } else {
            format!("unexpected redirect to {}", session.page().url())
        };
        case.ensure(
            session.page(),
            if expect_dashboard {
                "Dashboard is loaded"
            } else {
                "Still on the sign-up form"
            },
            on_dashboard == expect_dashboard,
            message,
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_success() -> Result<()> {
    signup_case("Sign-up success", SignupForm::random(), true).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_long_name() -> Result<()> {
    let form = SignupForm {
        name: data::random_name(100),
        ..SignupForm::random()
    };
    signup_case("Sign-up with a long name", form, true).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_phone_with_letters() -> Result<()> {
    let form = SignupForm {
        phone: "89abcdefghi".to_string(),
        ..SignupForm::random()
    };
    signup_case("Sign-up with letters in the phone", form, false).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_long_phone() -> Result<()> {
    let form = SignupForm {
        phone: format!("89{}", "1".repeat(10)),
        ..SignupForm::random()
    };
    signup_case("Sign-up with a long phone", form, false).await
}

#[tokio::test]
#[ignore = "requires a running ProjectM deployment (BASE_URL)"]
async fn test_signup_password_mismatch() -> Result<()> {
    common::init_tracing();
    let settings = common::live_settings();
    let Some(mut case) = TestCase::begin(
        &settings,
        "Sign-up with mismatched passwords",
        &[Tag::Auth, Tag::Regression],
    ) else {
        return Ok(());
    };
    let (harness, session) = match common::anonymous(settings).await {
        Ok(fixture) => fixture,
        Err(e) => return case.finish(Err(e)),
    };

    let form = SignupForm {
        confirm_password: "different_password".to_string(),
        ..SignupForm::random()
    };

    let outcome = async {
        let auth_page = AuthenticationPage::new(session.base());
        case.step(session.page(), "Open authentication page", auth_page.navigate())
            .await?;
        case.step(session.page(), "Sign up", auth_page.signup(&form, false))
            .await?;
        let text = case
            .step(session.page(), "Read error message", auth_page.signup_error_text())
            .await?;
        case.ensure(
            session.page(),
            "Error reports the mismatch",
            text.contains("Passwords do not match"),
            format!("got '{}'", text),
        )
        .await
    }
    .await;

    common::finish(case, harness, session, outcome).await
}
