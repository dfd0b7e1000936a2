// Authentication page - sign in and sign up at /authentication
//
// Login submits the form and then watches for either outcome: the redirect
// to /dashboard, or the red error banner.

use super::{BasePage, DashboardPage, PageObject};
use crate::data::SignupForm;
use crate::error::{Error, Result};
use crate::{AUTH_TIMEOUT, CHECK_TIMEOUT};
use async_trait::async_trait;

const EMAIL_INPUT: &str = "#email";
const PASSWORD_INPUT: &str = "#password";
const SUBMIT_BUTTON: &str = "button[type='submit']";
const FORM: &str = "form.mt-6.space-y-4";
const ERROR_BANNER: &str = "div.text-red-500";

const SIGNUP_TOGGLE: &str = "span:has-text('Sign Up')";
const SIGNUP_HEADER: &str = "h2:has-text('Sign Up')";
const NAME_INPUT: &str = "#name";
const PHONE_INPUT: &str = "#phone";
const CONFIRM_PASSWORD_INPUT: &str = "#confirmPassword";
/// Sign-up errors render in a paragraph, unlike the sign-in banner
const SIGNUP_ERROR: &str = "p.text-red-500";

enum LoginOutcome {
    Dashboard,
    Rejected(String),
}

pub struct AuthenticationPage {
    base: BasePage,
}

impl AuthenticationPage {
    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn url(&self) -> String {
        self.base.url_for("/authentication")
    }

    pub async fn navigate(&self) -> Result<()> {
        self.base.navigate_with_timeout(&self.url(), AUTH_TIMEOUT).await
    }

    /// Logs out first when the page is still on the dashboard.
    pub async fn ensure_logged_out(&self) -> Result<()> {
        if self.base.current_url().to_lowercase().contains("dashboard") {
            tracing::info!("Still signed in, logging out");
            let logout = self.base.url_for("/logout");
            self.base.navigate_with_timeout(&logout, AUTH_TIMEOUT).await?;
            self.navigate().await?;
            tracing::info!("URL after logout: {}", self.base.current_url());
        }
        Ok(())
    }

    pub async fn fill_email(&self, email: &str) -> Result<()> {
        self.base.fill(EMAIL_INPUT, email, AUTH_TIMEOUT).await?;
        tracing::info!("Email filled: {}", email);
        Ok(())
    }

    pub async fn fill_password(&self, password: &str) -> Result<()> {
        self.base.fill(PASSWORD_INPUT, password, AUTH_TIMEOUT).await?;
        tracing::info!("Password filled");
        Ok(())
    }

    /// Submits the form and waits for the dashboard.
    ///
    /// If the credentials banner shows up instead, `login_error` is captured
    /// and the login fails with an assertion error.
    pub async fn submit_login(&self) -> Result<DashboardPage> {
        self.base.click(SUBMIT_BUTTON, AUTH_TIMEOUT).await?;

        let dashboard_url = self.base.url_for("/dashboard");
        let expected = dashboard_url.as_str();
        let base = &self.base;

        let outcome = base
            .poll_until("dashboard redirect after login", AUTH_TIMEOUT, || async move {
                if base.current_url().trim_end_matches('/') == expected {
                    return Ok(Some(LoginOutcome::Dashboard));
                }
                if base.is_visible(ERROR_BANNER).await? {
                    let text = base.text_of(ERROR_BANNER, CHECK_TIMEOUT).await?;
                    return Ok(Some(LoginOutcome::Rejected(text)));
                }
                Ok(None)
            })
            .await;

        match outcome {
            Ok(LoginOutcome::Dashboard) => {
                tracing::info!("Login succeeded, URL: {}", self.base.current_url());
                Ok(DashboardPage::new(self.base.clone()))
            }
            Ok(LoginOutcome::Rejected(text)) => {
                self.base.capture("login_error").await;
                Err(Error::Assertion(format!("Login failed, page shows '{}'", text)))
            }
            Err(e) => {
                self.base.capture("login_error").await;
                Err(e)
            }
        }
    }

    /// Submits credentials expected to be refused and returns the banner text.
    pub async fn submit_invalid_login(&self) -> Result<String> {
        self.base.click(SUBMIT_BUTTON, AUTH_TIMEOUT).await?;
        let text = self.error_text().await?;
        tracing::info!("Login refused with: {}", text);
        Ok(text)
    }

    /// Full flow: open the page, log out if needed, fill and submit.
    pub async fn login(&self, email: &str, password: &str) -> Result<DashboardPage> {
        self.navigate().await?;
        self.ensure_logged_out().await?;
        self.fill_email(email).await?;
        self.fill_password(password).await?;
        self.submit_login().await
    }

    /// Text of the error banner, once it is visible
    pub async fn error_text(&self) -> Result<String> {
        self.base.text_of(ERROR_BANNER, CHECK_TIMEOUT).await
    }

    pub async fn is_error_visible(&self) -> Result<bool> {
        self.base.becomes_visible(ERROR_BANNER, CHECK_TIMEOUT).await
    }

    pub async fn is_form_visible(&self) -> Result<bool> {
        self.base.becomes_visible(FORM, CHECK_TIMEOUT).await
    }

    /// Whether the email, password and submit controls are all visible
    pub async fn are_fields_visible(&self) -> Result<bool> {
        for selector in [EMAIL_INPUT, PASSWORD_INPUT, SUBMIT_BUTTON] {
            if !self.base.becomes_visible(selector, CHECK_TIMEOUT).await? {
                tracing::warn!("'{}' is not visible", selector);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `type` attribute of the email input
    pub async fn email_field_type(&self) -> Result<Option<String>> {
        self.field_type(EMAIL_INPUT).await
    }

    /// `type` attribute of the password input
    pub async fn password_field_type(&self) -> Result<Option<String>> {
        self.field_type(PASSWORD_INPUT).await
    }

    pub async fn field_type(&self, selector: &str) -> Result<Option<String>> {
        let field = self.base.wait_for_selector(selector, CHECK_TIMEOUT).await?;
        Ok(field.get_attribute("type").await?)
    }

    pub async fn submit_button_text(&self) -> Result<String> {
        self.base.text_of(SUBMIT_BUTTON, CHECK_TIMEOUT).await
    }

    /// Switches the form to sign-up mode.
    pub async fn open_signup_form(&self) -> Result<()> {
        self.base.click(SIGNUP_TOGGLE, AUTH_TIMEOUT).await?;
        self.base.wait_for_selector(SIGNUP_HEADER, CHECK_TIMEOUT).await?;
        tracing::info!("Sign-up form opened");
        Ok(())
    }

    pub async fn is_signup_header_visible(&self) -> Result<bool> {
        self.base.becomes_visible(SIGNUP_HEADER, CHECK_TIMEOUT).await
    }

    pub async fn fill_signup(&self, form: &SignupForm) -> Result<()> {
        let fields = [
            (NAME_INPUT, form.name.as_str()),
            (EMAIL_INPUT, form.email.as_str()),
            (PHONE_INPUT, form.phone.as_str()),
            (PASSWORD_INPUT, form.password.as_str()),
            (CONFIRM_PASSWORD_INPUT, form.confirm_password.as_str()),
        ];
        for (selector, value) in fields {
            self.base.fill(selector, value, CHECK_TIMEOUT).await?;
        }
        tracing::info!("Sign-up form filled for {}", form.email);
        Ok(())
    }

    pub async fn submit_signup(&self) -> Result<()> {
        self.base.click(SUBMIT_BUTTON, CHECK_TIMEOUT).await
    }

    /// Opens the sign-up form, fills and submits it.
    ///
    /// With `expect_success` the call waits for the dashboard redirect.
    pub async fn signup(&self, form: &SignupForm, expect_success: bool) -> Result<()> {
        self.open_signup_form().await?;
        self.fill_signup(form).await?;
        self.submit_signup().await?;

        if expect_success {
            let dashboard = self.base.url_for("/dashboard");
            self.base
                .capture_on_error("signup_error", self.base.wait_for_url(&dashboard, AUTH_TIMEOUT))
                .await?;
            tracing::info!("Signed up as {}", form.email);
        }
        Ok(())
    }

    pub async fn signup_error_text(&self) -> Result<String> {
        self.base.text_of(SIGNUP_ERROR, CHECK_TIMEOUT).await
    }
}

#[async_trait]
impl PageObject for AuthenticationPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    /// Email input is visible
    async fn is_loaded(&self) -> Result<bool> {
        self.base.becomes_visible(EMAIL_INPUT, CHECK_TIMEOUT).await
    }
}
