// Authenticated sessions
//
// The fast path logs in through the API and starts a browser context with the
// returned cookies and localStorage already in place. When the application
// does not honour the injected state (the access token normally lives only in
// client memory), the session is built by logging in through the UI instead.

use crate::browser::{Harness, Session};
use crate::error::{Error, Result};
use crate::pages::{AuthenticationPage, DashboardPage};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use playwright_rs::{BrowserContextOptions, Cookie, LocalStorageItem, Origin, StorageState};
use reqwest::header::SET_COOKIE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Login endpoint of the ProjectM API
pub const LOGIN_PATH: &str = "/api/auth/login";

/// localStorage key holding the access token
pub const TOKEN_STORAGE_KEY: &str = "token";

/// localStorage key holding the serialized user
pub const USER_STORAGE_KEY: &str = "user";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Value,
}

/// A cookie set by the API, as parsed from a `Set-Cookie` header
#[derive(Debug, Clone, PartialEq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub max_age: Option<i64>,
    /// `Expires` attribute as a Unix timestamp
    pub expires: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<String>,
}

impl SetCookie {
    /// Browser cookie for injection; `default_domain` applies when the
    /// header named none. `Max-Age` wins over `Expires`.
    pub fn to_browser_cookie(&self, default_domain: &str, now: DateTime<Utc>) -> Cookie {
        let expires = match (self.max_age, self.expires) {
            (Some(max_age), _) => (now.timestamp() + max_age) as f64,
            (None, Some(at)) => at as f64,
            (None, None) => -1.0,
        };
        Cookie {
            name: self.name.clone(),
            value: self.value.clone(),
            domain: self
                .domain
                .clone()
                .unwrap_or_else(|| default_domain.to_string()),
            path: self.path.clone().unwrap_or_else(|| "/".to_string()),
            expires,
            http_only: self.http_only,
            secure: self.secure,
            same_site: self.same_site.clone(),
        }
    }
}

/// Parses one `Set-Cookie` header value.
///
/// Returns `None` when the header has no `name=value` pair.
pub fn parse_set_cookie(header: &str) -> Option<SetCookie> {
    let mut parts = header.split(';').map(str::trim);
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = SetCookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: None,
        path: None,
        max_age: None,
        expires: None,
        http_only: false,
        secure: false,
        same_site: None,
    };

    for attribute in parts {
        let (key, val) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (attribute, None),
        };
        match (key.to_ascii_lowercase().as_str(), val) {
            ("domain", Some(v)) if !v.is_empty() => cookie.domain = Some(v.to_string()),
            ("path", Some(v)) if !v.is_empty() => cookie.path = Some(v.to_string()),
            ("max-age", Some(v)) => cookie.max_age = v.parse().ok(),
            ("expires", Some(v)) => {
                cookie.expires = DateTime::parse_from_rfc2822(v).ok().map(|d| d.timestamp())
            }
            ("httponly", _) => cookie.http_only = true,
            ("secure", _) => cookie.secure = true,
            ("samesite", Some(v)) => cookie.same_site = normalize_same_site(v),
            _ => {}
        }
    }
    Some(cookie)
}

fn normalize_same_site(raw: &str) -> Option<String> {
    match raw.to_ascii_lowercase().as_str() {
        "strict" => Some("Strict".to_string()),
        "lax" => Some("Lax".to_string()),
        "none" => Some("None".to_string()),
        _ => None,
    }
}

/// Result of a successful API login
#[derive(Debug, Clone)]
pub struct ApiLogin {
    pub token: String,
    pub user: Value,
    pub cookies: Vec<SetCookie>,
}

/// Minimal client for the ProjectM auth API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Client for the API rooted at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api_url.clone())
    }

    /// `POST /api/auth/login` with the given credentials.
    ///
    /// A non-2xx answer becomes [`Error::LoginRejected`] carrying the `error`
    /// field of the body.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiLogin> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        tracing::info!("API login as {} via {}", email, url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let cookies: Vec<SetCookie> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(parse_set_cookie)
            .collect();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .or_else(|| status.canonical_reason())
                .unwrap_or("unknown error")
                .to_string();
            tracing::warn!("API login rejected with {}: {}", status, message);
            return Err(Error::LoginRejected {
                url,
                status: status.as_u16(),
                message,
            });
        }

        let body: LoginResponse = response.json().await?;
        tracing::info!("API login succeeded ({} cookies)", cookies.len());
        Ok(ApiLogin {
            token: body.token,
            user: body.user,
            cookies,
        })
    }
}

/// Storage state carrying an API login into a new browser context.
///
/// Cookies default to `api_host` as their domain; the token and user are
/// stored in localStorage for `app_origin`.
pub fn storage_state_for(login: &ApiLogin, app_origin: &str, api_host: &str) -> Result<StorageState> {
    storage_state_at(login, app_origin, api_host, Utc::now())
}

fn storage_state_at(
    login: &ApiLogin,
    app_origin: &str,
    api_host: &str,
    now: DateTime<Utc>,
) -> Result<StorageState> {
    let cookies = login
        .cookies
        .iter()
        .map(|c| c.to_browser_cookie(api_host, now))
        .collect();

    let local_storage = vec![
        LocalStorageItem {
            name: TOKEN_STORAGE_KEY.to_string(),
            value: login.token.clone(),
        },
        LocalStorageItem {
            name: USER_STORAGE_KEY.to_string(),
            value: serde_json::to_string(&login.user)?,
        },
    ];

    Ok(StorageState {
        cookies,
        origins: vec![Origin {
            origin: app_origin.to_string(),
            local_storage,
        }],
    })
}

/// A session already signed in with the configured account.
///
/// Tries the API login with injected state first, then the UI login form.
pub async fn authenticated_session(harness: &Harness) -> Result<Session> {
    let settings = harness.settings();
    if settings.email.is_empty() {
        return Err(Error::MissingSetting("EMAIL"));
    }
    if settings.password.is_empty() {
        return Err(Error::MissingSetting("PASSWORD"));
    }

    match api_session(harness).await {
        Ok(session) => {
            tracing::info!("Authenticated through API login");
            return Ok(session);
        }
        Err(e) => tracing::warn!("API session not usable, falling back to UI login: {}", e),
    }

    ui_session(harness)
        .await
        .map_err(|e| e.context("UI login fallback failed"))
}

/// API login, state injection, then a check for the signed-in layout.
pub async fn api_session(harness: &Harness) -> Result<Session> {
    let settings = harness.settings();
    let login = ApiClient::from_settings(settings)?
        .login(&settings.email, &settings.password)
        .await?;
    let state = storage_state_for(&login, &settings.origin()?, &settings.api_host()?)?;

    let options = BrowserContextOptions::builder().storage_state(state).build();
    let session = harness.new_session_with_options(options).await?;

    let dashboard = DashboardPage::new(session.base());
    let outcome = match dashboard.navigate().await {
        Ok(()) => dashboard.is_signed_in().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(true) => Ok(session),
        Ok(false) => {
            let landed = session.page().url();
            session.close().await?;
            Err(Error::Assertion(format!(
                "injected session was not accepted, {} shows no signed-in layout",
                landed
            )))
        }
        Err(e) => {
            if let Err(close_err) = session.close().await {
                tracing::warn!("Could not close rejected session: {}", close_err);
            }
            Err(e)
        }
    }
}

/// Fresh session logged in through the authentication form.
pub async fn ui_session(harness: &Harness) -> Result<Session> {
    let settings = harness.settings();
    let session = harness.new_session().await?;
    let auth = AuthenticationPage::new(session.base());

    match auth.login(&settings.email, &settings.password).await {
        Ok(_) => {
            tracing::info!("Authenticated through UI login");
            Ok(session)
        }
        Err(e) => {
            if let Err(close_err) = session.close().await {
                tracing::warn!("Could not close failed session: {}", close_err);
            }
            Err(e)
        }
    }
}
