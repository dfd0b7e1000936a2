// Suite settings
//
// Target URLs, credentials and run options, read from a `.env` file and the
// process environment. Environment variables win over `.env` entries.

use crate::error::{Error, Result};
use crate::report::Tag;
use std::path::PathBuf;
use url::Url;

/// Default directory for screenshots, HTML dumps and result files
pub const DEFAULT_ARTIFACTS_DIR: &str = "target/e2e-artifacts";

/// Settings for one suite run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Frontend base URL, without trailing slash (e.g. `http://localhost:3000`)
    pub base_url: String,
    /// API base URL, without trailing slash. Defaults to `base_url`.
    pub api_url: String,
    /// Account used by authenticated flows
    pub email: String,
    pub password: String,
    /// Run Chromium without a window
    pub headless: bool,
    /// Slow down every driver operation by this many milliseconds
    pub slow_mo_ms: Option<f64>,
    /// Where report artifacts are written
    pub artifacts_dir: PathBuf,
    /// Only run cases carrying one of these tags (empty = run everything)
    pub tags: Vec<Tag>,
}

impl Settings {
    /// Loads settings from `.env` (if present) and the environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded settings file {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let base_url = get("BASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingSetting("BASE_URL"))?;
        let base_url = normalize_url("BASE_URL", &base_url)?;

        let api_url = match get("API_URL").filter(|v| !v.is_empty()) {
            Some(api) => normalize_url("API_URL", &api)?,
            None => base_url.clone(),
        };

        let headless = match get("HEADLESS") {
            Some(raw) if !raw.is_empty() => parse_bool("HEADLESS", &raw)?,
            _ => true,
        };

        let slow_mo_ms = match get("SLOW_MO_MS").filter(|v| !v.is_empty()) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|e| Error::InvalidSetting {
                name: "SLOW_MO_MS",
                message: format!("'{}' is not a number ({})", raw, e),
            })?),
            None => None,
        };

        let artifacts_dir = get("E2E_ARTIFACTS_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));

        let tags = match get("E2E_TAGS") {
            Some(raw) => parse_tags(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            base_url,
            api_url,
            email: get("EMAIL").unwrap_or_default(),
            password: lookup("PASSWORD").unwrap_or_default(),
            headless,
            slow_mo_ms,
            artifacts_dir,
            tags,
        })
    }

    /// Absolute frontend URL for `path` (`/dashboard` → `{BASE_URL}/dashboard`)
    pub fn url(&self, path: &str) -> String {
        join(&self.base_url, path)
    }

    /// Absolute API URL for `path` (`/api/auth/login` → `{API_URL}/api/auth/login`)
    pub fn api_url(&self, path: &str) -> String {
        join(&self.api_url, path)
    }

    /// Scheme, host and port of the frontend, as used for localStorage origins
    pub fn origin(&self) -> Result<String> {
        let url = Url::parse(&self.base_url)?;
        Ok(url.origin().ascii_serialization())
    }

    /// Host of the API, as used for cookie domains
    pub fn api_host(&self) -> Result<String> {
        let url = Url::parse(&self.api_url)?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidSetting {
                name: "API_URL",
                message: format!("'{}' has no host", self.api_url),
            })
    }

    /// True when both credentials are configured
    pub fn has_credentials(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

fn normalize_url(name: &'static str, raw: &str) -> Result<String> {
    Url::parse(raw).map_err(|e| Error::InvalidSetting {
        name,
        message: format!("'{}' is not a URL ({})", raw, e),
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidSetting {
            name,
            message: format!("'{}' is not a boolean", raw),
        }),
    }
}

fn parse_tags(raw: &str) -> Result<Vec<Tag>> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<Tag>().map_err(|message| Error::InvalidSetting {
                name: "E2E_TAGS",
                message,
            })
        })
        .collect()
}

fn join(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
