// Error types for the ProjectM end-to-end suite

use thiserror::Error;

/// Result type alias for suite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by fixtures, page objects and reporting
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is absent from both `.env` and the environment
    #[error("Missing setting {0}. Set it in the environment or in a .env file.")]
    MissingSetting(&'static str),

    /// A setting is present but cannot be parsed
    #[error("Invalid setting {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },

    /// Error reported by the browser driver
    #[error("Browser driver error: {0}")]
    Driver(#[from] playwright_rs::Error),

    /// HTTP failure talking to the application API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The login endpoint answered, but refused the credentials
    ///
    /// Carries the `error` field of the response body when there is one.
    #[error("Login rejected by {url} with status {status}: {message}")]
    LoginRejected {
        url: String,
        status: u16,
        message: String,
    },

    /// A wait ran out of time
    #[error("Timeout after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    /// A check on the UI state did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error (artifacts, reports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// True when the error is a wait that ran out of time, at any context depth.
    ///
    /// Driver-side assertion and navigation timeouts count as well.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Driver(
                playwright_rs::Error::Timeout(_)
                | playwright_rs::Error::AssertionTimeout(_)
                | playwright_rs::Error::NavigationTimeout { .. },
            ) => true,
            Error::Context(_, inner) => inner.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_timeout_kind() {
        let err = Error::Timeout {
            what: "selector '#email'".into(),
            timeout_ms: 1000,
        }
        .context("Failed to fill email");

        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Failed to fill email: Timeout after 1000ms waiting for selector '#email'"
        );
    }

    #[test]
    fn test_assertion_is_not_timeout() {
        assert!(!Error::Assertion("dashboard not loaded".into()).is_timeout());
    }

    #[test]
    fn test_driver_assertion_timeout_counts_as_timeout() {
        let err = Error::from(playwright_rs::Error::AssertionTimeout("#btn".into()));
        assert!(err.is_timeout());
    }
}
