//! projectm-e2e: browser-driven end-to-end suite for the ProjectM web app
//!
//! Page objects wrap the screens of the application (authentication,
//! dashboard, project board, tasks, members, messages) on top of the
//! Playwright driver. Fixtures bootstrap browser sessions, either anonymous or
//! already signed in through the login API, and every test records its steps
//! and failure artifacts through [`report::TestCase`].
//!
//! # Example
//!
//! ```ignore
//! use projectm_e2e::{auth, Harness, Settings, Tag, TestCase};
//! use projectm_e2e::pages::{DashboardPage, PageObject};
//!
//! #[tokio::test]
//! #[ignore = "requires a running ProjectM deployment (BASE_URL)"]
//! async fn dashboard_loads() -> projectm_e2e::Result<()> {
//!     let settings = Settings::load()?;
//!     let Some(mut case) = TestCase::begin(&settings, "Dashboard loads", &[Tag::Smoke]) else {
//!         return Ok(());
//!     };
//!
//!     let harness = Harness::launch(settings).await?;
//!     let session = auth::authenticated_session(&harness).await?;
//!     let dashboard = DashboardPage::new(session.base());
//!
//!     let loaded = dashboard.is_loaded().await?;
//!     let outcome = case
//!         .ensure(session.page(), "Dashboard is loaded", loaded, "dashboard did not load")
//!         .await;
//!
//!     session.close().await?;
//!     harness.close().await?;
//!     case.finish(outcome)
//! }
//! ```
//!
//! # Configuration
//!
//! Settings come from a `.env` file and the environment, see [`Settings`].
//! Live tests are `#[ignore]`d; run them with
//! `cargo test -p projectm-e2e -- --ignored --test-threads=1` or
//! `cargo xtask e2e`.

pub mod auth;
pub mod browser;
pub mod data;
pub mod error;
pub mod logging;
pub mod page_log;
pub mod pages;
pub mod report;
pub mod settings;

pub use browser::{Harness, Session};
pub use error::{Error, Result};
pub use logging::init_tracing;
pub use page_log::PageLog;
pub use report::{Tag, TestCase};
pub use settings::Settings;

use std::time::Duration;

/// Waits on the login and signup flows (the app can be slow to build routes)
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Waits on dashboard navigation and the profile menu
pub const DASHBOARD_TIMEOUT: Duration = Duration::from_secs(60);

/// Waits inside modals (project and task forms)
pub const MODAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Waits for state checks (`is_loaded`, visibility checks)
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(10);
