// Shared fixtures for the integration tests
//
// Each test binary compiles this module separately, so helpers look unused
// from the point of view of any single binary.
#![allow(dead_code)]

use projectm_e2e::{auth, Harness, Result, Session, Settings, TestCase};
use std::collections::HashMap;
use std::path::Path;

pub fn init_tracing() {
    projectm_e2e::init_tracing();
}

/// Settings of the live deployment under test (`.env` / environment)
pub fn live_settings() -> Settings {
    Settings::load().expect("Failed to load settings (BASE_URL must be set)")
}

/// Settings pointing at a local server, writing artifacts into `artifacts`
pub fn local_settings(base_url: &str, email: &str, password: &str, artifacts: &Path) -> Settings {
    let mut vars = HashMap::new();
    vars.insert("BASE_URL", base_url.to_string());
    vars.insert("EMAIL", email.to_string());
    vars.insert("PASSWORD", password.to_string());
    vars.insert("E2E_ARTIFACTS_DIR", artifacts.display().to_string());
    Settings::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build local settings")
}

/// Browser plus an anonymous session
pub async fn anonymous(settings: Settings) -> Result<(Harness, Session)> {
    let harness = Harness::launch(settings).await?;
    let session = harness.new_session().await?;
    Ok((harness, session))
}

/// Browser plus a session signed in with the configured account
pub async fn signed_in(settings: Settings) -> Result<(Harness, Session)> {
    let harness = Harness::launch(settings).await?;
    let session = auth::authenticated_session(&harness).await?;
    Ok((harness, session))
}

/// Attaches the session logs, tears everything down and writes the report.
///
/// Teardown problems are logged; the returned result is the test's own.
pub async fn finish(
    mut case: TestCase,
    harness: Harness,
    session: Session,
    outcome: Result<()>,
) -> Result<()> {
    if let Err(e) = session.attach_logs(&mut case).await {
        tracing::warn!("Could not attach logs: {}", e);
    }
    if let Err(e) = session.close().await {
        tracing::warn!("Could not close session: {}", e);
    }
    if let Err(e) = harness.close().await {
        tracing::warn!("Could not close browser: {}", e);
    }
    case.finish(outcome)
}
