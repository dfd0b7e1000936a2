// Test reporting - steps, attachments and result files
//
// Every test case records its steps and the artifacts captured along the way
// (screenshots, HTML dumps, console/network logs). When the case finishes a
// `result.json` is written next to the artifacts:
//
//   <artifacts>/<case slug>/result.json
//   <artifacts>/<case slug>/01_open_dashboard.png
//   ...
//
// Failing steps follow one convention: log, capture a screenshot and the page
// HTML, then hand the original error back to the caller.

use crate::error::{Error, Result};
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use playwright_rs::Page;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::Instrument;

/// Name of the per-case result file
pub const RESULT_FILE: &str = "result.json";

/// Labels used to select subsets of the suite (`E2E_TAGS=smoke,auth`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Smoke,
    Regression,
    Auth,
    Authentication,
    Homepage,
    Logout,
    Navigation,
    Projects,
    Tasks,
    Members,
    Messages,
    Settings,
}

impl Tag {
    pub const ALL: [Tag; 12] = [
        Tag::Smoke,
        Tag::Regression,
        Tag::Auth,
        Tag::Authentication,
        Tag::Homepage,
        Tag::Logout,
        Tag::Navigation,
        Tag::Projects,
        Tag::Tasks,
        Tag::Members,
        Tag::Messages,
        Tag::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Smoke => "smoke",
            Tag::Regression => "regression",
            Tag::Auth => "auth",
            Tag::Authentication => "authentication",
            Tag::Homepage => "homepage",
            Tag::Logout => "logout",
            Tag::Navigation => "navigation",
            Tag::Projects => "projects",
            Tag::Tasks => "tasks",
            Tag::Members => "members",
            Tag::Messages => "messages",
            Tag::Settings => "settings",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| format!("unknown tag '{}'", s.trim()))
    }
}

/// Outcome of a step or a whole case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    /// A check on the application did not hold
    Failed,
    /// The case could not run to its checks (timeouts, driver or HTTP errors)
    Broken,
}

impl Status {
    fn of_error(err: &Error) -> Self {
        match err {
            Error::Assertion(_) => Status::Failed,
            Error::Context(_, inner) => Status::of_error(inner),
            _ => Status::Broken,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Png,
    Html,
    Text,
}

impl AttachmentKind {
    pub fn extension(&self) -> &'static str {
        match self {
            AttachmentKind::Png => "png",
            AttachmentKind::Html => "html",
            AttachmentKind::Text => "txt",
        }
    }
}

/// A file captured during a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub kind: AttachmentKind,
    /// File name relative to the case directory
    pub file: String,
    /// Step that was running when the attachment was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: Status,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Contents of `result.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<Tag>,
    pub status: Status,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub steps: Vec<StepRecord>,
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseResult {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Loads every `<dir>/*/result.json`, sorted by title.
    pub fn load_all(dir: &Path) -> Result<Vec<Self>> {
        let mut results = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path().join(RESULT_FILE);
            if path.is_file() {
                results.push(Self::load(&path)?);
            }
        }
        results.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(results)
    }
}

/// Empties `dir` so `CaseResult::load_all` only sees the next run.
///
/// Creates the directory when it does not exist yet.
pub fn clear_results(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Counts per status over a set of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub broken: usize,
}

impl Summary {
    pub fn of(results: &[CaseResult]) -> Self {
        results.iter().fold(Summary::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                Status::Passed => acc.passed += 1,
                Status::Failed => acc.failed += 1,
                Status::Broken => acc.broken += 1,
            }
            acc
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.broken == 0
    }
}

/// True when a case with `tags` should run under `filter` (empty filter = all)
pub fn is_selected(filter: &[Tag], tags: &[Tag]) -> bool {
    filter.is_empty() || tags.iter().any(|t| filter.contains(t))
}

/// Filesystem-friendly form of a title
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "case".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A running test case
pub struct TestCase {
    title: String,
    description: Option<String>,
    tags: Vec<Tag>,
    dir: PathBuf,
    started: Instant,
    started_at: DateTime<Utc>,
    steps: Vec<StepRecord>,
    attachments: Vec<Attachment>,
    current_step: Option<String>,
}

impl TestCase {
    /// Starts a case, or returns `None` when the tag filter excludes it.
    pub fn begin(settings: &Settings, title: impl Into<String>, tags: &[Tag]) -> Option<Self> {
        let title = title.into();
        if !is_selected(&settings.tags, tags) {
            tracing::info!(
                "Skipping '{}': tags {:?} not in filter {:?}",
                title,
                tags,
                settings.tags
            );
            return None;
        }
        tracing::info!("=== {} ===", title);
        Some(Self::new(&settings.artifacts_dir, title, tags))
    }

    /// Starts a case that always runs, writing under `artifacts_dir`.
    pub fn new(artifacts_dir: &Path, title: impl Into<String>, tags: &[Tag]) -> Self {
        let title = title.into();
        Self {
            dir: artifacts_dir.join(slug(&title)),
            title,
            description: None,
            tags: tags.to_vec(),
            started: Instant::now(),
            started_at: Utc::now(),
            steps: Vec::new(),
            attachments: Vec::new(),
            current_step: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory holding this case's artifacts
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Runs one named step.
    ///
    /// On error the step is logged, a screenshot and the page HTML are
    /// attached, and the error is returned unchanged.
    pub async fn step<T, F>(&mut self, page: &Page, name: &str, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let span = tracing::info_span!("step", name = %name);
        self.current_step = Some(name.to_string());
        let start = Instant::now();

        tracing::info!(parent: &span, "Step: {}", name);
        let outcome = action.instrument(span.clone()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let record = match &outcome {
            Ok(_) => StepRecord {
                name: name.to_string(),
                status: Status::Passed,
                duration_ms,
                error: None,
            },
            Err(err) => {
                tracing::error!(parent: &span, "Step '{}' failed: {}", name, err);
                self.capture_failure(page, name).await;
                StepRecord {
                    name: name.to_string(),
                    status: Status::of_error(err),
                    duration_ms,
                    error: Some(err.to_string()),
                }
            }
        };
        self.steps.push(record);
        self.current_step = None;
        outcome
    }

    /// Assertion step: a false `condition` fails the step with `message`.
    pub async fn ensure(
        &mut self,
        page: &Page,
        name: &str,
        condition: bool,
        message: impl Into<String>,
    ) -> Result<()> {
        let message = message.into();
        self.step(page, name, async move {
            if condition {
                Ok(())
            } else {
                Err(Error::Assertion(message))
            }
        })
        .await
    }

    /// Attaches a screenshot and the HTML of `page`; failures are only logged.
    pub async fn capture_failure(&mut self, page: &Page, label: &str) {
        if let Err(e) = self.attach_screenshot(page, &format!("{} error", label)).await {
            tracing::warn!("Could not capture screenshot for '{}': {}", label, e);
        }
        if let Err(e) = self.attach_html(page, &format!("{} error", label)).await {
            tracing::warn!("Could not capture HTML for '{}': {}", label, e);
        }
    }

    pub async fn attach_screenshot(&mut self, page: &Page, name: &str) -> Result<PathBuf> {
        let bytes = page.screenshot(None).await?;
        self.attach_bytes(name, AttachmentKind::Png, &bytes).await
    }

    pub async fn attach_html(&mut self, page: &Page, name: &str) -> Result<PathBuf> {
        let html = page.content().await?;
        self.attach_bytes(name, AttachmentKind::Html, html.as_bytes())
            .await
    }

    pub async fn attach_text(&mut self, name: &str, content: &str) -> Result<PathBuf> {
        self.attach_bytes(name, AttachmentKind::Text, content.as_bytes())
            .await
    }

    async fn attach_bytes(
        &mut self,
        name: &str,
        kind: AttachmentKind,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file = format!(
            "{:02}_{}.{}",
            self.attachments.len() + 1,
            slug(name),
            kind.extension()
        );
        let path = self.dir.join(&file);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Attached {} ({} bytes)", path.display(), bytes.len());

        self.attachments.push(Attachment {
            name: name.to_string(),
            kind,
            file,
            step: self.current_step.clone(),
        });
        Ok(path)
    }

    /// Writes `result.json` and returns `outcome` unchanged.
    ///
    /// A failure to write the report only surfaces when the case itself passed.
    pub fn finish<T>(self, outcome: Result<T>) -> Result<T> {
        let (status, error) = match &outcome {
            Ok(_) => (Status::Passed, None),
            Err(err) => (Status::of_error(err), Some(err.to_string())),
        };
        let result = CaseResult {
            title: self.title,
            description: self.description,
            tags: self.tags,
            status,
            started_at: self.started_at,
            duration_ms: self.started.elapsed().as_millis() as u64,
            steps: self.steps,
            attachments: self.attachments,
            error,
        };

        match write_result(&self.dir, &result) {
            Ok(path) => {
                tracing::info!("'{}' {:?}, report at {}", result.title, status, path.display());
                outcome
            }
            Err(write_err) => {
                tracing::warn!("Could not write report for '{}': {}", result.title, write_err);
                match outcome {
                    Ok(_) => Err(write_err.context("Failed to write test report")),
                    Err(e) => Err(e),
                }
            }
        }
    }
}

fn write_result(dir: &Path, result: &CaseResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(RESULT_FILE);
    std::fs::write(&path, serde_json::to_vec_pretty(result)?)?;
    Ok(path)
}
