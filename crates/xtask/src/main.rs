//! Developer tasks for the ProjectM end-to-end suite
//!
//! `cargo xtask e2e` clears the artifacts directory, then runs the live suite
//! against `BASE_URL`; `cargo xtask report` summarises the `result.json` files
//! that run left behind.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use projectm_e2e::Tag;
use projectm_e2e::report::{CaseResult, Status, Summary, clear_results};
use projectm_e2e::settings::DEFAULT_ARTIFACTS_DIR;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "ProjectM e2e developer tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live end-to-end suite (the #[ignore]d tests)
    E2e {
        /// Only run cases carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<Tag>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Only run test binaries whose name matches (e.g. auth_test)
        #[arg(long = "test")]
        test: Option<String>,
    },

    /// Summarise the result files of the last run
    Report {
        /// Artifacts directory (defaults to E2E_ARTIFACTS_DIR or target/e2e-artifacts)
        dir: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::E2e {
            tags,
            headed,
            test,
        } => run_e2e(&tags, headed, test.as_deref()),
        Commands::Report { dir, json } => {
            let dir = dir.unwrap_or_else(default_artifacts_dir);
            report(&dir, json)
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_artifacts_dir() -> PathBuf {
    std::env::var("E2E_ARTIFACTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| workspace_root().join(DEFAULT_ARTIFACTS_DIR))
}

fn run_e2e(tags: &[Tag], headed: bool, test: Option<&str>) -> Result<()> {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let mut cmd = Command::new(cargo);
    cmd.current_dir(workspace_root())
        .args(["test", "-p", "projectm-e2e"]);
    if let Some(test) = test {
        cmd.args(["--test", test]);
    }
    // Live cases share one account, so they run one at a time
    cmd.args(["--", "--ignored", "--test-threads=1"]);
    // Tests run from the crate directory; pin artifacts where `report` looks
    let artifacts = default_artifacts_dir();
    clear_results(&artifacts)
        .with_context(|| format!("Failed to clear {}", artifacts.display()))?;
    cmd.env("E2E_ARTIFACTS_DIR", &artifacts);

    if !tags.is_empty() {
        let filter: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        cmd.env("E2E_TAGS", filter.join(","));
    }
    if headed {
        cmd.env("HEADLESS", "false");
    }

    println!("Running live suite{}", if headed { " (headed)" } else { "" });
    let status = cmd.status().context("Failed to run cargo test")?;
    if !status.success() {
        bail!("e2e suite failed ({})", status);
    }
    Ok(())
}

fn report(dir: &Path, json: bool) -> Result<()> {
    let results = CaseResult::load_all(dir)
        .with_context(|| format!("Failed to read results from {}", dir.display()))?;
    let summary = Summary::of(&results);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for result in &results {
            let mark = match result.status {
                Status::Passed => "PASS",
                Status::Failed => "FAIL",
                Status::Broken => "BROKEN",
            };
            println!("{:<7} {} ({} ms)", mark, result.title, result.duration_ms);
            if let Some(error) = &result.error {
                println!("        {}", error);
            }
        }
        println!(
            "\n{} cases: {} passed, {} failed, {} broken",
            summary.total, summary.passed, summary.failed, summary.broken
        );
    }

    if !summary.is_success() {
        bail!("{} of {} cases did not pass", summary.failed + summary.broken, summary.total);
    }
    Ok(())
}
