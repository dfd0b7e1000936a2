// Test data
//
// Random signup identities, task titles and the form payloads filled in by
// the page objects.

use crate::settings::Settings;
use chrono::NaiveDateTime;
use rand::Rng;

/// Password used by every signup flow
pub const SIGNUP_PASSWORD: &str = "q1w2e3r4t5Y";

/// Length of the title used by the long-title task case
pub const LONG_TITLE_LEN: usize = 100;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TITLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Random ASCII letters
pub fn random_name(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// Random lowercase address on `example.com`
pub fn random_email() -> String {
    format!("{}@example.com", random_name(10).to_ascii_lowercase())
}

/// Random Russian-style mobile number: `89` followed by nine digits
pub fn random_phone() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..9)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("89{}", digits)
}

/// Task title of exactly [`LONG_TITLE_LEN`] characters ending in the timestamp
pub fn long_task_title(now: NaiveDateTime) -> String {
    let base = "Long Task Title for Testing Purposes Created on TaskFiller";
    let stamp = now.format(TITLE_TIME_FORMAT).to_string();
    let filler = LONG_TITLE_LEN.saturating_sub(base.len() + stamp.len() + 1);
    format!("{}{} {}", base, "X".repeat(filler), stamp)
}

/// Task title with punctuation that must survive the form round trip
pub fn special_chars_task_title(now: NaiveDateTime) -> String {
    format!(
        "Task with Symbols @#$%&*! on XXX {}",
        now.format(TITLE_TIME_FORMAT)
    )
}

/// Payload of the "Create new Task" modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub start_date: String,
    pub due_date: String,
    pub story_points: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: "Test Task".to_string(),
            description: "This is a test task description".to_string(),
            tags: "test, automation".to_string(),
            start_date: "2025-06-23".to_string(),
            due_date: "2025-06-30".to_string(),
            story_points: "5".to_string(),
        }
    }
}

impl TaskForm {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Status choices of the project form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    NotStarted,
    Planning,
    InProgress,
    Completed,
}

impl ProjectStatus {
    /// Option value in the status `<select>`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

/// Payload of the "Create New Project" modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: format!("Project {}", random_name(6)),
            description: "Project created by the end-to-end suite".to_string(),
            start_date: "2025-06-23".to_string(),
            end_date: "2025-07-23".to_string(),
            status: ProjectStatus::NotStarted,
        }
    }
}

/// Payload of the signup form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// A fresh, valid identity
    pub fn random() -> Self {
        Self {
            name: random_name(8),
            email: random_email(),
            phone: random_phone(),
            password: SIGNUP_PASSWORD.to_string(),
            confirm_password: SIGNUP_PASSWORD.to_string(),
        }
    }

    /// All fields blank
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

/// One row of the invalid-login table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCase {
    pub id: &'static str,
    pub email: String,
    pub password: String,
}

/// Credential combinations the login form must reject
pub fn invalid_login_cases(settings: &Settings) -> Vec<LoginCase> {
    let case = |id, email: &str, password: &str| LoginCase {
        id,
        email: email.to_string(),
        password: password.to_string(),
    };
    let long_email = format!("{}@example.com", "a".repeat(256));
    let long_password = "a".repeat(101);

    vec![
        case("invalid_password", &settings.email, "wrong_password"),
        case("invalid_email", "invalid-email@mail.ru", &settings.password),
        case("empty_email", "", &settings.password),
        case("empty_password", &settings.email, ""),
        case("long_email", &long_email, &settings.password),
        case("long_password", &settings.email, &long_password),
    ]
}
