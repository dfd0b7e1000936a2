// Page Log - console and network capture for a page
//
// Requests are observed through a catch-all route that records the request
// and lets it continue unchanged. Console output is mirrored by an init script
// into `window.__e2eConsole` and pulled with `drain_console`.
//
// The log is shared between the route handler task and the test, so entries
// live behind a `parking_lot::Mutex`.

use crate::error::Result;
use parking_lot::Mutex;
use playwright_rs::{Page, Response};
use std::sync::Arc;

const CONSOLE_HOOK: &str = r#"
(() => {
  if (window.__e2eConsole) return;
  window.__e2eConsole = [];
  const render = (arg) => {
    if (typeof arg === 'string') return arg;
    try { return JSON.stringify(arg); } catch (e) { return String(arg); }
  };
  for (const level of ['log', 'info', 'warn', 'error', 'debug']) {
    const original = console[level].bind(console);
    console[level] = (...args) => {
      window.__e2eConsole.push(level + ': ' + args.map(render).join(' '));
      original(...args);
    };
  }
  window.addEventListener('error', (event) => {
    window.__e2eConsole.push('pageerror: ' + event.message);
  });
})();
"#;

const CONSOLE_DRAIN: &str = r#"() => {
  const entries = window.__e2eConsole || [];
  window.__e2eConsole = [];
  return entries;
}"#;

/// One captured event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Request { method: String, url: String },
    Response { status: u16, url: String },
    Console(String),
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogEntry::Request { method, url } => write!(f, "Request: {} {}", method, url),
            LogEntry::Response { status, url } => write!(f, "Response: {} {}", status, url),
            LogEntry::Console(text) => write!(f, "Console: {}", text),
        }
    }
}

/// Console and network log of one page, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct PageLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl PageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the console hook and the request listener on `page`.
    ///
    /// Must run before the first navigation for the console hook to apply.
    pub async fn attach(&self, page: &Page) -> Result<()> {
        page.add_init_script(CONSOLE_HOOK).await?;

        let log = self.clone();
        page.route("**/*", move |route| {
            let log = log.clone();
            async move {
                let request = route.request();
                log.record_request(request.method(), request.url());
                route.continue_(None).await
            }
        })
        .await?;

        tracing::debug!("Page log attached");
        Ok(())
    }

    pub fn record_request(&self, method: &str, url: &str) {
        tracing::debug!("Request: {} {}", method, url);
        self.entries.lock().push(LogEntry::Request {
            method: method.to_string(),
            url: url.to_string(),
        });
    }

    /// Records a navigation response
    pub fn record_response(&self, response: &Response) {
        self.record_status(response.status(), response.url());
    }

    pub fn record_status(&self, status: u16, url: &str) {
        tracing::debug!("Response: {} {}", status, url);
        self.entries.lock().push(LogEntry::Response {
            status,
            url: url.to_string(),
        });
    }

    pub fn record_console(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("Console: {}", text);
        self.entries.lock().push(LogEntry::Console(text));
    }

    /// Moves buffered console messages from the page into the log.
    ///
    /// Returns the number of messages pulled.
    pub async fn drain_console(&self, page: &Page) -> Result<usize> {
        let messages: Vec<String> = page.evaluate::<(), _>(CONSOLE_DRAIN, None).await?;
        let count = messages.len();
        for message in messages {
            self.record_console(message);
        }
        Ok(count)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Requests and responses, one per line
    pub fn network_lines(&self) -> String {
        self.render(|e| !matches!(e, LogEntry::Console(_)))
    }

    /// Console messages, one per line
    pub fn console_lines(&self) -> String {
        self.render(|e| matches!(e, LogEntry::Console(_)))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn render(&self, keep: impl Fn(&LogEntry) -> bool) -> String {
        self.entries
            .lock()
            .iter()
            .filter(|e| keep(e))
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
