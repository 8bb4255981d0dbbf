//! Terminal implementations of the engine's host collaborators

use async_trait::async_trait;
use command_orchestration::{OutputSink, PromptRequester, StatusReporter};
use regex::Regex;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::{Arc, LazyLock, Mutex};

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="([^"]*)">([^<]*)</a>"#).expect("valid regex"));

/// Replace anchor markup with terminal hyperlinks, or with the bare text
pub fn render_links(line: &str, hyperlinks: bool) -> String {
    if hyperlinks {
        LINK_RE
            .replace_all(line, "\x1b]8;;$1\x1b\\$2\x1b]8;;\x1b\\")
            .into_owned()
    } else {
        LINK_RE.replace_all(line, "$2").into_owned()
    }
}

/// Writes command output to stdout
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    hyperlinks: bool,
}

impl TerminalSink {
    /// Sink emitting hyperlinks when stdout is a terminal
    pub fn detect() -> Self {
        Self {
            hyperlinks: io::stdout().is_terminal(),
        }
    }

    /// Sink that always prints plain text
    pub fn plain() -> Self {
        Self { hyperlinks: false }
    }
}

impl OutputSink for TerminalSink {
    fn append_line(&self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", render_links(line, self.hyperlinks));
    }

    fn clear(&self) {}

    fn refresh(&self) {
        let _ = io::stdout().flush();
    }
}

/// Prints status lines to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrStatus;

impl StatusReporter for StderrStatus {
    fn set_status(&self, status: &str) {
        eprintln!("[devrun] {}", render_links(status, false));
    }
}

/// Asks for prompt values on stdin
///
/// Prompts are asked one at a time even when requested together. An empty
/// answer or end of input dismisses the prompt.
#[derive(Debug, Clone, Default)]
pub struct StdinPrompter {
    lock: Arc<Mutex<()>>,
}

impl StdinPrompter {
    /// Create a prompter
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptRequester for StdinPrompter {
    async fn request(&self, token: &str, command: &str) -> Option<String> {
        let lock = Arc::clone(&self.lock);
        let label = format!("{} for '{}': ", token, command);
        smol::unblock(move || {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            eprint!("{}", label);
            let _ = io::stderr().flush();
            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(0) | Err(_) => None,
                Ok(_) => {
                    let answer = answer.trim_end_matches(['\r', '\n']).to_string();
                    (!answer.is_empty()).then_some(answer)
                }
            }
        })
        .await
    }
}
