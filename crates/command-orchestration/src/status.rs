//! Per-step results and status lines

use chrono::{DateTime, Local};
use command_executor::ExitStatus;

/// Timestamp layout used in status lines, e.g. `Mon Jan  2 15:04:05 +00:00 2006`
pub const STATUS_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

/// How a single step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Exited with status zero
    Success,
    /// Ran but exited non-zero or was killed
    Failed {
        /// Exit status reported by the process
        status: ExitStatus,
    },
    /// Could not be started at all
    ExecError(String),
}

impl StepResult {
    /// Word used in the status line
    pub fn label(&self) -> &'static str {
        match self {
            StepResult::Success => "successful",
            StepResult::Failed { .. } => "failed",
            StepResult::ExecError(_) => "exec error",
        }
    }

    /// Error detail, if any
    pub fn message(&self) -> Option<String> {
        match self {
            StepResult::Success => None,
            StepResult::Failed { status } => Some(status.describe()),
            StepResult::ExecError(msg) => Some(msg.clone()),
        }
    }
}

/// Outcome of one executed step
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Bound command line that was run
    pub command_line: String,
    /// How the step ended
    pub result: StepResult,
    /// Captured output lines, stdout and stderr interleaved as read
    pub output: Vec<String>,
    /// When the step finished
    pub finished_at: DateTime<Local>,
}

impl StepReport {
    /// Create a report stamped with the current local time
    pub fn new(command_line: impl Into<String>, result: StepResult, output: Vec<String>) -> Self {
        Self {
            command_line: command_line.into(),
            result,
            output,
            finished_at: Local::now(),
        }
    }

    /// Whether the step succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.result, StepResult::Success)
    }

    /// `<command line> <successful|failed|exec error> at: <time>[ with error: <msg>]`
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{} {} at: {}",
            self.command_line,
            self.result.label(),
            self.finished_at.format(STATUS_TIME_FORMAT)
        );
        if let Some(msg) = self.result.message() {
            line.push_str(" with error: ");
            line.push_str(&msg);
        }
        line
    }

    /// Status line followed by the start of the first output line
    ///
    /// The snippet is cut to at most `max_len` characters.
    pub fn status_summary(&self, max_len: usize) -> String {
        let status = self.status_line();
        match self.output.iter().find(|l| !l.trim().is_empty()) {
            Some(first) => {
                let snippet: String = first.chars().take(max_len).collect();
                format!("{} {}", status, snippet)
            }
            None => status,
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Reports of the steps that were executed, in order
    pub steps: Vec<StepReport>,
    /// True when at least one step ran and every executed step succeeded
    pub success: bool,
}

impl RunReport {
    /// Build a report from executed steps
    pub fn from_steps(steps: Vec<StepReport>) -> Self {
        let success = !steps.is_empty() && steps.iter().all(StepReport::is_success);
        Self { steps, success }
    }

    /// Report of the last executed step
    pub fn last(&self) -> Option<&StepReport> {
        self.steps.last()
    }
}
