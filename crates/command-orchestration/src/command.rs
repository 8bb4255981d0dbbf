//! Command definitions
//!
//! A [`CommandDefinition`] is a named sequence of [`ProcessStep`]s with an
//! optional working directory and a wait policy. Definitions are plain data:
//! they serialize to the commands JSON file and are never mutated by a run.

use crate::context::ProjectContext;
use crate::placeholder::bind;
use crate::prompt::collect_prompts;
use command_executor::Command;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One external program invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessStep {
    /// Program to execute, on the PATH or given as a full path
    pub executable: String,
    /// Arguments, one string per argument, may contain placeholders
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProcessStep {
    /// Create a step
    pub fn new<I, S>(executable: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executable: executable.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve placeholders, producing a new step ready to launch
    pub fn bind(&self, context: &ProjectContext) -> BoundStep {
        BoundStep {
            executable: bind(&self.executable, context),
            args: self.args.iter().map(|a| bind(a, context)).collect(),
        }
    }
}

/// A step whose placeholders have been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStep {
    /// Resolved program
    pub executable: String,
    /// Resolved arguments
    pub args: Vec<String>,
}

impl BoundStep {
    /// Program and arguments joined by spaces, as shown in status lines
    pub fn command_line(&self) -> String {
        self.to_command(None).command_line()
    }

    /// Build a launchable command running in `dir`
    pub fn to_command(&self, dir: Option<&Path>) -> Command {
        let cmd = Command::new(&self.executable).args(&self.args);
        match dir {
            Some(dir) => cmd.current_dir(dir),
            None => cmd,
        }
    }
}

/// A named command that can be run from the project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    /// Name, unique within a registry
    pub name: String,
    /// Brief description
    #[serde(default)]
    pub description: String,
    /// Languages this command applies to; empty means any
    #[serde(default)]
    pub languages: Vec<String>,
    /// Programs to run, in order
    pub steps: Vec<ProcessStep>,
    /// Directory to run in, may contain placeholders; project root when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Wait for completion before returning; implied by multi-step commands
    #[serde(default)]
    pub wait: bool,
}

impl CommandDefinition {
    /// Create a command with a single step
    pub fn new(name: impl Into<String>, step: ProcessStep) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            languages: Vec::new(),
            steps: vec![step],
            working_dir: None,
            wait: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restrict the command to the given languages
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Append another step
    pub fn then(mut self, step: ProcessStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the working directory template
    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the wait flag
    pub fn waiting(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Whether runs block until every step finished
    ///
    /// Multi-step commands always run synchronously, in order.
    pub fn runs_synchronously(&self) -> bool {
        self.wait || self.steps.len() > 1
    }

    /// Whether the command has anything to run
    pub fn is_runnable(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Prompt tokens that must be answered before running
    pub fn prompts(&self) -> BTreeSet<String> {
        collect_prompts(&self.steps)
    }

    /// Whether the command applies to any of `languages`
    ///
    /// Commands without language tags apply everywhere; tagged commands never
    /// match an empty language list.
    pub fn matches_languages<S: AsRef<str>>(&self, languages: &[S]) -> bool {
        if self.languages.is_empty() {
            return true;
        }
        self.languages
            .iter()
            .any(|own| languages.iter().any(|l| l.as_ref() == own))
    }
}
