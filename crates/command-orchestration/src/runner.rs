//! Command runner
//!
//! A run walks through `Idle -> Prompting -> ChangingDir -> RunningSteps ->
//! RestoringDir -> Done`. Prompting is skipped when the command has no prompt
//! tokens or the coordinator's one-shot suppression flag was set. The
//! working directory is resolved once per run and handed to every spawned
//! process; the runner itself never changes the process-wide directory, so
//! restoring it is only a state transition.
//!
//! Waiting commands (explicit `wait` or more than one step) run their steps in
//! order and stop at the first failure. A single non-waiting step is spawned
//! in the background and streams its output line by line into the sink.

use crate::annotate::markup_line;
use crate::command::{BoundStep, CommandDefinition};
use crate::config::EngineConfig;
use crate::context::{ContextProvider, ProjectContext};
use crate::placeholder::bind;
use crate::prompt::{PromptCoordinator, PromptOutcome, PromptRequester};
use crate::registry::CommandRegistry;
use crate::sink::{LogReporter, OutputSink, StatusReporter};
use crate::spawn::{SmolSpawner, Spawner};
use crate::status::{RunReport, StepReport, StepResult};
use crate::{Error, Result};
use command_executor::{Launcher, LocalLauncher, ProcessHandle};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// States a run passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started
    Idle,
    /// Waiting for prompt answers
    Prompting,
    /// Resolving the working directory
    ChangingDir,
    /// Executing steps
    RunningSteps,
    /// Leaving the working directory
    RestoringDir,
    /// Finished, or handed off to the background
    Done,
}

/// Result of [`CommandRunner::run`]
#[derive(Debug)]
pub enum RunOutcome {
    /// Every step that was going to run has finished
    Completed(RunReport),
    /// The single step runs in the background
    Background(BackgroundRun),
    /// A prompt was dismissed; nothing was spawned
    Cancelled {
        /// Token whose prompt was dismissed
        token: String,
    },
}

impl RunOutcome {
    /// Report of a completed run
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }

    /// Whether the run was cancelled at the prompt stage
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled { .. })
    }
}

/// Handle on a run executing in the background
#[derive(Debug)]
pub struct BackgroundRun {
    command: String,
    report: async_channel::Receiver<RunReport>,
}

impl BackgroundRun {
    /// Name of the command being run
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Wait for the run to finish
    ///
    /// Returns `None` if the background task was dropped before reporting.
    pub async fn wait(self) -> Option<RunReport> {
        self.report.recv().await.ok()
    }
}

/// Everything a single step needs, owned so it can move to a background task
struct StepExec<L: Launcher> {
    launcher: Arc<L>,
    status: Arc<dyn StatusReporter>,
    sink: Option<Arc<dyn OutputSink>>,
    dir: Option<PathBuf>,
    link_base: Option<PathBuf>,
    status_output_len: usize,
}

impl<L: Launcher> StepExec<L> {
    fn append(&self, line: &str) {
        if let Some(sink) = &self.sink {
            sink.append_line(&markup_line(line, self.link_base.as_deref()));
        }
    }

    /// Run one bound step to completion
    ///
    /// With `stream` set, output lines reach the sink as they are read;
    /// otherwise they are appended once the process exited.
    async fn run(&self, step: &BoundStep, stream: bool) -> StepReport {
        let command_line = step.command_line();
        debug!(command = %command_line, dir = ?self.dir, "starting step");

        let (mut events, mut handle) = match self.launcher.launch(step.to_command(self.dir.as_deref())).await {
            Ok(launched) => launched,
            Err(err) => {
                let report = StepReport::new(command_line, StepResult::ExecError(err.to_string()), Vec::new());
                return self.finish(report);
            }
        };

        let mut output = Vec::new();
        while let Some(event) = events.next().await {
            if let Some(line) = event.line() {
                if stream {
                    self.append(line);
                }
                output.push(line.to_string());
            }
        }

        let result = match handle.wait().await {
            Ok(status) if status.success() => StepResult::Success,
            Ok(status) => StepResult::Failed { status },
            Err(err) => StepResult::ExecError(err.to_string()),
        };

        if !stream {
            for line in &output {
                self.append(line);
            }
        }

        self.finish(StepReport::new(command_line, result, output))
    }

    fn finish(&self, report: StepReport) -> StepReport {
        match &self.sink {
            Some(sink) => {
                sink.append_line("");
                sink.append_line(&markup_line(&report.status_line(), self.link_base.as_deref()));
                sink.refresh();
            }
            None => {
                if let StepResult::ExecError(msg) = &report.result {
                    error!(command = %report.command_line, "{}", msg);
                }
            }
        }
        self.status.set_status(&report.status_summary(self.status_output_len));
        report
    }
}

/// Runs command definitions against the current project context
pub struct CommandRunner<L: Launcher = LocalLauncher> {
    launcher: Arc<L>,
    context: Arc<dyn ContextProvider>,
    prompts: PromptCoordinator,
    status: Arc<dyn StatusReporter>,
    spawner: Arc<dyn Spawner>,
    config: EngineConfig,
}

impl CommandRunner<LocalLauncher> {
    /// Runner launching local processes
    pub fn local(context: Arc<dyn ContextProvider>, requester: Arc<dyn PromptRequester>) -> Self {
        Self::new(LocalLauncher, context, requester)
    }
}

impl<L: Launcher> CommandRunner<L> {
    /// Create a runner with a logging status reporter and the smol spawner
    pub fn new(launcher: L, context: Arc<dyn ContextProvider>, requester: Arc<dyn PromptRequester>) -> Self {
        Self {
            launcher: Arc::new(launcher),
            context,
            prompts: PromptCoordinator::new(requester),
            status: Arc::new(LogReporter),
            spawner: Arc::new(SmolSpawner),
            config: EngineConfig::default(),
        }
    }

    /// Use `status` for status line updates
    pub fn with_status_reporter(mut self, status: Arc<dyn StatusReporter>) -> Self {
        self.status = status;
        self
    }

    /// Use `spawner` for background runs
    pub fn with_spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// Use `config` for engine settings
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The prompt coordinator shared by all runs
    pub fn prompts(&self) -> &PromptCoordinator {
        &self.prompts
    }

    /// Engine settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn transition(&self, command: &str, state: RunState) {
        debug!(command, ?state, "run state");
    }

    /// Look `name` up in `registry` and run it
    ///
    /// A miss is reported on the status line and returned; nothing runs.
    pub async fn run_named(
        &self,
        registry: &CommandRegistry,
        name: &str,
        sink: Option<Arc<dyn OutputSink>>,
    ) -> Result<RunOutcome> {
        let command = match registry.by_name(name) {
            Ok(command) => command.clone(),
            Err(err) => {
                warn!(command = name, "command not found");
                self.status.set_status(&format!("command not found: {}", name));
                return Err(err);
            }
        };
        self.run(&command, sink).await
    }

    /// Run `command`, writing output to `sink` when given
    pub async fn run(&self, command: &CommandDefinition, sink: Option<Arc<dyn OutputSink>>) -> Result<RunOutcome> {
        if !command.is_runnable() {
            return Err(Error::EmptyCommand(command.name.clone()));
        }
        let name = command.name.as_str();
        self.transition(name, RunState::Idle);
        info!(command = name, steps = command.steps.len(), "running command");

        let suppressed = self.prompts.take_suppression();
        let tokens = command.prompts();
        if !tokens.is_empty() && !suppressed {
            self.transition(name, RunState::Prompting);
            if let PromptOutcome::Cancelled { token } = self.prompts.request_values(name, &tokens).await {
                self.transition(name, RunState::Done);
                return Ok(RunOutcome::Cancelled { token });
            }
        }

        let mut context = self.context.snapshot();
        context.extend(self.prompts.values());

        self.transition(name, RunState::ChangingDir);
        let link_base = context
            .file_dir()
            .or_else(|| context.project_root())
            .map(Path::to_path_buf);
        let mut exec = StepExec {
            launcher: Arc::clone(&self.launcher),
            status: Arc::clone(&self.status),
            sink,
            dir: None,
            link_base,
            status_output_len: self.config.status_output_len,
        };
        exec.dir = self.working_dir(command, &context, &exec);

        self.transition(name, RunState::RunningSteps);
        let outcome = if command.runs_synchronously() {
            let mut reports = Vec::with_capacity(command.steps.len());
            for step in &command.steps {
                let report = exec.run(&step.bind(&context), false).await;
                let ok = report.is_success();
                reports.push(report);
                if !ok {
                    break;
                }
            }
            let report = RunReport::from_steps(reports);
            info!(command = name, success = report.success, "command finished");
            RunOutcome::Completed(report)
        } else {
            let step = command.steps[0].bind(&context);
            let (tx, rx) = async_channel::bounded(1);
            let owned_name = command.name.clone();
            self.spawner.spawn(Box::pin(async move {
                let report = RunReport::from_steps(vec![exec.run(&step, true).await]);
                info!(command = %owned_name, success = report.success, "background command finished");
                let _ = tx.send(report).await;
            }));
            RunOutcome::Background(BackgroundRun {
                command: command.name.clone(),
                report: rx,
            })
        };

        self.transition(name, RunState::RestoringDir);
        self.transition(name, RunState::Done);
        Ok(outcome)
    }

    /// Resolve the directory the steps run in
    ///
    /// Falls back to the project root when the configured directory is not
    /// usable, and to the inherited directory when the root is not usable
    /// either. Each rejected directory is reported to the sink.
    fn working_dir(&self, command: &CommandDefinition, context: &ProjectContext, exec: &StepExec<L>) -> Option<PathBuf> {
        if let Some(template) = &command.working_dir {
            let resolved = bind(template, context);
            exec.append(&format!("cd {} (from: {})", resolved, template));
            if let Some(dir) = self.usable_dir(&command.name, Path::new(&resolved), exec) {
                return Some(dir);
            }
        }
        let root = context.project_root()?;
        self.usable_dir(&command.name, root, exec)
    }

    fn usable_dir(&self, command: &str, dir: &Path, exec: &StepExec<L>) -> Option<PathBuf> {
        if dir.is_dir() {
            return Some(dir.to_path_buf());
        }
        let reason = match std::fs::metadata(dir) {
            Ok(_) => "not a directory".to_string(),
            Err(err) => err.to_string(),
        };
        warn!(command, dir = %dir.display(), %reason, "could not change directory");
        exec.append(&format!("Could not change to directory {} -- error: {}", dir.display(), reason));
        None
    }
}
