//! # Command orchestration
//!
//! Named, parameterized command pipelines for a developer tool: compile,
//! format, test, version control and custom scripts.
//!
//! A [`CommandDefinition`] lists the external programs to run. Arguments may
//! reference `{Placeholder}` values taken from the project context (current
//! file, project root, build dir) or typed by the user when a run starts
//! (`{PromptString1}`). The [`CommandRunner`] binds the placeholders, picks the
//! working directory, runs the steps and writes annotated output to an
//! [`OutputSink`], with file positions turned into links.
//!
//! ## Example
//!
//! ```no_run
//! use command_orchestration::{
//!     CommandDefinition, CommandRunner, MemorySink, ProcessStep, ProjectContext, PromptRequester,
//! };
//! use std::sync::Arc;
//!
//! struct NoPrompts;
//!
//! #[async_trait::async_trait]
//! impl PromptRequester for NoPrompts {
//!     async fn request(&self, _token: &str, _command: &str) -> Option<String> {
//!         None
//!     }
//! }
//!
//! # fn main() -> command_orchestration::Result<()> {
//! let context = ProjectContext::new()
//!     .with_project_root("/src/app")
//!     .with_file("/src/app/main.go");
//! let runner = CommandRunner::local(Arc::new(context), Arc::new(NoPrompts));
//!
//! let fmt = CommandDefinition::new("Fmt", ProcessStep::new("gofmt", ["-w", "{FilePath}"]))
//!     .in_dir("{FileDirPath}")
//!     .waiting(true);
//!
//! let sink = Arc::new(MemorySink::new());
//! let outcome = smol::block_on(runner.run(&fmt, Some(sink.clone())))?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod annotate;
mod builtin;
mod command;
mod config;
mod context;
mod persist;
mod placeholder;
mod prompt;
mod registry;
mod runner;
mod sink;
mod spawn;
mod status;

pub use annotate::{FileLink, detect_link, markup_line};
pub use builtin::builtin_commands;
pub use command::{BoundStep, CommandDefinition, ProcessStep};
pub use config::EngineConfig;
pub use context::{ContextProvider, ProjectContext};
pub use persist::{COMMANDS_FILE_NAME, default_commands_path, load_commands, save_commands};
pub use placeholder::{PLACEHOLDER_NAMES, bind, placeholders_in};
pub use prompt::{
    PROMPT_STRING_1, PROMPT_STRING_2, PromptCoordinator, PromptOutcome, PromptRequester,
    collect_prompts, is_prompt_token,
};
pub use registry::{CommandRegistry, merge};
pub use runner::{BackgroundRun, CommandRunner, RunOutcome, RunState};
pub use sink::{
    LogReporter, MemorySink, MemorySinkFactory, OutputSink, SinkFactory, SinkPool, StatusHistory,
    StatusReporter,
};
pub use spawn::{BoxFuture, SmolSpawner, Spawner};
pub use status::{RunReport, STATUS_TIME_FORMAT, StepReport, StepResult};

/// Placeholder variable names filled from the project context
pub mod vars {
    pub use crate::context::{
        BUILD_DIR, BUILD_TARGET, FILE_DIR, FILE_DIR_PATH, FILE_DIR_PROJ_REL, FILE_EXT, FILE_EXT_LC,
        FILE_NAME, FILE_NAME_NO_EXT, FILE_PATH, PROJ_NAME, PROJ_PATH, RUN_EXEC, RUN_EXEC_DIR_PATH,
    };
}

/// Error types for command orchestration
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Process launching errors
    #[error("Command execution error: {0}")]
    Executor(#[from] command_executor::Error),

    /// No command with this name in the registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Command has no steps
    #[error("Command has no steps: {0}")]
    EmptyCommand(String),

    /// File access failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: std::path::PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Commands file could not be parsed
    #[error("Invalid commands file: {0}")]
    Decode(serde_json::Error),

    /// Commands could not be serialized
    #[error("Could not encode commands: {0}")]
    Encode(serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration values out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, Error>;
