//! Error types for command execution

use crate::command::Command;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for command execution
///
/// Every variant describes a failure to get a process running or to observe it.
/// A process that ran and exited non-zero is not an error; see
/// [`ExitStatus`](crate::process::ExitStatus).
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to spawn a process
    #[error("failed to spawn process: {reason}")]
    SpawnFailed {
        /// The reason for the spawn failure
        reason: String,
    },

    /// Command not found
    #[error("command not found: {command}")]
    CommandNotFound {
        /// The command that was not found
        command: String,
    },

    /// The executable exists but may not be run
    #[error("permission denied: {command}")]
    PermissionDenied {
        /// The command that could not be executed
        command: String,
    },

    /// The working directory of the command is missing or not a directory
    #[error("could not change to directory {}: {reason}", dir.display())]
    WorkingDirectory {
        /// Directory the command was meant to run in
        dir: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a spawn failed error
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Classify an I/O error raised while spawning `command`
    ///
    /// `NotFound` is blamed on the working directory when that directory is
    /// unusable, and on the program otherwise.
    pub fn from_spawn(command: &Command, err: io::Error) -> Self {
        if let Some(dir) = command.working_dir().filter(|dir| !dir.is_dir()) {
            let reason = match std::fs::metadata(dir) {
                Ok(_) => "not a directory".to_string(),
                Err(e) => e.to_string(),
            };
            return Self::WorkingDirectory {
                dir: dir.to_path_buf(),
                reason,
            };
        }
        let command = command.program().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::CommandNotFound { command },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { command },
            _ => Self::spawn_failed(format!("{}: {}", command, err)),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
