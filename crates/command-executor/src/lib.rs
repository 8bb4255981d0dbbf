//! Runtime-agnostic command execution library
//!
//! This crate launches external programs on the local machine, streams their
//! stdout/stderr line by line and reports how they exited. Spawn failures
//! (missing executable, permission denied) are kept distinct from processes
//! that ran and exited unsuccessfully.

#![warn(missing_docs)]

pub mod backends;
pub mod command;
pub mod error;
pub mod event;
pub mod launcher;
pub mod process;

pub use backends::LocalLauncher;
pub use command::Command;
pub use error::{Error, Result};
pub use event::{LogSource, ProcessEvent, ProcessEventType};
pub use launcher::Launcher;
pub use process::{ExitResult, ExitStatus, ProcessHandle};
