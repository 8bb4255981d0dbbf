//! Terminal front end for the command orchestration engine
//!
//! The binary wires [`command_orchestration`] to stdout, stderr and stdin.
//! The pieces are exposed here so they can be reused and tested.

#![warn(missing_docs)]

pub mod setup;
pub mod terminal;

pub use setup::{ProjectArgs, load_registry, parse_prompt};
pub use terminal::{StderrStatus, StdinPrompter, TerminalSink, render_links};
