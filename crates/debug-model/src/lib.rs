//! Debugger session model
//!
//! The status of a debugging session and the tree of variables the user
//! inspects. Nothing here talks to a debugger; a driver fills the model and
//! views read it.

#![warn(missing_docs)]

pub mod params;
pub mod status;
pub mod variable;

pub use params::{DebugMode, DebugParams, VarParams};
pub use status::{DebugStatus, ParseStatusError, StatusCell, StatusWatch};
pub use variable::{Contents, Kind, Location, Variable, sort_by_name};
