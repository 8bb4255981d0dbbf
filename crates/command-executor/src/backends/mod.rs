//! Backend implementations for different execution contexts
//!
//! Only local execution is provided. Other contexts can be added by
//! implementing the [`Launcher`](crate::launcher::Launcher) trait.

pub mod local;
pub use local::{LocalLauncher, LocalProcessHandle, ProcessEventStream};
