//! Background execution of non-waiting runs

use std::future::Future;
use std::pin::Pin;

/// Boxed future handed to a [`Spawner`]
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs futures in the background on some executor
///
/// The runner only needs fire-and-forget spawning; results travel back over a
/// channel, so no task handle is exposed.
pub trait Spawner: Send + Sync {
    /// Spawn `future` and let it run to completion
    fn spawn(&self, future: BoxFuture);
}

/// Spawner backed by the global smol executor
#[derive(Debug, Clone, Copy, Default)]
pub struct SmolSpawner;

impl Spawner for SmolSpawner {
    fn spawn(&self, future: BoxFuture) {
        smol::spawn(future).detach();
    }
}
