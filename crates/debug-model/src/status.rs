//! Debugger session status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use tracing::debug;

/// State of a debugging session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DebugStatus {
    /// No debugger started yet
    #[default]
    NotInit,
    /// The debugger failed
    Error,
    /// The target is being built
    Building,
    /// Built and ready to run
    Ready,
    /// The target is running
    Running,
    /// Stopped at a breakpoint or step
    Stopped,
    /// The target exited
    Finished,
    /// Number of states; not a real state
    StatusN,
}

/// A status name or index that does not denote a [`DebugStatus`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStatusError {
    /// No member has this exact name
    #[error("{0} is not a valid option for type: DebugStatus")]
    UnknownName(String),
    /// Index outside the enumeration
    #[error("{0} is not a valid DebugStatus index")]
    OutOfRange(i64),
}

impl DebugStatus {
    /// Every member in index order, sentinel included
    pub const ALL: [DebugStatus; 8] = [
        DebugStatus::NotInit,
        DebugStatus::Error,
        DebugStatus::Building,
        DebugStatus::Ready,
        DebugStatus::Running,
        DebugStatus::Stopped,
        DebugStatus::Finished,
        DebugStatus::StatusN,
    ];

    /// Member name
    pub fn as_str(self) -> &'static str {
        match self {
            DebugStatus::NotInit => "NotInit",
            DebugStatus::Error => "Error",
            DebugStatus::Building => "Building",
            DebugStatus::Ready => "Ready",
            DebugStatus::Running => "Running",
            DebugStatus::Stopped => "Stopped",
            DebugStatus::Finished => "Finished",
            DebugStatus::StatusN => "StatusN",
        }
    }

    /// Name for a raw index; indices outside the enumeration render as `Status(N)`
    pub fn name_of(index: i64) -> String {
        match DebugStatus::try_from(index) {
            Ok(status) => status.as_str().to_string(),
            Err(_) => format!("Status({})", index),
        }
    }

    /// Position in [`ALL`](Self::ALL)
    pub fn index(self) -> i64 {
        self as i64
    }

    /// Whether the target process is alive
    pub fn is_active(self) -> bool {
        matches!(self, DebugStatus::Running | DebugStatus::Stopped)
    }
}

impl fmt::Display for DebugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebugStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DebugStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError::UnknownName(s.to_string()))
    }
}

impl TryFrom<i64> for DebugStatus {
    type Error = ParseStatusError;

    fn try_from(index: i64) -> Result<Self, <DebugStatus as TryFrom<i64>>::Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| DebugStatus::ALL.get(i).copied())
            .ok_or(ParseStatusError::OutOfRange(index))
    }
}

struct Shared {
    current: RwLock<DebugStatus>,
    subscribers: Mutex<Vec<async_channel::Sender<DebugStatus>>>,
}

impl Shared {
    fn get(&self) -> DebugStatus {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn subscribe(&self) -> async_channel::Receiver<DebugStatus> {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }
}

/// Current session status, written by the debugger driver
///
/// Readers get a [`StatusWatch`], which can observe but not change the
/// status.
pub struct StatusCell {
    shared: Arc<Shared>,
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new(DebugStatus::NotInit)
    }
}

impl StatusCell {
    /// Create a cell holding `initial`
    pub fn new(initial: DebugStatus) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: RwLock::new(initial),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current status
    pub fn get(&self) -> DebugStatus {
        self.shared.get()
    }

    /// Change the status and notify subscribers
    ///
    /// Subscribers whose receiver was dropped are forgotten.
    pub fn set(&self, status: DebugStatus) {
        let previous = {
            let mut current = self.shared.current.write().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *current, status)
        };
        debug!(from = %previous, to = %status, "debugger status changed");

        let mut subscribers = self.shared.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.try_send(status).is_ok());
    }

    /// Receive every subsequent status change
    pub fn subscribe(&self) -> async_channel::Receiver<DebugStatus> {
        self.shared.subscribe()
    }

    /// Read-only handle for consumers
    pub fn watch(&self) -> StatusWatch {
        StatusWatch {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Read-only view of a [`StatusCell`]
#[derive(Clone)]
pub struct StatusWatch {
    shared: Arc<Shared>,
}

impl StatusWatch {
    /// Current status
    pub fn get(&self) -> DebugStatus {
        self.shared.get()
    }

    /// Receive every subsequent status change
    pub fn subscribe(&self) -> async_channel::Receiver<DebugStatus> {
        self.shared.subscribe()
    }
}
