//! Output and status collaborators
//!
//! The engine never renders anything itself. It appends text lines to an
//! [`OutputSink`] and hands one status line per finished step to a
//! [`StatusReporter`]. Sinks may be appended to from a background run while
//! the host reads them, so implementations synchronize internally.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Destination for command output lines
pub trait OutputSink: Send + Sync {
    /// Append one line of (possibly marked-up) text
    fn append_line(&self, line: &str);

    /// Remove all lines
    fn clear(&self);

    /// Ask the display to redraw; a no-op for non-visual sinks
    fn refresh(&self) {}
}

/// Receiver of one-line status updates
pub trait StatusReporter: Send + Sync {
    /// Replace the current status text
    fn set_status(&self, status: &str);
}

/// Creates the sink attached to a command the first time it is needed
pub trait SinkFactory: Send + Sync {
    /// Create a sink for the command called `name`
    fn create(&self, name: &str) -> Arc<dyn OutputSink>;
}

/// In-memory sink, handy for tests and headless hosts
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
    refreshes: Mutex<usize>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of refresh requests received
    pub fn refresh_count(&self) -> usize {
        *self.refreshes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OutputSink for MemorySink {
    fn append_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
    }

    fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn refresh(&self) {
        *self.refreshes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
    }
}

/// Factory producing [`MemorySink`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySinkFactory;

impl SinkFactory for MemorySinkFactory {
    fn create(&self, _name: &str) -> Arc<dyn OutputSink> {
        Arc::new(MemorySink::new())
    }
}

/// Status reporter that keeps every status line
#[derive(Debug, Default)]
pub struct StatusHistory {
    entries: Mutex<Vec<String>>,
}

impl StatusHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// All status lines received so far
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The most recent status line
    pub fn last(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl StatusReporter for StatusHistory {
    fn set_status(&self, status: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(status.to_string());
    }
}

/// Status reporter that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn set_status(&self, status: &str) {
        info!("{}", status);
    }
}

/// One sink per command name, created lazily and reused across runs
pub struct SinkPool {
    factory: Arc<dyn SinkFactory>,
    sinks: Mutex<HashMap<String, Arc<dyn OutputSink>>>,
}

impl SinkPool {
    /// Create a pool backed by `factory`
    pub fn new(factory: Arc<dyn SinkFactory>) -> Self {
        Self {
            factory,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Sink for `name`, creating it on first use
    ///
    /// Returns the sink and whether it was newly created. An existing sink is
    /// cleared when `clear` is set, never replaced.
    pub fn get_or_create(&self, name: &str, clear: bool) -> (Arc<dyn OutputSink>, bool) {
        let mut sinks = self.sinks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sink) = sinks.get(name) {
            if clear {
                sink.clear();
            }
            return (Arc::clone(sink), false);
        }
        let sink = self.factory.create(name);
        sinks.insert(name.to_string(), Arc::clone(&sink));
        (sink, true)
    }

    /// Existing sink for `name`, if any
    pub fn get(&self, name: &str) -> Option<Arc<dyn OutputSink>> {
        self.sinks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Drop the sink for `name` so the next run creates a fresh one
    pub fn reset(&self, name: &str) -> bool {
        self.sinks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reuses_and_clears() {
        let pool = SinkPool::new(Arc::new(MemorySinkFactory));

        let (first, created) = pool.get_or_create("Build", false);
        assert!(created);
        first.append_line("old output");

        let (again, created) = pool.get_or_create("Build", false);
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &again));

        let (cleared, created) = pool.get_or_create("Build", true);
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &cleared));
        assert!(pool.get("Build").is_some());
    }

    #[test]
    fn test_pool_reset_creates_new_sink() {
        let pool = SinkPool::new(Arc::new(MemorySinkFactory));
        let (first, _) = pool.get_or_create("Test", false);

        assert!(pool.reset("Test"));
        assert!(!pool.reset("Test"));

        let (second, created) = pool.get_or_create("Test", false);
        assert!(created);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        sink.append_line("a");
        sink.append_line("b");
        sink.refresh();
        assert_eq!(sink.lines(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sink.refresh_count(), 1);
        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_status_history() {
        let history = StatusHistory::new();
        assert_eq!(history.last(), None);
        history.set_status("one");
        history.set_status("two");
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.last().as_deref(), Some("two"));
    }
}
