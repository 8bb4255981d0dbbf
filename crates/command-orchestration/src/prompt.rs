//! Interactive prompt collection
//!
//! Arguments may reference prompt tokens (`{PromptString1}`, `{PromptString2}`,
//! and by convention any `{PromptString<N>}`) whose values are typed by the user
//! right before a run. The coordinator asks the host for every distinct token at
//! once and resumes the run only when all answers are in. A single dismissed
//! prompt cancels the whole run.

use crate::command::ProcessStep;
use crate::placeholder::placeholders_in;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// First canonical string prompt
pub const PROMPT_STRING_1: &str = "PromptString1";
/// Second canonical string prompt
pub const PROMPT_STRING_2: &str = "PromptString2";

const PROMPT_PREFIX: &str = "PromptString";

/// Host collaborator that asks the user for a value
#[async_trait]
pub trait PromptRequester: Send + Sync {
    /// Ask for the value of `token` while preparing `command`
    ///
    /// Returns `None` when the user dismisses the prompt.
    async fn request(&self, token: &str, command: &str) -> Option<String>;
}

/// Result of collecting prompt values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Every requested token received a value
    Resolved,
    /// The user dismissed the prompt for this token
    Cancelled {
        /// Token whose prompt was dismissed
        token: String,
    },
}

/// Whether `name` follows the prompt token convention
pub fn is_prompt_token(name: &str) -> bool {
    name.strip_prefix(PROMPT_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Distinct prompt tokens referenced by the executables and arguments of `steps`
pub fn collect_prompts(steps: &[ProcessStep]) -> BTreeSet<String> {
    steps
        .iter()
        .flat_map(|step| std::iter::once(&step.executable).chain(step.args.iter()))
        .flat_map(|s| placeholders_in(s))
        .filter(|name| is_prompt_token(name))
        .collect()
}

/// Collects prompt values and keeps them for the rest of the session
///
/// Values persist until the same token is asked for again, so a command that
/// reuses `{PromptString1}` after a guided workflow filled it still sees it.
#[derive(Clone)]
pub struct PromptCoordinator {
    requester: Arc<dyn PromptRequester>,
    values: Arc<RwLock<HashMap<String, String>>>,
    suppress: Arc<AtomicBool>,
}

impl PromptCoordinator {
    /// Create a coordinator that asks `requester` for values
    pub fn new(requester: Arc<dyn PromptRequester>) -> Self {
        Self {
            requester,
            values: Arc::new(RwLock::new(HashMap::new())),
            suppress: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Skip prompting for the next run only
    ///
    /// For callers that already supplied values with [`preset`](Self::preset).
    /// Concurrent runs race for the flag; only one of them consumes it.
    pub fn suppress_next(&self) {
        self.suppress.store(true, Ordering::SeqCst);
    }

    /// Consume the suppression flag, returning whether it was set
    pub fn take_suppression(&self) -> bool {
        self.suppress.swap(false, Ordering::SeqCst)
    }

    /// Store a value for `token` without asking the user
    pub fn preset(&self, token: impl Into<String>, value: impl Into<String>) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(token.into(), value.into());
    }

    /// Current value of `token`, if any was collected
    pub fn value(&self, token: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(token).cloned()
    }

    /// Snapshot of all collected values
    pub fn values(&self) -> HashMap<String, String> {
        self.values.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Ask for every token at once and wait for all answers
    ///
    /// Values are only stored when every prompt was answered.
    pub async fn request_values(&self, command: &str, tokens: &BTreeSet<String>) -> PromptOutcome {
        if tokens.is_empty() {
            return PromptOutcome::Resolved;
        }
        debug!(command, ?tokens, "requesting prompt values");

        let requests = tokens.iter().map(|token| async move {
            (token.clone(), self.requester.request(token, command).await)
        });
        let answers = join_all(requests).await;

        let mut collected = Vec::with_capacity(answers.len());
        for (token, answer) in answers {
            match answer {
                Some(value) => collected.push((token, value)),
                None => {
                    info!(command, token = %token, "prompt dismissed, run cancelled");
                    return PromptOutcome::Cancelled { token };
                }
            }
        }

        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.extend(collected);
        PromptOutcome::Resolved
    }
}
