//! Command registry
//!
//! Two layers: the compiled-in built-ins and the user's overrides. The
//! effective set is recomputed with [`merge`] whenever the override layer
//! changes, so lookups never see a half-updated list.

use crate::builtin::builtin_commands;
use crate::command::CommandDefinition;
use crate::persist::{load_commands, save_commands};
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Combine `builtins` with `overrides` by name
///
/// An override replaces the built-in with the same name at the built-in's
/// position; other overrides are appended in their own order.
pub fn merge(builtins: &[CommandDefinition], overrides: &[CommandDefinition]) -> Vec<CommandDefinition> {
    let mut merged = builtins.to_vec();
    for cmd in overrides {
        match merged.iter_mut().find(|existing| existing.name == cmd.name) {
            Some(slot) => *slot = cmd.clone(),
            None => merged.push(cmd.clone()),
        }
    }
    merged
}

/// Whether `name` contains `vcs` as a whitespace-separated word
fn mentions(name: &str, vcs: &str) -> bool {
    name.split_whitespace().any(|word| word == vcs)
}

/// Built-in and user commands with language and VCS filtering
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    builtins: Vec<CommandDefinition>,
    overrides: Vec<CommandDefinition>,
    effective: Vec<CommandDefinition>,
    vcs_names: Vec<String>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(builtin_commands())
    }
}

impl CommandRegistry {
    /// Registry over `builtins` with no overrides and the default VCS names
    pub fn new(builtins: Vec<CommandDefinition>) -> Self {
        Self {
            effective: builtins.clone(),
            builtins,
            overrides: Vec::new(),
            vcs_names: vec!["Git".to_string(), "SVN".to_string()],
        }
    }

    /// Set the version control system names known to [`filter_names`](Self::filter_names)
    pub fn with_vcs_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vcs_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the override layer and recompute the effective set
    pub fn set_overrides(&mut self, overrides: Vec<CommandDefinition>) {
        self.overrides = overrides;
        self.effective = merge(&self.builtins, &self.overrides);
        debug!(
            overrides = self.overrides.len(),
            effective = self.effective.len(),
            "command registry updated"
        );
    }

    /// The compiled-in layer
    pub fn builtins(&self) -> &[CommandDefinition] {
        &self.builtins
    }

    /// The user layer
    pub fn overrides(&self) -> &[CommandDefinition] {
        &self.overrides
    }

    /// Built-ins with overrides applied
    pub fn commands(&self) -> &[CommandDefinition] {
        &self.effective
    }

    /// Look up a command in the effective set
    pub fn by_name(&self, name: &str) -> Result<&CommandDefinition> {
        self.effective
            .iter()
            .find(|cmd| cmd.name == name)
            .ok_or_else(|| Error::CommandNotFound(name.to_string()))
    }

    /// Names of commands applicable to `languages`, in registry order
    pub fn language_names<S: AsRef<str>>(&self, languages: &[S]) -> Vec<String> {
        self.effective
            .iter()
            .filter(|cmd| cmd.matches_languages(languages))
            .map(|cmd| cmd.name.clone())
            .collect()
    }

    /// Names applicable to `languages` and the active version control system
    ///
    /// Commands naming a known VCS other than `vcs` are dropped; commands
    /// naming no VCS are kept. With no active VCS nothing is dropped.
    pub fn filter_names<S: AsRef<str>>(&self, languages: &[S], vcs: Option<&str>) -> Vec<String> {
        let names = self.language_names(languages);
        let Some(active) = vcs.filter(|v| !v.is_empty()) else {
            return names;
        };
        names
            .into_iter()
            .filter(|name| {
                mentions(name, active)
                    || !self
                        .vcs_names
                        .iter()
                        .any(|other| other != active && mentions(name, other))
            })
            .collect()
    }

    /// Replace the override layer with the commands stored at `path`
    ///
    /// On failure the registry is left unchanged.
    pub fn load_overrides(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match load_commands(path) {
            Ok(commands) => {
                self.set_overrides(commands);
                Ok(())
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not load command overrides");
                Err(err)
            }
        }
    }

    /// Write the override layer to `path`
    pub fn save_overrides(&self, path: impl AsRef<Path>) -> Result<()> {
        save_commands(path, &self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ProcessStep;

    fn named(name: &str) -> CommandDefinition {
        CommandDefinition::new(name, ProcessStep::new("true", Vec::<String>::new()))
    }

    fn names(cmds: &[CommandDefinition]) -> Vec<&str> {
        cmds.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_merge_replaces_in_place_and_appends() {
        let builtins = vec![named("A"), named("B")];
        let b_prime = named("B").with_description("custom");
        let merged = merge(&builtins, &[b_prime.clone(), named("C")]);

        assert_eq!(names(&merged), vec!["A", "B", "C"]);
        assert_eq!(merged[1], b_prime);
        // Inputs untouched
        assert_eq!(builtins[1].description, "");
    }

    #[test]
    fn test_vcs_filter() {
        let registry = CommandRegistry::new(vec![named("Commit Git"), named("Commit SVN"), named("List Dir")]);
        let none: [&str; 0] = [];

        assert_eq!(registry.filter_names(&none, Some("Git")), vec!["Commit Git", "List Dir"]);
        assert_eq!(registry.filter_names(&none, Some("SVN")), vec!["Commit SVN", "List Dir"]);
        assert_eq!(registry.filter_names(&none, None).len(), 3);
    }

    #[test]
    fn test_vcs_filter_whole_words() {
        let registry = CommandRegistry::new(vec![named("Gitlab Deploy"), named("Status SVN")]);
        let none: [&str; 0] = [];
        assert_eq!(registry.filter_names(&none, Some("Git")), vec!["Gitlab Deploy"]);
    }

    #[test]
    fn test_language_filter() {
        let registry = CommandRegistry::new(vec![
            named("Build Go").with_languages(["Go"]),
            named("List Dir"),
            named("LaTeX PDF").with_languages(["LaTeX"]),
        ]);
        assert_eq!(registry.language_names(&["Go"]), vec!["Build Go", "List Dir"]);
        assert_eq!(registry.language_names::<&str>(&[]), vec!["List Dir"]);
    }

    #[test]
    fn test_by_name_miss() {
        let registry = CommandRegistry::default();
        assert!(registry.by_name("List Dir").is_ok());
        assert!(matches!(
            registry.by_name("Nope"),
            Err(Error::CommandNotFound(name)) if name == "Nope"
        ));
    }

    #[test]
    fn test_load_failure_leaves_registry_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = CommandRegistry::new(vec![named("A")]);
        registry.set_overrides(vec![named("B")]);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[{").unwrap();
        assert!(registry.load_overrides(&bad).is_err());
        assert!(registry.load_overrides(dir.path().join("missing.json")).is_err());

        assert_eq!(names(registry.commands()), vec!["A", "B"]);
        assert_eq!(names(registry.overrides()), vec!["B"]);
    }

    #[test]
    fn test_save_then_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmds.json");

        let mut registry = CommandRegistry::new(vec![named("A")]);
        registry.set_overrides(vec![named("A").with_description("mine"), named("Z")]);
        registry.save_overrides(&path).unwrap();

        let mut fresh = CommandRegistry::new(vec![named("A")]);
        fresh.load_overrides(&path).unwrap();
        assert_eq!(names(fresh.commands()), vec!["A", "Z"]);
        assert_eq!(fresh.by_name("A").unwrap().description, "mine");
    }
}
