//! Building engine inputs from command line arguments

use anyhow::{Context, Result, bail};
use command_orchestration::{CommandRegistry, EngineConfig, ProjectContext, default_commands_path};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Project description shared by the subcommands
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// File the command applies to, relative to the project root or absolute
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Build directory for {BuildDir}
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Build target for {BuildTarget}
    #[arg(long)]
    pub build_target: Option<String>,

    /// Executable for {RunExec}
    #[arg(long)]
    pub run_exec: Option<PathBuf>,

    /// Active languages, repeatable
    #[arg(long = "lang")]
    pub languages: Vec<String>,

    /// Active version control system (detected from the project root when omitted)
    #[arg(long)]
    pub vcs: Option<String>,
}

impl ProjectArgs {
    /// Project root as given, or the current directory
    pub fn root(&self) -> Result<PathBuf> {
        match &self.project {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    /// Placeholder values for this project
    pub fn context(&self) -> Result<ProjectContext> {
        let root = self.root()?;
        let mut context = ProjectContext::new().with_project_root(&root);
        if let Some(file) = &self.file {
            context = context.with_file(root.join(file));
        }
        if let Some(dir) = &self.build_dir {
            context = context.with_build_dir(root.join(dir));
        }
        if let Some(target) = &self.build_target {
            context = context.with_build_target(target.clone());
        }
        if let Some(exec) = &self.run_exec {
            context = context.with_run_exec(root.join(exec));
        }
        Ok(context)
    }

    /// Active VCS: the flag, else the first of `known` with a `.<name>` directory in the root
    pub fn active_vcs(&self, known: &[String]) -> Result<Option<String>> {
        if self.vcs.is_some() {
            return Ok(self.vcs.clone());
        }
        let root = self.root()?;
        Ok(known
            .iter()
            .find(|name| root.join(format!(".{}", name.to_lowercase())).is_dir())
            .cloned())
    }
}

/// Registry with the user's overrides applied, and the overrides path used
///
/// The path comes from `explicit`, then the config, then the user config
/// directory. A missing overrides file is not an error.
pub fn load_registry(config: &EngineConfig, explicit: Option<&Path>) -> Result<(CommandRegistry, Option<PathBuf>)> {
    let mut registry = CommandRegistry::default().with_vcs_names(config.version_control_systems.clone());
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.commands_file.clone())
        .or_else(default_commands_path);

    if let Some(path) = &path {
        if path.exists() {
            registry
                .load_overrides(path)
                .with_context(|| format!("Failed to load commands from {}", path.display()))?;
            info!(path = %path.display(), count = registry.overrides().len(), "loaded user commands");
        } else {
            debug!(path = %path.display(), "no user commands file");
        }
    }
    Ok((registry, path))
}

/// Parse `TOKEN=VALUE`
pub fn parse_prompt(arg: &str) -> Result<(String, String)> {
    let Some((token, value)) = arg.split_once('=') else {
        bail!("Expected TOKEN=VALUE, got '{}'", arg);
    };
    let token = token.trim().trim_start_matches('{').trim_end_matches('}');
    if token.is_empty() {
        bail!("Empty prompt token in '{}'", arg);
    }
    Ok((token.to_string(), value.to_string()))
}
