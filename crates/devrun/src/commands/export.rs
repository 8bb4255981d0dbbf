use anyhow::{Context, Result};
use command_orchestration::{EngineConfig, builtin_commands, save_commands};
use devrun::load_registry;
use std::path::Path;
use std::process::ExitCode;

pub fn builtin() -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&builtin_commands())?);
    Ok(ExitCode::SUCCESS)
}

pub fn run(config: &EngineConfig, commands_file: Option<&Path>, path: &Path, all: bool) -> Result<ExitCode> {
    let (registry, _) = load_registry(config, commands_file)?;

    let commands = if all {
        registry.commands()
    } else {
        registry.overrides()
    };
    save_commands(path, commands).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} commands to {}", commands.len(), path.display());
    Ok(ExitCode::SUCCESS)
}
