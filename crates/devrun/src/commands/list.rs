use anyhow::Result;
use command_orchestration::{CommandDefinition, EngineConfig};
use comfy_table::{Cell, Color, Table};
use devrun::{ProjectArgs, load_registry};
use std::path::Path;
use std::process::ExitCode;

pub fn run(config: &EngineConfig, commands_file: Option<&Path>, project: &ProjectArgs, all: bool) -> Result<ExitCode> {
    let (registry, overrides_path) = load_registry(config, commands_file)?;

    let names = if all {
        registry.commands().iter().map(|c| c.name.clone()).collect()
    } else {
        let vcs = project.active_vcs(&config.version_control_systems)?;
        registry.filter_names(project.languages.as_slice(), vcs.as_deref())
    };

    let mut table = Table::new();
    table.set_header(vec!["COMMAND", "LANGUAGES", "STEPS", "WAIT", "SOURCE", "DESCRIPTION"]);

    for name in &names {
        let cmd = registry.by_name(name)?;
        let custom = registry.overrides().iter().any(|o| &o.name == name);
        table.add_row(vec![
            Cell::new(&cmd.name),
            Cell::new(languages(cmd)),
            Cell::new(cmd.steps.len()),
            Cell::new(if cmd.runs_synchronously() { "yes" } else { "no" }),
            if custom {
                Cell::new("user").fg(Color::Cyan)
            } else {
                Cell::new("built-in").fg(Color::DarkGrey)
            },
            Cell::new(&cmd.description),
        ]);
    }

    println!("{}", table);
    if let Some(path) = overrides_path {
        println!("User commands: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn languages(cmd: &CommandDefinition) -> String {
    if cmd.languages.is_empty() {
        "any".to_string()
    } else {
        cmd.languages.join(", ")
    }
}
