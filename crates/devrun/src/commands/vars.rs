use anyhow::Result;
use command_orchestration::{PLACEHOLDER_NAMES, is_prompt_token};
use comfy_table::{Cell, Color, Table};
use devrun::ProjectArgs;
use std::process::ExitCode;

pub fn run(project: &ProjectArgs) -> Result<ExitCode> {
    let context = project.context()?;

    let mut table = Table::new();
    table.set_header(vec!["PLACEHOLDER", "VALUE"]);

    for name in PLACEHOLDER_NAMES {
        let value = match context.get(name) {
            Some(value) => Cell::new(value),
            None if is_prompt_token(name) => Cell::new("(asked when run)").fg(Color::Yellow),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        table.add_row(vec![Cell::new(format!("{{{}}}", name)), value]);
    }

    println!("{}", table);
    Ok(ExitCode::SUCCESS)
}
