use anyhow::{Context, Result};
use command_orchestration::{CommandRunner, EngineConfig, OutputSink, RunOutcome};
use devrun::{ProjectArgs, StderrStatus, StdinPrompter, TerminalSink, load_registry};
use std::collections::HashSet;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config: &EngineConfig,
    commands_file: Option<&Path>,
    project: &ProjectArgs,
    name: &str,
    prompts: Vec<(String, String)>,
) -> Result<ExitCode> {
    let (registry, _) = load_registry(config, commands_file)?;
    let context = project.context()?;

    let runner = CommandRunner::local(Arc::new(context), Arc::new(StdinPrompter::new()))
        .with_status_reporter(Arc::new(StderrStatus))
        .with_config(config.clone());

    if !prompts.is_empty() {
        for (token, value) in &prompts {
            runner.prompts().preset(token.as_str(), value.as_str());
        }
        // Only skip asking when every prompt of the command was answered up front
        if let Ok(command) = registry.by_name(name) {
            let given: HashSet<&str> = prompts.iter().map(|(token, _)| token.as_str()).collect();
            if command.prompts().iter().all(|token| given.contains(token.as_str())) {
                runner.prompts().suppress_next();
            }
        }
    }

    let sink: Arc<dyn OutputSink> = Arc::new(TerminalSink::detect());
    let report = match runner.run_named(&registry, name, Some(sink)).await? {
        RunOutcome::Completed(report) => report,
        RunOutcome::Background(run) => {
            info!(command = run.command(), "waiting for background run");
            run.wait().await.context("Background run ended without a report")?
        }
        RunOutcome::Cancelled { token } => {
            eprintln!("Cancelled: no value for {{{}}}", token);
            return Ok(ExitCode::from(130));
        }
    };

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
