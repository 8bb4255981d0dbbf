use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use command_orchestration::EngineConfig;
use devrun::ProjectArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[command(name = "devrun")]
#[command(about = "Run project build, test and version control commands")]
#[command(version)]
struct Cli {
    /// Engine configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User commands file (JSON); defaults to the user config directory
    #[arg(long, global = true)]
    commands: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List commands applicable to the project
    List {
        #[command(flatten)]
        project: ProjectArgs,

        /// Show every command, ignoring language and VCS filters
        #[arg(short, long)]
        all: bool,
    },

    /// Run a command by name
    Run {
        /// Command name
        name: String,

        #[command(flatten)]
        project: ProjectArgs,

        /// Prompt answer as TOKEN=VALUE, repeatable; skips asking when all are given
        #[arg(short, long = "prompt", value_parser = devrun::parse_prompt)]
        prompts: Vec<(String, String)>,
    },

    /// Show placeholder values for the project
    Vars {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Print the built-in commands as JSON
    Builtin,

    /// Write user commands to a file
    Export {
        /// Destination file
        path: PathBuf,

        /// Include built-in commands
        #[arg(short, long)]
        all: bool,
    },

    /// Render a debugger variable tree stored as JSON
    Inspect {
        /// Variable JSON file
        path: PathBuf,

        /// One entry per line
        #[arg(short, long)]
        multiline: bool,

        /// Maximum nesting depth
        #[arg(long)]
        depth: Option<usize>,

        /// Maximum characters per node before truncation
        #[arg(long)]
        max_len: Option<usize>,

        /// Print type information instead of the value
        #[arg(long)]
        info: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let commands_file = cli.commands.as_deref();

    smol::block_on(async {
        match cli.command {
            Commands::List { project, all } => commands::list::run(&config, commands_file, &project, all),
            Commands::Run { name, project, prompts } => {
                commands::run::run(&config, commands_file, &project, &name, prompts).await
            }
            Commands::Vars { project } => commands::vars::run(&project),
            Commands::Builtin => commands::export::builtin(),
            Commands::Export { path, all } => commands::export::run(&config, commands_file, &path, all),
            Commands::Inspect {
                path,
                multiline,
                depth,
                max_len,
                info,
            } => commands::inspect::run(&path, multiline, depth, max_len, info),
        }
    })
}
