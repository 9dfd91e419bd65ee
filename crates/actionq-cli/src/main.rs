mod cmd;
mod output;
mod root;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "actionq",
    about = "Replay action sequencing scenarios and inspect the resulting order",
    version,
    propagate_version = true
)]
struct Cli {
    /// Runner configuration file (default: nearest actionq.yaml, else built-in defaults)
    #[arg(long, global = true, env = "ACTIONQ_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log sequencer dispatch decisions to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print its trace
    Run {
        /// Scenario YAML file
        file: PathBuf,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario YAML file
        file: PathBuf,
    },

    /// Inspect the runner configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = root::resolve_config(cli.config.as_deref(), &root::current_dir());
    let result = actionq_core::RunnerConfig::load_or_default(source.as_deref())
        .context("failed to load runner config")
        .and_then(|cfg| match cli.command {
            Commands::Run { file } => cmd::run::run(&file, cfg, cli.json),
            Commands::Check { file } => cmd::check::run(&file, &cfg, cli.json),
            Commands::Config { subcommand } => {
                cmd::config::run(source.as_deref(), &cfg, subcommand, cli.json)
            }
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<cmd::run::RunExit>()
            .map(|exit| exit.exit_code())
            .unwrap_or(1);
        std::process::exit(code);
    }
}
