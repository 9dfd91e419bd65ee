use crate::output::print_json;
use actionq_core::RunnerConfig;
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective runner configuration
    Show,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    source: Option<&Path>,
    cfg: &RunnerConfig,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(source, cfg, json),
    }
}

fn show(source: Option<&Path>, cfg: &RunnerConfig, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(cfg);
    }
    match source {
        Some(p) => println!("# source: {}", p.display()),
        None => println!("# source: built-in defaults"),
    }
    print!("{}", serde_yaml::to_string(cfg)?);
    Ok(())
}
