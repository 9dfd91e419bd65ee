use anyhow::Context;
use actionq_core::{RunnerConfig, Scenario};
use std::path::Path;

use crate::output::print_json;

pub fn run(file: &Path, cfg: &RunnerConfig, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(file)
        .with_context(|| format!("failed to load scenario {}", file.display()))?;
    scenario
        .validate(cfg)
        .with_context(|| format!("{} is not a valid scenario", file.display()))?;

    let actions = scenario.actions().len();
    if json {
        print_json(&serde_json::json!({
            "file": file.display().to_string(),
            "name": scenario.name,
            "actions": actions,
            "valid": true,
        }))?;
    } else {
        println!("ok: {} ({actions} actions)", file.display());
    }
    Ok(())
}
