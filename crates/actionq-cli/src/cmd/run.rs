use anyhow::Context;
use actionq_core::{RunnerConfig, Scenario, Trace};
use actionq_runtime::Replay;
use std::path::Path;

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// RunExit: typed non-zero exit codes (no std::process::exit in command code)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RunExit {
    Stalled { pending: usize },
}

impl RunExit {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunExit::Stalled { .. } => 2,
        }
    }
}

impl std::fmt::Display for RunExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunExit::Stalled { pending } => {
                write!(
                    f,
                    "sequencer stalled: an action never completed ({pending} still queued)"
                )
            }
        }
    }
}

impl std::error::Error for RunExit {}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

pub fn run(file: &Path, cfg: RunnerConfig, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(file)
        .with_context(|| format!("failed to load scenario {}", file.display()))?;
    let trace = Replay::new(cfg)
        .run(&scenario)
        .with_context(|| format!("failed to replay {}", file.display()))?;

    if json {
        print_json(&trace)?;
    } else {
        print_trace(&trace);
    }

    if trace.stalled {
        return Err(RunExit::Stalled {
            pending: trace.pending,
        }
        .into());
    }
    Ok(())
}

fn print_trace(trace: &Trace) {
    if let Some(name) = &trace.scenario {
        println!("scenario: {name}\n");
    }

    let rows: Vec<Vec<String>> = trace
        .events
        .iter()
        .map(|e| {
            vec![
                e.at_ms.to_string(),
                e.label.clone(),
                e.kind.as_str().to_string(),
            ]
        })
        .collect();
    print_table(&["AT_MS", "LABEL", "EVENT"], &rows);

    println!();
    println!("order: {}", trace.start_order().join(" → "));
    if trace.stalled {
        println!("stalled: yes ({} pending)", trace.pending);
    } else {
        println!("stalled: no");
    }
}
