use crate::error::{ActionqError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// RunnerConfig
// ---------------------------------------------------------------------------

/// Settings for replaying scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Start the replay clock paused so timers resolve instantly and in order.
    #[serde(default = "default_virtual_time")]
    pub virtual_time: bool,
    /// Upper bound for any `at_ms` or `wait.ms` in a scenario.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Record `completed` events in the trace, not only `started`.
    #[serde(default = "default_trace_completions")]
    pub trace_completions: bool,
}

fn default_virtual_time() -> bool {
    true
}

fn default_max_delay_ms() -> u64 {
    600_000
}

fn default_trace_completions() -> bool {
    true
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            virtual_time: default_virtual_time(),
            max_delay_ms: default_max_delay_ms(),
            trace_completions: default_trace_completions(),
        }
    }
}

impl RunnerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ActionqError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: RunnerConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
