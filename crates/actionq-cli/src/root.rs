use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "actionq.yaml";

/// Resolve the runner configuration file.
///
/// Priority:
/// 1. `--config` flag / `ACTIONQ_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `start` looking for `actionq.yaml`
/// 3. None: built-in defaults apply
pub fn resolve_config(explicit: Option<&Path>, start: &Path) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
