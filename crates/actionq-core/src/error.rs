use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionqError {
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("duplicate action label: {0}")]
    DuplicateLabel(String),

    #[error("{what} of {ms}ms in '{label}' exceeds max_delay_ms={max}")]
    DelayTooLarge {
        label: String,
        what: &'static str,
        ms: u64,
        max: u64,
    },

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ActionqError>;
