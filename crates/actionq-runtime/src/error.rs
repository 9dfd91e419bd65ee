use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Scenario(#[from] actionq_core::ActionqError),

    #[error("failed to build replay runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
