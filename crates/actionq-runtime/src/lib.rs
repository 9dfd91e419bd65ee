//! `actionq-runtime`: drive an [`actionq_core::Sequencer`] from tokio.
//!
//! The sequencer is `!Send`, so everything here runs on a current-thread
//! runtime inside a [`tokio::task::LocalSet`].
//!
//! # Architecture
//!
//! ```text
//! Scenario (YAML)
//!     │
//!     ▼
//! Replay          ← current-thread runtime, paused clock when virtual_time
//!     │
//!     ▼
//! drive()         ← local task playing the timeline into the Sequencer
//!     │
//!     ▼
//! Recorder        ← turns ActionSpecs into actions; waits go through
//!     │              spawn_suspended / spawn_deferred
//!     ▼
//! Trace           ← started / suspended / resumed / completed / dropped
//! ```

pub mod adapter;
pub mod error;
pub mod replay;


pub use adapter::{spawn_deferred, spawn_suspended};
pub use error::RuntimeError;
pub use replay::{drive, Recorder, Replay, SEQUENCER_LABEL};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Load, validate and replay the scenario at `path`.
pub fn replay_file(
    path: &std::path::Path,
    cfg: actionq_core::RunnerConfig,
) -> Result<actionq_core::Trace> {
    let scenario = actionq_core::Scenario::load(path)?;
    Replay::new(cfg).run(&scenario)
}
