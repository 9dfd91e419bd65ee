//! `actionq-core`: a serial, cooperative action sequencer.
//!
//! At most one action owns execution at a time. An action may enqueue more
//! actions, either during its own turn or while suspended on an external
//! result, and those run depth-first before the sequencer returns to actions
//! queued earlier at an outer level.
//!
//! ```rust
//! use actionq_core::Sequencer;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let order = Rc::new(RefCell::new(Vec::new()));
//! let seq = Sequencer::new();
//!
//! let log = order.clone();
//! seq.enqueue(move |seq| {
//!     log.borrow_mut().push("parent");
//!     let child_log = log.clone();
//!     seq.enqueue(move |seq| {
//!         child_log.borrow_mut().push("child");
//!         seq.complete();
//!     })
//!     .complete();
//! });
//!
//! assert_eq!(*order.borrow(), ["parent", "child"]);
//! assert!(!seq.is_active());
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod record;
pub mod scenario;
pub mod sequencer;
pub mod suspension;

pub use config::RunnerConfig;
pub use error::{ActionqError, Result};
pub use record::ActionRecord;
pub use scenario::{ActionSpec, EventKind, Scenario, ScheduleEntry, Trace, TraceEvent, Wait};
pub use sequencer::Sequencer;
pub use suspension::Suspension;
