use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use actionq_core::{ActionSpec, EventKind, RunnerConfig, Scenario, Sequencer, Trace, TraceEvent};
use tokio::task::LocalSet;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::adapter::{spawn_deferred, spawn_suspended};
use crate::error::RuntimeError;

/// Label recorded for sequencer-level events such as `closed`.
pub const SEQUENCER_LABEL: &str = "sequencer";

// ─── Replay ───────────────────────────────────────────────────────────────

/// Executes a [`Scenario`] against a fresh [`Sequencer`] and records a [`Trace`].
#[derive(Debug, Clone, Default)]
pub struct Replay {
    cfg: RunnerConfig,
}

impl Replay {
    pub fn new(cfg: RunnerConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Validate and replay `scenario` on a dedicated current-thread runtime.
    ///
    /// With `virtual_time` the clock starts paused, so the replay finishes
    /// immediately and timers fire in deadline order.
    pub fn run(&self, scenario: &Scenario) -> Result<Trace, RuntimeError> {
        scenario.validate(&self.cfg)?;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(self.cfg.virtual_time)
            .build()
            .map_err(RuntimeError::Runtime)?;

        let seq = Sequencer::new();
        let local = LocalSet::new();
        let recorder = {
            let _guard = rt.enter();
            Recorder::new(self.cfg.trace_completions)
        };
        local.spawn_local(drive(seq.clone(), scenario.clone(), recorder.clone()));
        rt.block_on(local);

        let trace = recorder.finish_trace(scenario.name.clone(), &seq);
        info!(
            events = trace.events.len(),
            stalled = trace.stalled,
            pending = trace.pending,
            "replay finished"
        );
        Ok(trace)
    }
}

// ─── Driver ───────────────────────────────────────────────────────────────

/// Play the scenario timeline into `seq`. Runs as a local task; actions
/// spawn further local tasks for their waits.
pub async fn drive(seq: Sequencer, scenario: Scenario, recorder: Recorder) {
    let mut close_at = scenario.close_at_ms;
    let timeline = scenario.timeline();

    let (initial, later): (Vec<_>, Vec<_>) = timeline.into_iter().partition(|e| e.at_ms == 0);
    let initial: Vec<ActionSpec> = initial
        .into_iter()
        .flat_map(|e| e.actions.iter().cloned())
        .collect();

    if scenario.batch_initial {
        let rec = recorder.clone();
        debug!(count = initial.len(), "seeding initial actions inside root action");
        seq.enqueue(move |seq| {
            for spec in initial {
                rec.enqueue(seq, spec);
            }
            seq.complete();
        });
    } else {
        for spec in initial {
            recorder.enqueue(&seq, spec);
        }
    }
    if close_at == Some(0) {
        recorder.close(&seq);
        close_at = None;
    }

    for entry in later {
        if let Some(ms) = close_at.filter(|ms| *ms < entry.at_ms) {
            recorder.sleep_until(ms).await;
            recorder.close(&seq);
            close_at = None;
        }
        recorder.sleep_until(entry.at_ms).await;
        for spec in &entry.actions {
            recorder.enqueue(&seq, spec.clone());
        }
    }

    if let Some(ms) = close_at {
        recorder.sleep_until(ms).await;
        recorder.close(&seq);
    }
}

// ─── Recorder ─────────────────────────────────────────────────────────────

/// Shared trace sink; turns [`ActionSpec`]s into sequencer actions that log
/// what they do.
#[derive(Debug, Clone)]
pub struct Recorder {
    start: Instant,
    trace_completions: bool,
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl Recorder {
    /// Must be created inside a tokio runtime; the clock starts now.
    pub fn new(trace_completions: bool) -> Self {
        Self {
            start: Instant::now(),
            trace_completions,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn record(&self, label: &str, kind: EventKind) {
        let at_ms = self.elapsed_ms();
        debug!(at_ms, label, kind = kind.as_str(), "trace");
        self.events.borrow_mut().push(TraceEvent {
            at_ms,
            label: label.to_string(),
            kind,
        });
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Enqueue `spec` on `seq`, or record it as dropped if `seq` is closed.
    pub fn enqueue(&self, seq: &Sequencer, spec: ActionSpec) {
        if seq.is_closed() {
            self.record(&spec.label, EventKind::Dropped);
            return;
        }
        let rec = self.clone();
        seq.enqueue(move |seq| rec.perform(seq, spec));
    }

    fn close(&self, seq: &Sequencer) {
        seq.close();
        self.record(SEQUENCER_LABEL, EventKind::Closed);
    }

    async fn sleep_until(&self, at_ms: u64) {
        tokio::time::sleep_until(self.start + Duration::from_millis(at_ms)).await;
    }

    fn perform(&self, seq: &Sequencer, spec: ActionSpec) {
        let ActionSpec {
            label,
            children,
            wait,
            then,
            complete,
        } = spec;

        self.record(&label, EventKind::Started);
        for child in children {
            self.enqueue(seq, child);
        }

        let Some(wait) = wait else {
            self.finish(seq, &label, complete);
            return;
        };

        let rec = self.clone();
        let timer = tokio::time::sleep(Duration::from_millis(wait.ms));
        if wait.suspend {
            self.record(&label, EventKind::Suspended);
            spawn_suspended(seq, timer, move |seq, ()| {
                rec.record(&label, EventKind::Resumed);
                for spec in then {
                    rec.enqueue(seq, spec);
                }
                rec.finish(seq, &label, complete);
            });
        } else {
            spawn_deferred(seq, timer, move |seq, ()| {
                for spec in then {
                    rec.enqueue(seq, spec);
                }
                rec.finish(seq, &label, complete);
            });
        }
    }

    fn finish(&self, seq: &Sequencer, label: &str, complete: bool) {
        if !complete {
            debug!(label, "action never completes");
            return;
        }
        if self.trace_completions {
            self.record(label, EventKind::Completed);
        }
        seq.complete();
    }

    /// Snapshot the trace once the replay has drained.
    pub fn finish_trace(&self, scenario: Option<String>, seq: &Sequencer) -> Trace {
        Trace {
            scenario,
            events: self.events(),
            stalled: seq.is_active(),
            pending: seq.pending(),
        }
    }
}
