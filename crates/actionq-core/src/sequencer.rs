//! The action sequencer: at most one action owns execution at a time, and
//! anything an action enqueues runs to completion before control returns to
//! actions queued earlier at an outer level.
//!
//! The [`Sequencer`] is a cheap clonable handle. Every clone drives the same
//! state. It is `!Send`: the primitive assumes a single cooperative thread.
//!
//! # Dispatch
//!
//! - `enqueue` on an idle sequencer runs the action in place, without a frame.
//! - `enqueue` on an active sequencer appends to the innermost frame, opening
//!   one if the stack is empty.
//! - `complete` collapses trailing empty frames, then runs the front record of
//!   the innermost frame inside a freshly pushed frame for its own children.
//! - `begin_suspension` collapses the same way, so work enqueued during the
//!   wait lands beside the suspended action's pending ancestors.
//! - `end_suspension` re-opens a child frame for the resuming action.
//!
//! Invocation is iterative. The outermost `enqueue` or `complete` on the
//! Rust stack owns a dispatch loop; a `complete` made from inside a running
//! action does the frame bookkeeping and hands the selected record to that
//! loop, which invokes it once the current action returns. A long run of
//! actions that complete synchronously therefore uses constant stack.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::frame::FrameStack;
use crate::record::ActionRecord;
use crate::suspension::Suspension;

#[derive(Debug, Default)]
struct State {
    active: bool,
    closed: bool,
    suspended: bool,
    frames: FrameStack,
    /// A dispatch loop is running further down the stack.
    dispatching: bool,
    /// Selected for dispatch, waiting for the running action to return.
    next: Option<ActionRecord>,
}

#[derive(Clone, Default)]
pub struct Sequencer {
    state: Rc<RefCell<State>>,
}

impl Sequencer {
    /// A fresh, idle sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action`, or run it immediately if the sequencer is idle.
    pub fn enqueue<F>(&self, action: F) -> &Self
    where
        F: FnOnce(&Sequencer) + 'static,
    {
        self.submit(ActionRecord::new(action))
    }

    /// Like [`enqueue`](Self::enqueue), binding `args` to the call.
    pub fn enqueue_with<F, A>(&self, action: F, args: A) -> &Self
    where
        F: FnOnce(&Sequencer, A) + 'static,
        A: 'static,
    {
        self.submit(ActionRecord::with_args(action, args))
    }

    fn submit(&self, record: ActionRecord) -> &Self {
        let run_now = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                trace!("sequencer closed; dropping action");
                return self;
            }
            if state.active {
                if state.frames.is_empty() {
                    state.frames.push_frame();
                    trace!("opened root frame");
                }
                state.frames.append_to_last(record);
                trace!(
                    depth = state.frames.depth(),
                    pending = state.frames.pending(),
                    "action queued"
                );
                None
            } else {
                state.active = true;
                Some(record)
            }
        };

        if let Some(record) = run_now {
            debug!("idle sequencer; running action in place");
            self.dispatch(record);
        }
        self
    }

    /// Invoke `record`, or hand it to the dispatch loop already on the stack.
    fn dispatch(&self, record: ActionRecord) {
        {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                state.next = Some(record);
                return;
            }
            state.dispatching = true;
        }

        let _loop = DispatchLoop(self);
        let mut record = record;
        loop {
            record.invoke(self);
            let next = self.state.borrow_mut().next.take();
            match next {
                Some(queued) => record = queued,
                None => break,
            }
        }
    }

    /// Signal that the in-flight action has finished and dispatch the next one.
    pub fn complete(&self) -> &Self {
        let next = {
            let mut state = self.state.borrow_mut();
            if !state.active {
                warn!("complete() called with no action in flight");
                debug_assert!(state.active, "complete() called with no action in flight");
                return self;
            }
            if state.next.is_some() {
                warn!("complete() called twice by the same action");
                debug_assert!(state.next.is_none(), "complete() called twice by the same action");
                return self;
            }
            if state.suspended {
                warn!("complete() called while suspended; missing end_suspension()");
                debug_assert!(!state.suspended, "complete() called while suspended");
                state.suspended = false;
            }

            state.frames.collapse();
            match state.frames.take_front_of_last() {
                Some(record) => {
                    state.frames.push_frame();
                    debug!(
                        depth = state.frames.depth(),
                        pending = state.frames.pending(),
                        "dispatching next action"
                    );
                    Some(record)
                }
                None => {
                    state.active = false;
                    debug!("queue drained; sequencer idle");
                    None
                }
            }
        };

        if let Some(record) = next {
            self.dispatch(record);
        }
        self
    }

    /// Mark the in-flight action as waiting on an external result.
    pub fn begin_suspension(&self) -> &Self {
        let mut state = self.state.borrow_mut();
        if state.suspended {
            warn!("begin_suspension() called twice without end_suspension()");
            debug_assert!(!state.suspended, "nested suspension is unsupported");
        }
        if !state.active {
            warn!("begin_suspension() called with no action in flight");
            debug_assert!(state.active, "begin_suspension() called with no action in flight");
            return self;
        }
        state.suspended = true;
        let removed = state.frames.collapse();
        debug!(
            removed,
            depth = state.frames.depth(),
            "action suspended"
        );
        self
    }

    /// Resume the suspended action, reserving a frame for its children.
    pub fn end_suspension(&self) -> &Self {
        let mut state = self.state.borrow_mut();
        if !state.suspended {
            warn!("end_suspension() called without begin_suspension()");
            debug_assert!(state.suspended, "end_suspension() without begin_suspension()");
        }
        state.suspended = false;
        state.frames.push_frame();
        debug!(depth = state.frames.depth(), "action resumed");
        self
    }

    /// Begin a suspension and return the token that ends it.
    pub fn suspend(&self) -> Suspension {
        self.begin_suspension();
        Suspension::new(self.clone())
    }

    /// Refuse all future `enqueue` calls. Work already queued keeps draining.
    pub fn close(&self) -> &Self {
        let mut state = self.state.borrow_mut();
        if !state.closed {
            state.closed = true;
            debug!(pending = state.frames.pending(), "sequencer closed");
        }
        self
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub fn is_suspended(&self) -> bool {
        self.state.borrow().suspended
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.state.borrow().frames.depth()
    }

    /// Number of queued actions not yet dispatched.
    pub fn pending(&self) -> usize {
        self.state.borrow().frames.pending()
    }

    /// Record count per open frame, outermost first.
    pub fn frame_sizes(&self) -> Vec<usize> {
        self.state.borrow().frames.frame_sizes()
    }
}

/// Clears the dispatching flag when the loop exits, including by unwinding
/// out of a panicking action.
struct DispatchLoop<'a>(&'a Sequencer);

impl Drop for DispatchLoop<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.state.try_borrow_mut() {
            state.dispatching = false;
            state.next = None;
        }
    }
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Sequencer")
            .field("active", &state.active)
            .field("closed", &state.closed)
            .field("suspended", &state.suspended)
            .field("frames", &state.frames.frame_sizes())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
