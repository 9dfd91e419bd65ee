//! A queued unit of work: a callable with its arguments already bound.

use std::fmt;

use crate::sequencer::Sequencer;

/// An owned, one-shot action waiting in a frame.
///
/// The record is consumed when it is invoked, so ownership of the bound
/// arguments moves into the call.
pub struct ActionRecord {
    call: Box<dyn FnOnce(&Sequencer)>,
}

impl ActionRecord {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce(&Sequencer) + 'static,
    {
        Self {
            call: Box::new(action),
        }
    }

    /// Bind `args` to `action` now; they are handed over when the record runs.
    pub fn with_args<F, A>(action: F, args: A) -> Self
    where
        F: FnOnce(&Sequencer, A) + 'static,
        A: 'static,
    {
        Self::new(move |seq| action(seq, args))
    }

    pub(crate) fn invoke(self, seq: &Sequencer) {
        (self.call)(seq)
    }
}

impl fmt::Debug for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRecord").finish_non_exhaustive()
    }
}
