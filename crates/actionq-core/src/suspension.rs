use tracing::warn;

use crate::sequencer::Sequencer;

/// Proof that the in-flight action is suspended.
///
/// Returned by [`Sequencer::suspend`]. Consuming it with [`resume`](Self::resume)
/// ends the suspension exactly once. Dropping it unresumed leaves the sequencer
/// stalled: nothing queued behind the suspended action will ever run.
#[must_use = "a suspension must be resumed, or the sequencer stalls"]
#[derive(Debug)]
pub struct Suspension {
    seq: Sequencer,
    resumed: bool,
}

impl Suspension {
    pub(crate) fn new(seq: Sequencer) -> Self {
        Self {
            seq,
            resumed: false,
        }
    }

    /// End the suspension and hand back the sequencer so the resumed action
    /// can enqueue children and call [`Sequencer::complete`].
    pub fn resume(mut self) -> Sequencer {
        self.resumed = true;
        self.seq.end_suspension();
        self.seq.clone()
    }
}

impl Drop for Suspension {
    fn drop(&mut self) {
        if !self.resumed {
            warn!(
                pending = self.seq.pending(),
                "suspension dropped without resume; sequencer stalled"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_reopens_child_frame() {
        let seq = Sequencer::new();
        seq.enqueue(|_| {});
        let token = seq.suspend();
        assert!(seq.is_suspended());

        let resumed = token.resume();
        assert!(!seq.is_suspended());
        assert_eq!(resumed.frame_sizes(), vec![0]);

        resumed.complete();
        assert!(!seq.is_active());
    }

    #[test]
    fn resumed_handle_drives_the_suspended_sequencer() {
        let seq = Sequencer::new();
        seq.enqueue(|_| {});
        let resumed = seq.suspend().resume();

        resumed.enqueue(|_| {});
        assert_eq!(seq.frame_sizes(), vec![1]);
        assert!(!seq.is_suspended());

        resumed.complete();
        assert!(seq.is_active());
        assert_eq!(seq.pending(), 0);
    }

    #[test]
    fn dropping_token_leaves_sequencer_suspended() {
        let seq = Sequencer::new();
        seq.enqueue(|_| {});
        drop(seq.suspend());

        assert!(seq.is_suspended());
        assert!(seq.is_active());
    }
}
