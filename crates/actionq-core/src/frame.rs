//! Stack of FIFO frames holding pending action records.
//!
//! Index 0 is the outermost frame, the last index the innermost. Frames are
//! only pushed or popped at the end, or mutated in place. All preconditions
//! are upheld by the dispatcher in [`crate::sequencer`].

use std::collections::VecDeque;

use crate::record::ActionRecord;

#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<VecDeque<ActionRecord>>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self) {
        self.frames.push(VecDeque::new());
    }

    /// Remove the innermost frame. Callers only pop frames that are empty.
    pub fn pop_frame(&mut self) -> Option<VecDeque<ActionRecord>> {
        self.frames.pop()
    }

    /// Append to the innermost frame. The stack must be non-empty.
    pub fn append_to_last(&mut self, record: ActionRecord) {
        if let Some(last) = self.frames.last_mut() {
            last.push_back(record);
        }
    }

    pub fn take_front(&mut self, index: usize) -> Option<ActionRecord> {
        self.frames.get_mut(index)?.pop_front()
    }

    pub fn take_front_of_last(&mut self) -> Option<ActionRecord> {
        self.frames.last_mut()?.pop_front()
    }

    /// Pop empty frames off the top until the innermost frame has pending
    /// records or the stack is empty. Returns the number of frames removed.
    pub fn collapse(&mut self) -> usize {
        let mut removed = 0;
        while self.frames.last().is_some_and(VecDeque::is_empty) {
            self.frames.pop();
            removed += 1;
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Total number of records waiting across all frames.
    pub fn pending(&self) -> usize {
        self.frames.iter().map(VecDeque::len).sum()
    }

    /// Record count per frame, outermost first.
    pub fn frame_sizes(&self) -> Vec<usize> {
        self.frames.iter().map(VecDeque::len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ActionRecord {
        ActionRecord::new(|_| {})
    }

    #[test]
    fn collapse_pops_only_trailing_empty_frames() {
        let mut stack = FrameStack::new();
        stack.push_frame();
        stack.append_to_last(noop());
        stack.push_frame();
        stack.push_frame();
        stack.push_frame();
        stack.append_to_last(noop());
        stack.push_frame();

        assert_eq!(stack.frame_sizes(), vec![1, 0, 0, 1, 0]);
        assert_eq!(stack.collapse(), 1);
        assert_eq!(stack.frame_sizes(), vec![1, 0, 0, 1]);

        assert!(stack.take_front_of_last().is_some());
        assert_eq!(stack.collapse(), 3);
        assert_eq!(stack.frame_sizes(), vec![1]);
    }

    #[test]
    fn collapse_on_all_empty_clears_stack() {
        let mut stack = FrameStack::new();
        stack.push_frame();
        stack.push_frame();
        assert_eq!(stack.collapse(), 2);
        assert!(stack.is_empty());
        assert_eq!(stack.collapse(), 0);
    }

    #[test]
    fn frames_are_fifo() {
        let mut stack = FrameStack::new();
        stack.push_frame();
        for _ in 0..3 {
            stack.append_to_last(noop());
        }
        stack.push_frame();
        stack.append_to_last(noop());

        assert_eq!(stack.pending(), 4);
        assert_eq!(stack.depth(), 2);
        assert!(stack.take_front(0).is_some());
        assert_eq!(stack.frame_sizes(), vec![2, 1]);
        assert!(stack.take_front(5).is_none());
        assert!(stack.pop_frame().is_some());
        assert_eq!(stack.frame_sizes(), vec![2]);
    }
}
