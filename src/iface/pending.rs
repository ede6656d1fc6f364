use alloc::collections::VecDeque;

use crate::phy::Frame;
use crate::{Error, Result};

/// A first-in first-out queue of frames waiting for their next hop to be
/// resolved.
///
/// The queue owns every frame it holds; [dequeue](#method.dequeue) hands
/// ownership back to the caller.
#[derive(Debug, Default)]
pub struct PendingQueue {
    frames: VecDeque<Frame>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> PendingQueue {
        PendingQueue::default()
    }

    /// Append `frame` at the tail.
    ///
    /// Returns `Err(Error::Exhausted)` if the queue cannot grow.
    pub fn enqueue(&mut self, frame: Frame) -> Result<()> {
        self.frames.try_reserve(1).map_err(|_| Error::Exhausted)?;
        self.frames.push_back(frame);
        Ok(())
    }

    /// Return the frame at the head of the queue, if any.
    pub fn peek(&self) -> Option<&Frame> {
        self.frames.front()
    }

    /// Remove and return the frame at the head of the queue.
    ///
    /// # Panics
    /// This function panics if the queue is empty.
    pub fn dequeue(&mut self) -> Frame {
        match self.frames.pop_front() {
            Some(frame) => frame,
            None => panic!("dequeue from an empty pending queue"),
        }
    }

    /// Query whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Return the number of queued frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Iterate over the queued frames, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter()
    }
}
