use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::{Device, Frame, InterfaceId};
use crate::Result;

/// An in-memory device.
///
/// Frames pushed into `rx_queue` are received in FIFO order, and every frame
/// transmitted through the device is appended to `tx_queue`.
#[derive(Debug, Default)]
pub struct QueueDevice {
    pub rx_queue: VecDeque<Frame>,
    pub tx_queue: VecDeque<Frame>,
}

impl QueueDevice {
    /// Creates an empty device.
    pub fn new() -> QueueDevice {
        QueueDevice::default()
    }

    /// Queue `buffer` for reception as if it arrived on `interface`.
    pub fn inject(&mut self, interface: InterfaceId, buffer: Vec<u8>) {
        self.rx_queue.push_back(Frame::new(interface, buffer))
    }

    /// Take every transmitted frame, oldest first.
    pub fn take_transmitted(&mut self) -> Vec<Frame> {
        self.tx_queue.drain(..).collect()
    }
}

impl Device for QueueDevice {
    fn receive(&mut self) -> Option<Frame> {
        self.rx_queue.pop_front()
    }

    fn transmit(&mut self, frame: Frame) -> Result<()> {
        self.tx_queue.push_back(frame);
        Ok(())
    }
}
