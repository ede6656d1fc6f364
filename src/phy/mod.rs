/*! Access to networking hardware.

The `phy` module deals with the *network devices*. It provides a trait
for receiving and transmitting interface-tagged Ethernet frames,
[Device](trait.Device.html), and an in-memory implementation of it,
[QueueDevice](struct.QueueDevice.html), for zero dependency testing.

Capturing frames from the host OS is left to the embedding application:
anything that can hand over whole Ethernet frames together with the index of
the port they arrived on can implement `Device`.

# Examples

An implementation of the [Device](trait.Device.html) trait for a pair of
fixed frame slots could look as follows:

```rust
use smolrouter::phy::{Device, Frame, InterfaceId};
use smolrouter::Result;

struct SlotPhy {
    rx_slot: Option<Vec<u8>>,
    tx_slot: Option<Vec<u8>>,
}

impl Device for SlotPhy {
    fn receive(&mut self) -> Option<Frame> {
        self.rx_slot
            .take()
            .map(|buffer| Frame::new(InterfaceId(0), buffer))
    }

    fn transmit(&mut self, frame: Frame) -> Result<()> {
        self.tx_slot = Some(frame.buffer);
        Ok(())
    }
}
```
*/

use alloc::vec::Vec;
use core::fmt;

use crate::wire::EthernetFrame;
use crate::{Error, Result};

mod queue;

pub use self::queue::QueueDevice;

/// Index of a router port.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct InterfaceId(pub usize);

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "if{}", self.0)
    }
}

/// An owned Ethernet frame tagged with the interface it arrived on, or the
/// interface it is to leave through.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Frame {
    pub interface: InterfaceId,
    pub buffer: Vec<u8>,
}

impl Frame {
    /// Tag `buffer` with `interface`.
    pub fn new(interface: InterfaceId, buffer: Vec<u8>) -> Frame {
        Frame { interface, buffer }
    }

    /// Allocate a zero-filled frame of `len` octets.
    ///
    /// Returns `Err(Error::Exhausted)` if the buffer cannot be allocated.
    pub fn try_zeroed(interface: InterfaceId, len: usize) -> Result<Frame> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| Error::Exhausted)?;
        buffer.resize(len, 0);
        Ok(Frame { interface, buffer })
    }

    /// Return the length of the frame, in octets.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Query whether the frame carries no octets at all.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match EthernetFrame::new_checked(&self.buffer[..]) {
            Ok(frame) => write!(f, "{} {}", self.interface, frame),
            Err(err) => write!(f, "{} ({})", self.interface, err),
        }
    }
}

/// An interface for sending and receiving raw network frames.
///
/// The router drives a device from a single thread: it pulls one frame,
/// processes it to completion, and pushes every frame it produced before
/// pulling the next one.
pub trait Device {
    /// Obtain the next received frame, if any.
    fn receive(&mut self) -> Option<Frame>;

    /// Send a frame out of `frame.interface`.
    fn transmit(&mut self, frame: Frame) -> Result<()>;
}

impl<D: Device + ?Sized> Device for &mut D {
    fn receive(&mut self) -> Option<Frame> {
        (**self).receive()
    }

    fn transmit(&mut self, frame: Frame) -> Result<()> {
        (**self).transmit(frame)
    }
}
