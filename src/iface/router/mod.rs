// Heads up! Before working on this file you should read the parts
// of RFC 1812 that discuss forwarding, TTL handling and ICMP errors.

use core::fmt;

use super::{ArpCache, Interfaces, PendingQueue, Routes};
use crate::phy::{Device, Frame, InterfaceId};
use crate::wire::*;
use crate::{Error, Result};

mod arp;
mod ipv4;

macro_rules! check {
    ($e:expr) => {
        match $e {
            Ok(x) => x,
            Err(err) => {
                net_debug!(concat!("router: dropping, ", stringify!($e), ": {}"), err);
                return Ok($crate::iface::Outcome::Dropped(
                    $crate::iface::DropReason::from(err),
                ));
            }
        }
    };
}
use check;

/// Why a frame was dropped without any answer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DropReason {
    /// The frame is tagged with an interface the router does not have.
    UnknownInterface,
    /// The frame is too short for the headers it claims to carry.
    Truncated,
    /// The destination hardware address is neither ours nor broadcast.
    ForeignAddress,
    /// The EtherType is neither IPv4 nor ARP.
    UnsupportedProtocol,
    /// A header field is inconsistent or unsupported.
    Malformed,
    /// The IPv4 header checksum does not match.
    Checksum,
}

impl From<Error> for DropReason {
    fn from(err: Error) -> DropReason {
        match err {
            Error::Truncated => DropReason::Truncated,
            Error::Checksum => DropReason::Checksum,
            _ => DropReason::Malformed,
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DropReason::UnknownInterface => write!(f, "unknown interface"),
            DropReason::Truncated => write!(f, "truncated"),
            DropReason::ForeignAddress => write!(f, "not addressed to us"),
            DropReason::UnsupportedProtocol => write!(f, "unsupported protocol"),
            DropReason::Malformed => write!(f, "malformed"),
            DropReason::Checksum => write!(f, "checksum mismatch"),
        }
    }
}

/// What the router did with a frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// Dropped silently.
    Dropped(DropReason),
    /// Rewritten and sent out of `interface`.
    Forwarded { interface: InterfaceId },
    /// Parked until `next_hop` is resolved; an ARP request was sent.
    Queued { next_hop: Ipv4Address },
    /// An echo request for the router was answered.
    EchoReplied,
    /// The time to live ran out; ICMP Time Exceeded was sent back.
    TimeExceeded,
    /// No route matched; ICMP Destination Unreachable was sent back.
    Unreachable,
    /// An ARP request for the router was answered.
    ArpReplied,
    /// An ARP reply for the router was cached and `drained` waiting frames
    /// were sent.
    ArpLearned { drained: usize },
    /// Valid, but nothing to do.
    Ignored,
}

/// The router port a frame arrived on, or leaves through.
#[derive(Debug, Clone, Copy)]
struct Port {
    id: InterfaceId,
    mac: EthernetAddress,
    ip: Ipv4Address,
}

/// A static-table IPv4 router.
///
/// The router owns all of its state: the port addressing, the sorted route
/// table, the ARP cache and the queue of frames waiting for ARP resolution.
/// Frames are processed one at a time, to completion.
#[derive(Debug)]
pub struct Router {
    interfaces: Interfaces,
    routes: Routes,
    arp_cache: ArpCache,
    pending: PendingQueue,
}

impl Router {
    /// Create a router over `interfaces`, forwarding according to `routes`.
    ///
    /// Returns `Err(Error::Unaddressable)` if a route leaves through an
    /// interface that is not configured, and `Err(Error::Exhausted)` if the
    /// ARP cache cannot be allocated.
    pub fn new(interfaces: Interfaces, routes: Routes) -> Result<Router> {
        if let Some(route) = routes
            .iter()
            .find(|route| !interfaces.contains(route.interface))
        {
            net_debug!("router: route {} uses an unknown interface", route);
            return Err(Error::Unaddressable);
        }

        Ok(Router {
            interfaces,
            routes,
            arp_cache: ArpCache::new()?,
            pending: PendingQueue::new(),
        })
    }

    pub fn interfaces(&self) -> &Interfaces {
        &self.interfaces
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn arp_cache(&self) -> &ArpCache {
        &self.arp_cache
    }

    /// Return the frames waiting for ARP resolution.
    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    /// Receive at most one frame from `device` and process it, transmitting
    /// every frame produced through the same device.
    ///
    /// Returns `Ok(true)` if a frame was processed, `Ok(false)` if the device
    /// had nothing to offer. Only `Err(Error::Exhausted)` is ever returned;
    /// it means the router ran out of memory and cannot continue.
    pub fn poll<D>(&mut self, device: &mut D) -> Result<bool>
    where
        D: Device + ?Sized,
    {
        let frame = match device.receive() {
            Some(frame) => frame,
            None => return Ok(false),
        };

        net_trace!("router: received {}", frame);
        let outcome = self.process(device, frame)?;
        net_trace!("router: {:?}", outcome);
        Ok(true)
    }

    /// Call [poll](#method.poll) until the device runs dry, returning the
    /// number of frames processed.
    pub fn run<D>(&mut self, device: &mut D) -> Result<usize>
    where
        D: Device + ?Sized,
    {
        let mut processed = 0;
        while self.poll(device)? {
            processed += 1;
        }
        Ok(processed)
    }

    /// Process one frame received on `frame.interface`.
    ///
    /// Frames produced in response (forwarded datagrams, ICMP messages, ARP
    /// requests and replies) are handed to `device`. A transmit failure is
    /// logged and otherwise ignored.
    pub fn process<D>(&mut self, device: &mut D, frame: Frame) -> Result<Outcome>
    where
        D: Device + ?Sized,
    {
        let port = match self.port(frame.interface) {
            Some(port) => port,
            None => {
                net_debug!("router: frame from unknown interface {}", frame.interface);
                return Ok(Outcome::Dropped(DropReason::UnknownInterface));
            }
        };

        let (dst_addr, ethertype) = {
            let eth_frame = check!(EthernetFrame::new_checked(&frame.buffer[..]));
            (eth_frame.dst_addr(), eth_frame.ethertype())
        };

        if dst_addr != port.mac && !dst_addr.is_broadcast() {
            net_debug!("router: {} is not for {}", dst_addr, port.id);
            return Ok(Outcome::Dropped(DropReason::ForeignAddress));
        }

        match ethertype {
            EthernetProtocol::Ipv4 => self.process_ipv4(device, port, frame),
            EthernetProtocol::Arp => self.process_arp(device, port, frame),
            _ => {
                net_debug!("router: dropping {} frame", ethertype);
                Ok(Outcome::Dropped(DropReason::UnsupportedProtocol))
            }
        }
    }

    fn port(&self, id: InterfaceId) -> Option<Port> {
        self.interfaces.get(id).map(|config| Port {
            id,
            mac: config.mac,
            ip: config.ip,
        })
    }
}

/// Point `frame` at `dst_mac` through `port`.
fn rewrite_l2(frame: &mut Frame, port: Port, dst_mac: EthernetAddress) {
    let mut eth_frame = EthernetFrame::new_unchecked(&mut frame.buffer[..]);
    eth_frame.set_src_addr(port.mac);
    eth_frame.set_dst_addr(dst_mac);
    frame.interface = port.id;
}

fn dispatch<D>(device: &mut D, frame: Frame)
where
    D: Device + ?Sized,
{
    net_trace!("router: transmit {}", frame);
    if let Err(err) = device.transmit(frame) {
        net_debug!("router: transmit failed: {}", err);
    }
}
