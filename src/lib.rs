#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

//! The _smolrouter_ library is the forwarding core of a software IPv4 router.
//!
//! Given an Ethernet frame received on one of several interfaces, a
//! [Router](iface/struct.Router.html) decides whether to forward it, answer it,
//! or drop it, rewriting the header fields a router is responsible for.
//!
//! # Table of contents
//! This library provides:
//!
//!   * Low-level packet parsing and emission for Ethernet II, ARP, IPv4 and ICMPv4,
//!     in the [wire](wire/index.html) module;
//!   * A trait for devices that receive and transmit frames tagged with the
//!     interface they belong to, in the [phy](phy/index.html) module;
//!   * A sorted static route table with longest-prefix match, an ARP cache,
//!     a queue of frames waiting for ARP resolution, and the forwarding engine
//!     itself, in the [iface](iface/index.html) module.
//!
//! # The forwarding pipeline
//!
//! One frame is processed to completion before the next one is fetched:
//!
//!  1. frames not addressed to the receiving interface (or to broadcast) are dropped;
//!  2. IPv4 packets with a bad header checksum are dropped without notice;
//!  3. packets whose TTL would expire produce an ICMP Time Exceeded message;
//!  4. echo requests addressed to the router itself produce an echo reply;
//!  5. packets without a route produce an ICMP Destination Unreachable message;
//!  6. packets whose next hop is known are rewritten and transmitted, all others
//!     wait in a FIFO queue while an ARP request is sent out.
//!
//! ARP replies addressed to the router fill the cache and release as many
//! waiting packets as possible, in arrival order.
//!
//! # Feature flags
//!
//!   * `std` (default): implements `std::error::Error` for the error types.
//!   * `log` (default): emits diagnostics through the `log` crate.
//!
//! The crate always requires a heap: the ARP cache and the pending queue grow
//! on demand.

extern crate alloc;

#[macro_use]
mod macros;

pub mod config;
pub mod iface;
mod parsers;
pub mod phy;
pub mod wire;

pub use self::parsers::ParseRoutesError;

use core::fmt;

/// The error type for the forwarding core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An operation cannot proceed because a buffer is empty or full,
    /// or an allocation failed.
    ///
    /// Memory exhaustion is fatal to the router: it is the only error
    /// [Router::poll](iface/struct.Router.html#method.poll) propagates.
    Exhausted,
    /// An operation is not permitted in the current state.
    Illegal,
    /// An endpoint or address of a remote host could not be translated to a lower level address.
    /// E.g. a route refers to an interface that does not exist.
    Unaddressable,
    /// A packet could not be parsed or emitted because a field was out of bounds
    /// for the underlying buffer.
    Truncated,
    /// An incoming packet had an incorrect checksum and was dropped.
    Checksum,
    /// An incoming packet could not be recognized and was dropped.
    /// E.g. an Ethernet frame with an unknown EtherType.
    Unrecognized,
    /// An incoming packet was recognized but was self-contradictory.
    /// E.g. an IPv4 packet whose total length is smaller than its header.
    Malformed,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The result type for the forwarding core.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Exhausted => write!(f, "buffer space exhausted"),
            Error::Illegal => write!(f, "illegal operation"),
            Error::Unaddressable => write!(f, "unaddressable destination"),
            Error::Truncated => write!(f, "truncated packet"),
            Error::Checksum => write!(f, "checksum error"),
            Error::Unrecognized => write!(f, "unrecognized packet"),
            Error::Malformed => write!(f, "malformed packet"),
        }
    }
}
