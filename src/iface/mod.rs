/*! Forwarding logic.

The `iface` module deals with the *router ports* and everything a frame
meets on its way through the router: the port addressing table, the sorted
route table, the ARP cache, the queue of frames waiting for ARP resolution,
and the [Router](struct.Router.html) tying them together.
*/

mod arp_cache;
mod interface;
mod pending;
mod route;
mod router;

pub use self::arp_cache::{ArpCache, ArpEntry};
pub use self::interface::{InterfaceConfig, Interfaces};
pub use self::pending::PendingQueue;
pub use self::route::{RouteEntry, Routes};
pub use self::router::{DropReason, Outcome, Router};
