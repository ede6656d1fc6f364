/*! Packet views and representations for the protocols a router touches.

Every protocol comes in two layers:

 * a `Packet` (or `Frame`) view wrapping any `AsRef<[u8]>` buffer, with one
   getter and one setter per header field, e.g. [EthernetFrame] or [Ipv4Packet];
 * a `Repr`, the decoded header as plain values, which `parse`s from a view
   and `emit`s into one, e.g. [ArpRepr] or [Icmpv4Repr].

[EthernetFrame]: struct.EthernetFrame.html
[Ipv4Packet]: struct.Ipv4Packet.html
[ArpRepr]: struct.ArpRepr.html
[Icmpv4Repr]: enum.Icmpv4Repr.html

Views never allocate and never copy. Accessors index the buffer directly, so
they panic on a buffer that is too short: anything received from the network
must go through `new_checked` (or `check_len`) first. Buffers being filled for
transmission are wrapped with `new_unchecked` instead, since their length
fields are not written yet.

# Examples

Building an IPv4 header for an ICMP message and reading it back:

```rust
use smolrouter::wire::*;

let repr = Ipv4Repr {
    src_addr: Ipv4Address::new(192, 168, 1, 1),
    dst_addr: Ipv4Address::new(192, 168, 1, 7),
    next_header: IpProtocol::Icmp,
    payload_len: ICMPV4_HEADER_LEN,
    hop_limit: 64,
};
let mut buffer = vec![0; repr.buffer_len() + repr.payload_len];
repr.emit(&mut Ipv4Packet::new_unchecked(&mut buffer[..]));

let packet = Ipv4Packet::new_checked(&buffer[..]).expect("short buffer");
assert!(packet.verify_checksum());
assert_eq!(Ipv4Repr::parse(&packet), Ok(repr));
```
*/

mod field {
    pub type Field = ::core::ops::Range<usize>;
    pub type Rest = ::core::ops::RangeFrom<usize>;
}

mod arp;
mod ethernet;
mod icmpv4;
pub(crate) mod ip;
mod ipv4;

pub use self::ethernet::{
    Address as EthernetAddress, EtherType as EthernetProtocol, Frame as EthernetFrame,
    Repr as EthernetRepr, HEADER_LEN as ETHERNET_HEADER_LEN,
};

pub use self::arp::{
    Hardware as ArpHardware, Operation as ArpOperation, Packet as ArpPacket, Repr as ArpRepr,
    PACKET_LEN as ARP_PACKET_LEN,
};

pub use self::ip::{checksum, Protocol as IpProtocol};

pub use self::ipv4::{
    Address as Ipv4Address, Packet as Ipv4Packet, Repr as Ipv4Repr,
    HEADER_LEN as IPV4_HEADER_LEN,
};

pub use self::icmpv4::{
    DstUnreachable as Icmpv4DstUnreachable, Message as Icmpv4Message, Packet as Icmpv4Packet,
    Repr as Icmpv4Repr, TimeExceeded as Icmpv4TimeExceeded, HEADER_LEN as ICMPV4_HEADER_LEN,
};
