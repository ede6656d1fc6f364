use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;

use super::{EthernetAddress, EthernetProtocol, Ipv4Address};
use crate::{Error, Result};

enum_with_unknown! {
    /// ARP hardware type.
    pub enum Hardware(u16) {
        Ethernet = 1
    }
}

enum_with_unknown! {
    /// ARP operation type.
    pub enum Operation(u16) {
        Request = 1,
        Reply = 2
    }
}

/// A view of an ARP packet held in a buffer.
///
/// Only the Ethernet/IPv4 layout (hardware length 6, protocol length 4) is
/// addressable through this wrapper; [Repr::parse] rejects anything else.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

mod field {
    use crate::wire::field::*;

    pub const HTYPE: Field = 0..2;
    pub const PTYPE: Field = 2..4;
    pub const HLEN: usize = 4;
    pub const PLEN: usize = 5;
    pub const OPER: Field = 6..8;
    pub const SHA: Field = 8..14;
    pub const SPA: Field = 14..18;
    pub const THA: Field = 18..24;
    pub const TPA: Field = 24..28;
}

/// Length of an Ethernet/IPv4 ARP packet.
pub const PACKET_LEN: usize = field::TPA.end;

impl<T: AsRef<[u8]>> Packet<T> {
    /// Wrap `buffer` without checking its length.
    pub const fn new_unchecked(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    /// Wrap `buffer`, failing with `Error::Truncated` if it cannot hold an
    /// Ethernet/IPv4 ARP body.
    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new_unchecked(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < PACKET_LEN {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Unwrap the packet, returning the buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    #[inline]
    pub fn hardware_type(&self) -> Hardware {
        let data = self.buffer.as_ref();
        Hardware::from(NetworkEndian::read_u16(&data[field::HTYPE]))
    }

    #[inline]
    pub fn protocol_type(&self) -> EthernetProtocol {
        let data = self.buffer.as_ref();
        EthernetProtocol::from(NetworkEndian::read_u16(&data[field::PTYPE]))
    }

    #[inline]
    pub fn hardware_len(&self) -> u8 {
        self.buffer.as_ref()[field::HLEN]
    }

    #[inline]
    pub fn protocol_len(&self) -> u8 {
        self.buffer.as_ref()[field::PLEN]
    }

    #[inline]
    pub fn operation(&self) -> Operation {
        let data = self.buffer.as_ref();
        Operation::from(NetworkEndian::read_u16(&data[field::OPER]))
    }

    #[inline]
    pub fn source_hardware_addr(&self) -> EthernetAddress {
        EthernetAddress::from_bytes(&self.buffer.as_ref()[field::SHA])
    }

    #[inline]
    pub fn source_protocol_addr(&self) -> Ipv4Address {
        Ipv4Address::from_bytes(&self.buffer.as_ref()[field::SPA])
    }

    #[inline]
    pub fn target_hardware_addr(&self) -> EthernetAddress {
        EthernetAddress::from_bytes(&self.buffer.as_ref()[field::THA])
    }

    #[inline]
    pub fn target_protocol_addr(&self) -> Ipv4Address {
        Ipv4Address::from_bytes(&self.buffer.as_ref()[field::TPA])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    #[inline]
    pub fn set_hardware_type(&mut self, value: Hardware) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::HTYPE], value.into())
    }

    #[inline]
    pub fn set_protocol_type(&mut self, value: EthernetProtocol) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::PTYPE], value.into())
    }

    #[inline]
    pub fn set_hardware_len(&mut self, value: u8) {
        self.buffer.as_mut()[field::HLEN] = value
    }

    #[inline]
    pub fn set_protocol_len(&mut self, value: u8) {
        self.buffer.as_mut()[field::PLEN] = value
    }

    #[inline]
    pub fn set_operation(&mut self, value: Operation) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::OPER], value.into())
    }

    #[inline]
    pub fn set_source_hardware_addr(&mut self, value: EthernetAddress) {
        self.buffer.as_mut()[field::SHA].copy_from_slice(value.as_bytes())
    }

    #[inline]
    pub fn set_source_protocol_addr(&mut self, value: Ipv4Address) {
        self.buffer.as_mut()[field::SPA].copy_from_slice(value.as_bytes())
    }

    #[inline]
    pub fn set_target_hardware_addr(&mut self, value: EthernetAddress) {
        self.buffer.as_mut()[field::THA].copy_from_slice(value.as_bytes())
    }

    #[inline]
    pub fn set_target_protocol_addr(&mut self, value: Ipv4Address) {
        self.buffer.as_mut()[field::TPA].copy_from_slice(value.as_bytes())
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Packet<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Repr::parse(self) {
            Ok(repr) => write!(f, "{}", repr),
            Err(Error::Truncated) => write!(f, "ARP (truncated)"),
            Err(_) => write!(
                f,
                "ARP (unrecognized) htype={:?} ptype={} hlen={} plen={}",
                self.hardware_type(),
                self.protocol_type(),
                self.hardware_len(),
                self.protocol_len()
            ),
        }
    }
}

/// The fields of an Ethernet/IPv4 ARP packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    pub operation: Operation,
    pub source_hardware_addr: EthernetAddress,
    pub source_protocol_addr: Ipv4Address,
    pub target_hardware_addr: EthernetAddress,
    pub target_protocol_addr: Ipv4Address,
}

impl Repr {
    /// Build a request asking who owns `target`, sent from `source_mac`/`source_ip`.
    ///
    /// The target hardware address is left zeroed.
    pub fn request(
        source_mac: EthernetAddress,
        source_ip: Ipv4Address,
        target: Ipv4Address,
    ) -> Repr {
        Repr {
            operation: Operation::Request,
            source_hardware_addr: source_mac,
            source_protocol_addr: source_ip,
            target_hardware_addr: EthernetAddress::default(),
            target_protocol_addr: target,
        }
    }

    /// Build the reply to this request, announcing that `our_mac` owns the
    /// requested protocol address.
    pub fn reply_to(&self, our_mac: EthernetAddress) -> Repr {
        Repr {
            operation: Operation::Reply,
            source_hardware_addr: our_mac,
            source_protocol_addr: self.target_protocol_addr,
            target_hardware_addr: self.source_hardware_addr,
            target_protocol_addr: self.source_protocol_addr,
        }
    }

    /// Read the fields of an ARP packet.
    ///
    /// Returns `Err(Error::Truncated)` for a short buffer and
    /// `Err(Error::Unrecognized)` for anything but Ethernet/IPv4.
    pub fn parse<T: AsRef<[u8]>>(packet: &Packet<T>) -> Result<Repr> {
        packet.check_len()?;

        match (
            packet.hardware_type(),
            packet.protocol_type(),
            packet.hardware_len(),
            packet.protocol_len(),
        ) {
            (Hardware::Ethernet, EthernetProtocol::Ipv4, 6, 4) => Ok(Repr {
                operation: packet.operation(),
                source_hardware_addr: packet.source_hardware_addr(),
                source_protocol_addr: packet.source_protocol_addr(),
                target_hardware_addr: packet.target_hardware_addr(),
                target_protocol_addr: packet.target_protocol_addr(),
            }),
            _ => Err(Error::Unrecognized),
        }
    }

    /// Return the number of octets `emit` writes.
    pub const fn buffer_len(&self) -> usize {
        PACKET_LEN
    }

    /// Write every field, including the fixed Ethernet/IPv4 type and length octets.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, packet: &mut Packet<T>) {
        packet.set_hardware_type(Hardware::Ethernet);
        packet.set_protocol_type(EthernetProtocol::Ipv4);
        packet.set_hardware_len(6);
        packet.set_protocol_len(4);
        packet.set_operation(self.operation);
        packet.set_source_hardware_addr(self.source_hardware_addr);
        packet.set_source_protocol_addr(self.source_protocol_addr);
        packet.set_target_hardware_addr(self.target_hardware_addr);
        packet.set_target_protocol_addr(self.target_protocol_addr);
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ARP op={:?} src={}/{} tgt={}/{}",
            self.operation,
            self.source_hardware_addr,
            self.source_protocol_addr,
            self.target_hardware_addr,
            self.target_protocol_addr
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static PACKET_BYTES: [u8; 28] = [
        0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0x0a,
        0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0a, 0x00, 0x00, 0x01,
    ];

    const HOST_MAC: EthernetAddress = EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    const HOST_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);
    const ROUTER_MAC: EthernetAddress = EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0xfe]);
    const ROUTER_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);

    #[test]
    fn test_deconstruct() {
        let packet = Packet::new_checked(&PACKET_BYTES[..]).unwrap();
        assert_eq!(packet.hardware_type(), Hardware::Ethernet);
        assert_eq!(packet.protocol_type(), EthernetProtocol::Ipv4);
        assert_eq!(packet.hardware_len(), 6);
        assert_eq!(packet.protocol_len(), 4);
        assert_eq!(packet.operation(), Operation::Request);
        assert_eq!(packet.source_hardware_addr(), HOST_MAC);
        assert_eq!(packet.source_protocol_addr(), HOST_IP);
        assert_eq!(packet.target_hardware_addr(), EthernetAddress::default());
        assert_eq!(packet.target_protocol_addr(), ROUTER_IP);
    }

    #[test]
    fn test_parse() {
        let packet = Packet::new_unchecked(&PACKET_BYTES[..]);
        assert_eq!(
            Repr::parse(&packet).unwrap(),
            Repr::request(HOST_MAC, HOST_IP, ROUTER_IP)
        );
    }

    #[test]
    fn test_emit() {
        let mut bytes = vec![0xa5; PACKET_LEN];
        let mut packet = Packet::new_unchecked(&mut bytes);
        Repr::request(HOST_MAC, HOST_IP, ROUTER_IP).emit(&mut packet);
        assert_eq!(&bytes[..], &PACKET_BYTES[..]);
    }

    #[test]
    fn test_reply_to() {
        let reply = Repr::request(HOST_MAC, HOST_IP, ROUTER_IP).reply_to(ROUTER_MAC);
        assert_eq!(reply.operation, Operation::Reply);
        assert_eq!(reply.source_hardware_addr, ROUTER_MAC);
        assert_eq!(reply.source_protocol_addr, ROUTER_IP);
        assert_eq!(reply.target_hardware_addr, HOST_MAC);
        assert_eq!(reply.target_protocol_addr, HOST_IP);
    }

    #[test]
    fn test_truncated() {
        let packet = Packet::new_unchecked(&PACKET_BYTES[..27]);
        assert_eq!(Repr::parse(&packet), Err(Error::Truncated));
    }

    #[test]
    fn test_unrecognized_hardware() {
        let mut bytes = PACKET_BYTES;
        bytes[1] = 0x06;
        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(packet.hardware_type(), Hardware::Unknown(6));
        assert_eq!(Repr::parse(&packet), Err(Error::Unrecognized));
    }

    #[test]
    fn test_unrecognized_lengths() {
        let mut bytes = PACKET_BYTES;
        bytes[5] = 16;
        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(Repr::parse(&packet), Err(Error::Unrecognized));
    }
}
