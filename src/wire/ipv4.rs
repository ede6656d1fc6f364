use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;

use super::ip::checksum;
use crate::wire::IpProtocol as Protocol;
use crate::{Error, Result};

/// An IPv4 address, stored in wire order.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 4]);

impl Address {
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address([a, b, c, d])
    }

    /// Read an address out of a four octet field.
    ///
    /// # Panics
    /// This function panics if `data` is not exactly four octets long.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut octets = [0; 4];
        octets.copy_from_slice(data);
        Address(octets)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Build an address from a host order integer, so that
    /// `from_bits(0x0a000001)` is `10.0.0.1`.
    pub const fn from_bits(bits: u32) -> Address {
        Address(bits.to_be_bytes())
    }

    /// The address as a host order integer. Integer order matches the
    /// dotted-quad order.
    pub const fn to_bits(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Keep only the bits of `self` that are set in `mask`.
    pub const fn mask(&self, mask: Address) -> Address {
        Address::from_bits(self.to_bits() & mask.to_bits())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

mod field {
    use crate::wire::field::*;

    pub const VER_IHL: usize = 0;
    pub const TOS: usize = 1;
    pub const TOTAL_LEN: Field = 2..4;
    pub const IDENT: Field = 4..6;
    pub const FRAGMENT: Field = 6..8;
    pub const TTL: usize = 8;
    pub const PROTOCOL: usize = 9;
    pub const CHECKSUM: Field = 10..12;
    pub const SRC_ADDR: Field = 12..16;
    pub const DST_ADDR: Field = 16..20;
}

/// Length of an IPv4 header that carries no options.
pub const HEADER_LEN: usize = field::DST_ADDR.end;

/// The "don't fragment" bit of the fragment field.
const DONT_FRAGMENT: u16 = 0x4000;

/// A view of an IPv4 datagram held in a buffer.
///
/// The buffer may extend past the datagram; `payload` stops at the total
/// length the header announces.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Wrap `buffer` without checking any lengths.
    pub const fn new_unchecked(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    /// Wrap `buffer` and run `check_len` on it.
    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new_unchecked(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    /// Ensure that no accessor method will panic if called.
    ///
    /// Fails with `Error::Truncated` when the buffer holds less than a
    /// fixed header or less than the announced total length, and with
    /// `Error::Malformed` when the header length field is below the fixed
    /// header or above the total length.
    pub fn check_len(&self) -> Result<()> {
        let len = self.buffer.as_ref().len();
        if len < HEADER_LEN {
            return Err(Error::Truncated);
        }
        let header_len = self.header_len() as usize;
        let total_len = self.total_len() as usize;
        if header_len < HEADER_LEN || header_len > total_len {
            Err(Error::Malformed)
        } else if len < total_len {
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
    pub fn version(&self) -> u8 {
        self.buffer.as_ref()[field::VER_IHL] >> 4
    }

    /// Header length in octets, options included.
    #[inline]
    pub fn header_len(&self) -> u8 {
        (self.buffer.as_ref()[field::VER_IHL] & 0x0f) * 4
    }

    /// Length of header and payload together, in octets.
    #[inline]
    pub fn total_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::TOTAL_LEN])
    }

    #[inline]
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::IDENT])
    }

    /// The raw flags and fragment offset word.
    #[inline]
    pub fn fragment(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::FRAGMENT])
    }

    /// The time to live.
    #[inline]
    pub fn hop_limit(&self) -> u8 {
        self.buffer.as_ref()[field::TTL]
    }

    #[inline]
    pub fn next_header(&self) -> Protocol {
        Protocol::from(self.buffer.as_ref()[field::PROTOCOL])
    }

    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::CHECKSUM])
    }

    #[inline]
    pub fn src_addr(&self) -> Address {
        Address::from_bytes(&self.buffer.as_ref()[field::SRC_ADDR])
    }

    #[inline]
    pub fn dst_addr(&self) -> Address {
        Address::from_bytes(&self.buffer.as_ref()[field::DST_ADDR])
    }

    /// Check the stored header checksum against the header contents.
    pub fn verify_checksum(&self) -> bool {
        self.compute_checksum() == self.checksum()
    }

    /// Checksum of the header with the checksum field skipped.
    fn compute_checksum(&self) -> u16 {
        let header = &self.buffer.as_ref()[..self.header_len() as usize];
        !checksum::combine(&[
            checksum::data(&header[..field::CHECKSUM.start]),
            checksum::data(&header[field::CHECKSUM.end..]),
        ])
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Everything between the header and the announced total length.
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        let range = self.header_len() as usize..self.total_len() as usize;
        &self.buffer.as_ref()[range]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Write the version and header length octet. `header_len` is in
    /// octets and must be a multiple of four.
    #[inline]
    pub fn set_version_and_header_len(&mut self, version: u8, header_len: u8) {
        self.buffer.as_mut()[field::VER_IHL] = (version << 4) | ((header_len / 4) & 0x0f);
    }

    /// Write the type of service octet (DSCP and ECN).
    #[inline]
    pub fn set_tos(&mut self, value: u8) {
        self.buffer.as_mut()[field::TOS] = value
    }

    #[inline]
    pub fn set_total_len(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::TOTAL_LEN], value)
    }

    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::IDENT], value)
    }

    #[inline]
    pub fn set_fragment(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::FRAGMENT], value)
    }

    #[inline]
    pub fn set_hop_limit(&mut self, value: u8) {
        self.buffer.as_mut()[field::TTL] = value
    }

    #[inline]
    pub fn set_next_header(&mut self, value: Protocol) {
        self.buffer.as_mut()[field::PROTOCOL] = value.into()
    }

    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::CHECKSUM], value)
    }

    #[inline]
    pub fn set_src_addr(&mut self, value: Address) {
        self.buffer.as_mut()[field::SRC_ADDR].copy_from_slice(value.as_bytes())
    }

    #[inline]
    pub fn set_dst_addr(&mut self, value: Address) {
        self.buffer.as_mut()[field::DST_ADDR].copy_from_slice(value.as_bytes())
    }

    /// Recompute the header checksum and store it.
    pub fn fill_checksum(&mut self) {
        let checksum = self.compute_checksum();
        self.set_checksum(checksum)
    }

    /// Lower the time to live by one and patch the header checksum in place
    /// (RFC 1624) instead of recomputing it.
    ///
    /// The patched word is the one holding the time to live and protocol
    /// fields, in wire order.
    ///
    /// # Panics
    /// This function panics if the time to live is already zero.
    pub fn decrement_hop_limit(&mut self) {
        let ttl = self.hop_limit();
        let protocol = self.buffer.as_ref()[field::PROTOCOL];
        assert!(ttl > 0, "time to live is already zero");

        let old_word = u16::from_be_bytes([ttl, protocol]);
        let new_word = u16::from_be_bytes([ttl - 1, protocol]);
        let checksum = checksum::update(self.checksum(), old_word, new_word);

        self.set_hop_limit(ttl - 1);
        self.set_checksum(checksum);
    }

    /// Everything between the header and the announced total length, mutably.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let range = self.header_len() as usize..self.total_len() as usize;
        &mut self.buffer.as_mut()[range]
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

/// The header fields of an IPv4 datagram that the router reads or writes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    pub src_addr: Address,
    pub dst_addr: Address,
    pub next_header: Protocol,
    pub payload_len: usize,
    pub hop_limit: u8,
}

impl Repr {
    /// Read the header of a datagram.
    ///
    /// Options are skipped over, and fragments are accepted as they are.
    pub fn parse<T: AsRef<[u8]> + ?Sized>(packet: &Packet<&T>) -> Result<Repr> {
        packet.check_len()?;
        if packet.version() != 4 {
            return Err(Error::Malformed);
        }
        if !packet.verify_checksum() {
            return Err(Error::Checksum);
        }

        Ok(Repr {
            src_addr: packet.src_addr(),
            dst_addr: packet.dst_addr(),
            next_header: packet.next_header(),
            payload_len: packet.total_len() as usize - packet.header_len() as usize,
            hop_limit: packet.hop_limit(),
        })
    }

    /// Return the number of octets `emit` writes; options are never emitted.
    pub const fn buffer_len(&self) -> usize {
        HEADER_LEN
    }

    /// Write an option-less header with the "don't fragment" bit set and a
    /// valid checksum. The payload is left alone.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, packet: &mut Packet<T>) {
        packet.set_version_and_header_len(4, HEADER_LEN as u8);
        packet.set_tos(0);
        packet.set_total_len((HEADER_LEN + self.payload_len) as u16);
        packet.set_ident(0);
        packet.set_fragment(DONT_FRAGMENT);
        packet.set_hop_limit(self.hop_limit);
        packet.set_next_header(self.next_header);
        packet.set_src_addr(self.src_addr);
        packet.set_dst_addr(self.dst_addr);
        packet.fill_checksum();
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "IPv4 {} -> {} {} ttl={} len={}",
            self.src_addr, self.dst_addr, self.next_header, self.hop_limit, self.payload_len
        )
    }
}
