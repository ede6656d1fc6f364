use byteorder::{ByteOrder, NetworkEndian};
use core::{cmp, fmt};

use super::ip::checksum;
use crate::{Error, Result};

enum_with_unknown! {
    /// ICMPv4 message type. Only the types the router sends or answers are named.
    pub enum Message(u8) {
        EchoReply      =  0,
        DstUnreachable =  3,
        EchoRequest    =  8,
        TimeExceeded   = 11
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Message::EchoReply => "echo reply",
            Message::DstUnreachable => "destination unreachable",
            Message::EchoRequest => "echo request",
            Message::TimeExceeded => "time exceeded",
            Message::Unknown(id) => return write!(f, "type {}", id),
        };
        f.write_str(name)
    }
}

enum_with_unknown! {
    /// Code of a Destination Unreachable message.
    pub enum DstUnreachable(u8) {
        /// No route to the destination network.
        NetUnreachable   = 0,
        HostUnreachable  = 1,
        ProtoUnreachable = 2,
        PortUnreachable  = 3,
        /// The datagram needed fragmenting but had DF set.
        FragRequired     = 4
    }
}

enum_with_unknown! {
    /// Code of a Time Exceeded message.
    pub enum TimeExceeded(u8) {
        /// The time to live ran out while forwarding.
        TtlExpired  = 0,
        FragExpired = 1
    }
}

mod field {
    use crate::wire::field::*;

    pub const TYPE: usize = 0;
    pub const CODE: usize = 1;
    pub const CHECKSUM: Field = 2..4;
    /// Identifier and sequence number for echoes, zero for errors.
    pub const REST: Field = 4..8;
    pub const IDENT: Field = 4..6;
    pub const SEQ_NO: Field = 6..8;
    pub const DATA: Rest = 8..;
}

/// Length of the ICMPv4 header; echoes and errors alike use eight octets.
pub const HEADER_LEN: usize = field::DATA.start;

/// A view of an ICMPv4 message held in a buffer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Wrap `buffer` without checking its length.
    pub const fn new_unchecked(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    /// Wrap `buffer`, failing with `Error::Truncated` if it cannot hold
    /// a header.
    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new_unchecked(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < HEADER_LEN {
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
    pub fn msg_type(&self) -> Message {
        Message::from(self.buffer.as_ref()[field::TYPE])
    }

    #[inline]
    pub fn msg_code(&self) -> u8 {
        self.buffer.as_ref()[field::CODE]
    }

    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::CHECKSUM])
    }

    /// Echo identifier. Meaningless for error messages.
    #[inline]
    pub fn echo_ident(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::IDENT])
    }

    /// Echo sequence number. Meaningless for error messages.
    #[inline]
    pub fn echo_seq_no(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::SEQ_NO])
    }

    /// The checksum covers the whole message, so summing it with the
    /// checksum field in place gives all ones.
    pub fn verify_checksum(&self) -> bool {
        checksum::data(self.buffer.as_ref()) == !0
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Everything past the header: the echoed bytes, or the quoted datagram.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        &self.buffer.as_ref()[field::DATA]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    #[inline]
    pub fn set_msg_type(&mut self, value: Message) {
        self.buffer.as_mut()[field::TYPE] = value.into()
    }

    #[inline]
    pub fn set_msg_code(&mut self, value: u8) {
        self.buffer.as_mut()[field::CODE] = value
    }

    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::CHECKSUM], value)
    }

    #[inline]
    pub fn set_echo_ident(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::IDENT], value)
    }

    #[inline]
    pub fn set_echo_seq_no(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::SEQ_NO], value)
    }

    /// Zero the second header word, as error messages require.
    #[inline]
    pub fn clear_rest(&mut self) {
        self.buffer.as_mut()[field::REST].fill(0)
    }

    /// Checksum the whole buffer and store the result.
    pub fn fill_checksum(&mut self) {
        self.set_checksum(0);
        let checksum = !checksum::data(self.buffer.as_ref());
        self.set_checksum(checksum)
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[field::DATA]
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

/// An ICMPv4 message the router can answer or generate.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum Repr<'a> {
    EchoRequest {
        ident: u16,
        seq_no: u16,
        data: &'a [u8],
    },
    EchoReply {
        ident: u16,
        seq_no: u16,
        data: &'a [u8],
    },
    /// `data` quotes the dropped datagram: its header and up to eight
    /// octets of its payload.
    DstUnreachable {
        reason: DstUnreachable,
        data: &'a [u8],
    },
    /// `data` quotes the dropped datagram like `DstUnreachable` does.
    TimeExceeded {
        reason: TimeExceeded,
        data: &'a [u8],
    },
}

impl<'a> Repr<'a> {
    /// Read a message, verifying its checksum first.
    ///
    /// Echoes with a nonzero code and any other message type are
    /// `Error::Unrecognized`.
    pub fn parse<T: AsRef<[u8]> + ?Sized>(packet: &Packet<&'a T>) -> Result<Repr<'a>> {
        packet.check_len()?;
        if !packet.verify_checksum() {
            return Err(Error::Checksum);
        }

        let data = packet.data();
        let repr = match (packet.msg_type(), packet.msg_code()) {
            (Message::EchoRequest, 0) => Repr::EchoRequest {
                ident: packet.echo_ident(),
                seq_no: packet.echo_seq_no(),
                data,
            },
            (Message::EchoReply, 0) => Repr::EchoReply {
                ident: packet.echo_ident(),
                seq_no: packet.echo_seq_no(),
                data,
            },
            (Message::DstUnreachable, code) => Repr::DstUnreachable {
                reason: code.into(),
                data,
            },
            (Message::TimeExceeded, code) => Repr::TimeExceeded {
                reason: code.into(),
                data,
            },
            _ => return Err(Error::Unrecognized),
        };
        Ok(repr)
    }

    fn data(&self) -> &'a [u8] {
        match *self {
            Repr::EchoRequest { data, .. }
            | Repr::EchoReply { data, .. }
            | Repr::DstUnreachable { data, .. }
            | Repr::TimeExceeded { data, .. } => data,
        }
    }

    /// Return the number of octets `emit` writes.
    pub fn buffer_len(&self) -> usize {
        HEADER_LEN + self.data().len()
    }

    /// Write the message and its checksum into `packet`.
    ///
    /// If `packet` is shorter than `buffer_len`, `data` is cut to fit.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, packet: &mut Packet<T>) {
        match *self {
            Repr::EchoRequest { ident, seq_no, .. } | Repr::EchoReply { ident, seq_no, .. } => {
                let msg_type = match self {
                    Repr::EchoRequest { .. } => Message::EchoRequest,
                    _ => Message::EchoReply,
                };
                packet.set_msg_type(msg_type);
                packet.set_msg_code(0);
                packet.set_echo_ident(ident);
                packet.set_echo_seq_no(seq_no);
            }
            Repr::DstUnreachable { reason, .. } => {
                packet.set_msg_type(Message::DstUnreachable);
                packet.set_msg_code(reason.into());
                packet.clear_rest();
            }
            Repr::TimeExceeded { reason, .. } => {
                packet.set_msg_type(Message::TimeExceeded);
                packet.set_msg_code(reason.into());
                packet.clear_rest();
            }
        }

        let data = self.data();
        let payload = packet.data_mut();
        let len = cmp::min(payload.len(), data.len());
        payload[..len].copy_from_slice(&data[..len]);
        packet.fill_checksum()
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> fmt::Display for Packet<&'a T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Repr::parse(self) {
            Ok(repr) => write!(f, "{}", repr),
            Err(Error::Truncated) => write!(f, "ICMPv4 (truncated)"),
            Err(err) => write!(
                f,
                "ICMPv4 ({}) {} code {}",
                err,
                self.msg_type(),
                self.msg_code()
            ),
        }
    }
}

impl<'a> fmt::Display for Repr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Repr::EchoRequest { ident, seq_no, .. } => {
                write!(f, "ICMPv4 echo request id={} seq={}", ident, seq_no)?
            }
            Repr::EchoReply { ident, seq_no, .. } => {
                write!(f, "ICMPv4 echo reply id={} seq={}", ident, seq_no)?
            }
            Repr::DstUnreachable { reason, .. } => {
                write!(f, "ICMPv4 destination unreachable ({:?})", reason)?
            }
            Repr::TimeExceeded { reason, .. } => {
                write!(f, "ICMPv4 time exceeded ({:?})", reason)?
            }
        }
        write!(f, " len={}", self.data().len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Echo request, id 1, seq 7, carrying "ping".
    static PING_BYTES: [u8; 12] = [
        0x08, 0x00, 0x19, 0x27, 0x00, 0x01, 0x00, 0x07, 0x70, 0x69, 0x6e, 0x67,
    ];

    // A UDP datagram from 10.0.0.2 to 192.168.1.5 with TTL 1, cut after
    // eight octets of payload.
    static QUOTED_BYTES: [u8; 28] = [
        0x45, 0x00, 0x00, 0x24, 0x00, 0x00, 0x40, 0x00, 0x01, 0x11, 0xae, 0x1a, 0x0a, 0x00,
        0x00, 0x02, 0xc0, 0xa8, 0x01, 0x05, 0x04, 0xd2, 0x00, 0x35, 0x00, 0x10, 0x00, 0x00,
    ];

    fn ping_repr() -> Repr<'static> {
        Repr::EchoRequest {
            ident: 1,
            seq_no: 7,
            data: b"ping",
        }
    }

    #[test]
    fn test_echo_fields() {
        let packet = Packet::new_checked(&PING_BYTES[..]).unwrap();
        assert_eq!(packet.msg_type(), Message::EchoRequest);
        assert_eq!(packet.msg_code(), 0);
        assert_eq!(packet.checksum(), 0x1927);
        assert_eq!(packet.echo_ident(), 1);
        assert_eq!(packet.echo_seq_no(), 7);
        assert_eq!(packet.data(), b"ping");
        assert!(packet.verify_checksum());
    }

    #[test]
    fn test_echo_parse() {
        let packet = Packet::new_unchecked(&PING_BYTES[..]);
        assert_eq!(Repr::parse(&packet), Ok(ping_repr()));
    }

    #[test]
    fn test_echo_emit() {
        let repr = ping_repr();
        let mut bytes = vec![0xa5; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[..], &PING_BYTES[..]);
    }

    #[test]
    fn test_echo_reply_emit() {
        let repr = Repr::EchoReply {
            ident: 1,
            seq_no: 7,
            data: b"ping",
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[..4], &[0x00, 0x00, 0x21, 0x27]);
        assert_eq!(&bytes[4..], &PING_BYTES[4..]);
    }

    #[test]
    fn test_parse_bad_checksum() {
        let mut bytes = PING_BYTES;
        bytes[3] ^= 0x01;
        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(Repr::parse(&packet), Err(Error::Checksum));
    }

    #[test]
    fn test_parse_truncated() {
        let packet = Packet::new_unchecked(&PING_BYTES[..HEADER_LEN - 1]);
        assert_eq!(Repr::parse(&packet), Err(Error::Truncated));
    }

    #[test]
    fn test_parse_unrecognized() {
        let mut bytes = PING_BYTES;
        let mut packet = Packet::new_unchecked(&mut bytes[..]);
        packet.set_msg_type(Message::Unknown(13));
        packet.fill_checksum();
        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(Repr::parse(&packet), Err(Error::Unrecognized));
    }

    #[test]
    fn test_time_exceeded_emit() {
        let repr = Repr::TimeExceeded {
            reason: TimeExceeded::TtlExpired,
            data: &QUOTED_BYTES,
        };
        assert_eq!(repr.buffer_len(), 36);

        let mut bytes = vec![0xa5; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[..8], &[0x0b, 0x00, 0xef, 0xe8, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[8..], &QUOTED_BYTES[..]);

        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(Repr::parse(&packet), Ok(repr));
    }

    #[test]
    fn test_dst_unreachable_emit() {
        let repr = Repr::DstUnreachable {
            reason: DstUnreachable::NetUnreachable,
            data: &QUOTED_BYTES,
        };
        let mut bytes = vec![0xa5; repr.buffer_len()];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[..8], &[0x03, 0x00, 0xf7, 0xe8, 0x00, 0x00, 0x00, 0x00]);

        let packet = Packet::new_unchecked(&bytes[..]);
        assert_eq!(Repr::parse(&packet), Ok(repr));
    }

    #[test]
    fn test_emit_into_short_buffer() {
        let repr = ping_repr();
        let mut bytes = vec![0; HEADER_LEN + 2];
        repr.emit(&mut Packet::new_unchecked(&mut bytes[..]));
        assert_eq!(&bytes[HEADER_LEN..], b"pi");
        assert!(Packet::new_unchecked(&bytes[..]).verify_checksum());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", ping_repr()),
            "ICMPv4 echo request id=1 seq=7 len=4"
        );
        assert_eq!(format!("{}", Message::Unknown(42)), "type 42");
    }
}
