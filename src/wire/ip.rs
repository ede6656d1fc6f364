use core::fmt;

enum_with_unknown! {
    /// IP datagram encapsulated protocol.
    pub enum Protocol(u8) {
        HopByHop  = 0x00,
        Icmp      = 0x01,
        Igmp      = 0x02,
        Tcp       = 0x06,
        Udp       = 0x11
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Protocol::HopByHop => write!(f, "Hop-by-Hop"),
            Protocol::Icmp => write!(f, "ICMP"),
            Protocol::Igmp => write!(f, "IGMP"),
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
            Protocol::Unknown(id) => write!(f, "0x{:02x}", id),
        }
    }
}

pub mod checksum {
    use byteorder::{ByteOrder, NetworkEndian};

    const fn propagate_carries(word: u32) -> u16 {
        let sum = (word >> 16) + (word & 0xffff);
        ((sum >> 16) as u16) + (sum as u16)
    }

    /// Compute an RFC 1071 compliant checksum (without the final complement).
    pub fn data(mut data: &[u8]) -> u16 {
        let mut accum = 0;

        // For each 32-byte chunk...
        const CHUNK_SIZE: usize = 32;
        while data.len() >= CHUNK_SIZE {
            let mut d = &data[..CHUNK_SIZE];
            // ... take by 2 bytes and sum them.
            while d.len() >= 2 {
                accum += NetworkEndian::read_u16(d) as u32;
                d = &d[2..];
            }

            data = &data[CHUNK_SIZE..];
        }

        // Sum the rest that does not fit the last 32-byte chunk,
        // taking by 2 bytes.
        while data.len() >= 2 {
            accum += NetworkEndian::read_u16(data) as u32;
            data = &data[2..];
        }

        // Add the last remaining odd byte, if any.
        if let Some(&value) = data.first() {
            accum += (value as u32) << 8;
        }

        propagate_carries(accum)
    }

    /// Combine several RFC 1071 compliant checksums.
    pub fn combine(checksums: &[u16]) -> u16 {
        let mut accum: u32 = 0;
        for &word in checksums {
            accum += word as u32;
        }
        propagate_carries(accum)
    }

    /// Incrementally update a header checksum after one 16-bit word of the
    /// header changed from `old_word` to `new_word` (RFC 1624, eqn. 3).
    ///
    /// The arithmetic is one's complement with end-around carry, so the result
    /// equals the complement of [data] over the modified header for any header
    /// that is not entirely zero.
    pub fn update(old_checksum: u16, old_word: u16, new_word: u16) -> u16 {
        !combine(&[!old_checksum, !old_word, new_word])
    }
}

#[cfg(test)]
mod test {
    use super::checksum;

    #[test]
    fn test_checksum_odd_length() {
        assert_eq!(checksum::data(&[0x12, 0x34, 0x56]), 0x6834);
    }

    #[test]
    fn test_checksum_rfc1071_example() {
        // RFC 1071, section 3 numerical example.
        let bytes = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(checksum::data(&bytes), 0xddf2);
    }

    #[test]
    fn test_update_matches_full_recompute() {
        let mut bytes = [0x45u8, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x00, 0x40, 0x01];
        let before = !checksum::data(&bytes);
        let old_word = u16::from_be_bytes([bytes[8], bytes[9]]);
        bytes[8] -= 1;
        let new_word = u16::from_be_bytes([bytes[8], bytes[9]]);
        assert_eq!(
            checksum::update(before, old_word, new_word),
            !checksum::data(&bytes)
        );
    }
}
