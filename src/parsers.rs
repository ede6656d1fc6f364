use alloc::vec::Vec;
use core::fmt;
use core::result;
use core::str::FromStr;

use crate::iface::{RouteEntry, Routes};
use crate::phy::InterfaceId;
use crate::wire::Ipv4Address;
use crate::Error;

type Result<T> = result::Result<T, ()>;

struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(data: &'a str) -> Parser<'a> {
        Parser {
            data: data.as_bytes(),
            pos: 0,
        }
    }

    fn advance(&mut self) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&chr) => {
                self.pos += 1;
                Ok(chr)
            }
            None => Err(()),
        }
    }

    fn try_do<F, T>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<T>,
    {
        let pos = self.pos;
        match f(self) {
            Ok(res) => Some(res),
            Err(()) => {
                self.pos = pos;
                None
            }
        }
    }

    fn accept_eof(&mut self) -> Result<()> {
        if self.data.len() == self.pos {
            Ok(())
        } else {
            Err(())
        }
    }

    fn until_eof<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<T>,
    {
        let res = f(self)?;
        self.accept_eof()?;
        Ok(res)
    }

    fn accept_char(&mut self, chr: u8) -> Result<()> {
        if self.advance()? == chr {
            Ok(())
        } else {
            Err(())
        }
    }

    fn accept_digit(&mut self) -> Result<u8> {
        let digit = self.advance()?;
        if digit.is_ascii_digit() {
            Ok(digit - b'0')
        } else {
            Err(())
        }
    }

    /// Accept a decimal number of at most `max_digits` digits, below `limit`.
    fn accept_number(&mut self, max_digits: usize, limit: u32) -> Result<u32> {
        let mut value = self.accept_digit()? as u32;
        for _ in 1..max_digits {
            match self.try_do(|p| p.accept_digit()) {
                Some(digit) => value = value * 10 + digit as u32,
                None => break,
            }
        }
        if value < limit {
            Ok(value)
        } else {
            Err(())
        }
    }

    fn accept_ipv4(&mut self) -> Result<Ipv4Address> {
        let mut octets = [0u8; 4];
        for (n, octet) in octets.iter_mut().enumerate() {
            *octet = self.accept_number(3, 0x100)? as u8;
            if n != 3 {
                self.accept_char(b'.')?;
            }
        }
        Ok(Ipv4Address(octets))
    }

    fn accept_interface(&mut self) -> Result<InterfaceId> {
        let index = self.accept_number(5, 0x10000)?;
        Ok(InterfaceId(index as usize))
    }
}

impl FromStr for Ipv4Address {
    type Err = ();

    /// Parse a string representation of an IPv4 address.
    fn from_str(s: &str) -> Result<Ipv4Address> {
        Parser::new(s).until_eof(|p| p.accept_ipv4())
    }
}

impl FromStr for InterfaceId {
    type Err = ();

    /// Parse a decimal interface index.
    fn from_str(s: &str) -> Result<InterfaceId> {
        Parser::new(s).until_eof(|p| p.accept_interface())
    }
}

impl FromStr for RouteEntry {
    type Err = ();

    /// Parse a route written as `prefix next_hop mask interface`, the fields
    /// separated by whitespace.
    fn from_str(s: &str) -> Result<RouteEntry> {
        let mut fields = s.split_whitespace();
        let mut next_field = || fields.next().ok_or(());

        let prefix: Ipv4Address = next_field()?.parse()?;
        let next_hop: Ipv4Address = next_field()?.parse()?;
        let mask: Ipv4Address = next_field()?.parse()?;
        let interface: InterfaceId = next_field()?.parse()?;
        if fields.next().is_some() {
            return Err(());
        }

        Ok(RouteEntry {
            prefix,
            next_hop,
            mask,
            interface,
        })
    }
}

/// An error encountered while reading a route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRoutesError {
    /// One-based number of the offending line.
    pub line: usize,
    /// `Error::Malformed` for a line that is not a route, `Error::Illegal`
    /// for a mask whose bits are not contiguous.
    pub kind: Error,
}

impl fmt::Display for ParseRoutesError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            Error::Illegal => write!(f, "line {}: non-contiguous mask", self.line),
            kind => write!(f, "line {}: {}", self.line, kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseRoutesError {}

fn is_contiguous(mask: Ipv4Address) -> bool {
    let bits = mask.to_bits();
    bits.leading_ones() + bits.trailing_zeros() == 32
}

/// Read a route table, one route per line.
///
/// Blank lines are skipped, as is everything following a `#`.
pub(crate) fn parse_route_entries(text: &str) -> result::Result<Vec<RouteEntry>, ParseRoutesError> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let content = match line.split('#').next() {
            Some(content) if !content.trim().is_empty() => content,
            _ => continue,
        };

        let entry: RouteEntry = content.parse().map_err(|()| ParseRoutesError {
            line: line_no,
            kind: Error::Malformed,
        })?;
        if !is_contiguous(entry.mask) {
            return Err(ParseRoutesError {
                line: line_no,
                kind: Error::Illegal,
            });
        }

        entries.try_reserve(1).map_err(|_| ParseRoutesError {
            line: line_no,
            kind: Error::Exhausted,
        })?;
        entries.push(entry);
    }

    net_debug!("routes: read {} entries", entries.len());
    Ok(entries)
}

impl FromStr for Routes {
    type Err = ParseRoutesError;

    /// Read a route table, one `prefix next_hop mask interface` route per
    /// line, and sort it.
    fn from_str(s: &str) -> result::Result<Routes, ParseRoutesError> {
        parse_route_entries(s).map(Routes::build)
    }
}
