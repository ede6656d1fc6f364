//! Compile-time tunables.

/// Number of entries the ARP cache can hold before its storage is first doubled.
pub const ARP_CACHE_INITIAL_CAPACITY: usize = 10;

/// Time to live of the ICMP messages the router originates.
pub const ICMP_TTL: u8 = 64;

/// Number of payload octets following the original IPv4 header that are quoted
/// in an ICMP error message.
pub const ICMP_ERROR_QUOTE_LEN: usize = 8;
