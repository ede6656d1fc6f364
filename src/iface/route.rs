use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::phy::InterfaceId;
use crate::wire::Ipv4Address;

/// A static route: datagrams whose destination falls into `prefix/mask`
/// leave through `interface` towards `next_hop`.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct RouteEntry {
    pub prefix: Ipv4Address,
    pub next_hop: Ipv4Address,
    pub mask: Ipv4Address,
    pub interface: InterfaceId,
}

impl RouteEntry {
    /// Return the network address, i.e. the prefix with host bits cleared.
    pub fn network(&self) -> Ipv4Address {
        self.prefix.mask(self.mask)
    }

    /// Query whether `addr` falls into this route's network.
    pub fn contains_addr(&self, addr: Ipv4Address) -> bool {
        addr.mask(self.mask) == self.network()
    }

    /// Sort key: masked network, then mask, both as host-order integers.
    fn key(&self) -> (u32, u32) {
        (self.network().to_bits(), self.mask.to_bits())
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} via {} dev {}",
            self.prefix, self.mask, self.next_hop, self.interface
        )
    }
}

/// A sorted, read-only routing table.
///
/// The only way to obtain a `Routes` is [build](#method.build), which sorts
/// the entries by masked network address and then by mask, ascending. Lookups
/// rely on that order and the table offers no way to disturb it.
#[derive(Debug, Clone, Default)]
pub struct Routes {
    storage: Vec<RouteEntry>,
    /// Distinct masks present in `storage`, longest first.
    masks: Vec<u32>,
}

impl Routes {
    /// Sort `entries` into a routing table.
    pub fn build(mut entries: Vec<RouteEntry>) -> Routes {
        entries.sort_unstable_by(Self::compare);

        let mut masks: Vec<u32> = entries.iter().map(|entry| entry.mask.to_bits()).collect();
        masks.sort_unstable_by(|a, b| b.cmp(a));
        masks.dedup();

        Routes {
            storage: entries,
            masks,
        }
    }

    /// The total order the table is kept in.
    pub fn compare(a: &RouteEntry, b: &RouteEntry) -> Ordering {
        a.key().cmp(&b.key())
    }

    /// Find the most specific route whose network contains `addr`.
    ///
    /// For every mask present in the table, longest first, the masked
    /// destination is binary searched among the entries carrying that mask.
    /// The first hit has the largest mask of all matching routes.
    pub fn lookup(&self, addr: Ipv4Address) -> Option<&RouteEntry> {
        self.masks.iter().find_map(|&mask| {
            let target = (addr.to_bits() & mask, mask);
            let index = self.storage.partition_point(|entry| entry.key() < target);
            self.storage
                .get(index)
                .filter(|entry| entry.key() == target)
        })
    }

    /// Return the number of routes.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Query whether the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterate over the routes in table order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> + '_ {
        self.storage.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    fn route(prefix: [u8; 4], mask: [u8; 4], next_hop: [u8; 4], interface: usize) -> RouteEntry {
        RouteEntry {
            prefix: Ipv4Address(prefix),
            next_hop: Ipv4Address(next_hop),
            mask: Ipv4Address(mask),
            interface: InterfaceId(interface),
        }
    }

    fn nested() -> Vec<RouteEntry> {
        vec![
            route([10, 1, 2, 0], [255, 255, 255, 0], [10, 1, 2, 1], 3),
            route([0, 0, 0, 0], [0, 0, 0, 0], [172, 16, 0, 1], 0),
            route([10, 0, 0, 0], [255, 0, 0, 0], [10, 0, 0, 1], 1),
            route([10, 1, 0, 0], [255, 255, 0, 0], [10, 1, 0, 1], 2),
            route([192, 168, 0, 0], [255, 255, 0, 0], [192, 168, 0, 1], 4),
        ]
    }

    fn lookup_interface(routes: &Routes, addr: [u8; 4]) -> Option<usize> {
        routes
            .lookup(Ipv4Address(addr))
            .map(|entry| entry.interface.0)
    }

    #[test]
    fn test_empty() {
        let routes = Routes::build(Vec::new());
        assert!(routes.is_empty());
        assert_eq!(routes.lookup(Ipv4Address::new(10, 0, 0, 1)), None);
    }

    #[test]
    fn test_sorted_order() {
        let routes = Routes::build(nested());
        let prefixes: Vec<_> = routes.iter().map(|entry| entry.prefix).collect();
        assert_eq!(
            prefixes,
            vec![
                Ipv4Address::new(0, 0, 0, 0),
                Ipv4Address::new(10, 0, 0, 0),
                Ipv4Address::new(10, 1, 0, 0),
                Ipv4Address::new(10, 1, 2, 0),
                Ipv4Address::new(192, 168, 0, 0),
            ]
        );
    }

    #[test]
    fn test_same_network_larger_mask_sorts_later() {
        let routes = Routes::build(vec![
            route([10, 0, 0, 0], [255, 255, 0, 0], [0, 0, 0, 0], 1),
            route([10, 0, 0, 0], [255, 0, 0, 0], [0, 0, 0, 0], 0),
        ]);
        let masks: Vec<_> = routes.iter().map(|entry| entry.mask).collect();
        assert_eq!(
            masks,
            vec![Ipv4Address::new(255, 0, 0, 0), Ipv4Address::new(255, 255, 0, 0)]
        );
    }

    #[test]
    fn test_resort_is_noop() {
        let routes = Routes::build(nested());
        let sorted: Vec<_> = routes.iter().copied().collect();
        let resorted = Routes::build(sorted.clone());
        assert_eq!(resorted.iter().copied().collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn test_most_specific_wins() {
        let routes = Routes::build(nested());
        assert_eq!(lookup_interface(&routes, [10, 1, 2, 7]), Some(3));
        assert_eq!(lookup_interface(&routes, [10, 1, 3, 7]), Some(2));
        assert_eq!(lookup_interface(&routes, [10, 2, 0, 1]), Some(1));
        assert_eq!(lookup_interface(&routes, [192, 168, 7, 7]), Some(4));
        assert_eq!(lookup_interface(&routes, [8, 8, 8, 8]), Some(0));
    }

    #[test]
    fn test_no_match_without_default() {
        let mut entries = nested();
        entries.retain(|entry| entry.mask.to_bits() != 0);
        let routes = Routes::build(entries);
        assert_eq!(lookup_interface(&routes, [8, 8, 8, 8]), None);
        assert_eq!(lookup_interface(&routes, [11, 0, 0, 1]), None);
    }

    #[test]
    fn test_broad_route_behind_siblings() {
        // 10.3.0.1 sorts after both /16 siblings, yet must still match the /8.
        let routes = Routes::build(vec![
            route([10, 0, 0, 0], [255, 0, 0, 0], [0, 0, 0, 0], 0),
            route([10, 1, 0, 0], [255, 255, 0, 0], [0, 0, 0, 0], 1),
            route([10, 2, 0, 0], [255, 255, 0, 0], [0, 0, 0, 0], 2),
        ]);
        assert_eq!(lookup_interface(&routes, [10, 3, 0, 1]), Some(0));
        assert_eq!(lookup_interface(&routes, [10, 2, 0, 1]), Some(2));
    }

    #[test]
    fn test_more_specific_route_only_affects_its_subnet() {
        let before = Routes::build(nested());
        let mut entries = nested();
        entries.push(route([10, 1, 2, 128], [255, 255, 255, 128], [10, 1, 2, 129], 5));
        let after = Routes::build(entries);

        assert_eq!(lookup_interface(&after, [10, 1, 2, 200]), Some(5));
        for addr in [[10, 1, 2, 7], [10, 1, 9, 9], [10, 9, 9, 9], [1, 2, 3, 4]] {
            assert_eq!(lookup_interface(&after, addr), lookup_interface(&before, addr));
        }
    }

    #[test]
    fn test_host_bits_in_prefix_are_ignored() {
        let routes = Routes::build(vec![route([10, 1, 2, 3], [255, 255, 0, 0], [0, 0, 0, 0], 7)]);
        assert_eq!(lookup_interface(&routes, [10, 1, 200, 1]), Some(7));
    }

    #[test]
    fn test_lookup_matches_linear_scan() {
        use rand::{Rng, SeedableRng};

        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let mut entries = Vec::new();
        for i in 0..64 {
            let prefix_len = rng.gen_range(0..=32u32);
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            // Keep the address space small so routes overlap.
            let prefix = 0x0a00_0000 | (rng.gen::<u32>() & 0x0003_ffff);
            entries.push(RouteEntry {
                prefix: Ipv4Address::from_bits(prefix),
                next_hop: Ipv4Address::from_bits(i),
                mask: Ipv4Address::from_bits(mask),
                interface: InterfaceId(i as usize),
            });
        }
        let routes = Routes::build(entries.clone());

        for _ in 0..4096 {
            let addr = Ipv4Address::from_bits(0x0a00_0000 | (rng.gen::<u32>() & 0x0003_ffff));
            let expected = entries
                .iter()
                .filter(|entry| entry.contains_addr(addr))
                .map(|entry| entry.mask.to_bits())
                .max();
            assert_eq!(
                routes.lookup(addr).map(|entry| entry.mask.to_bits()),
                expected,
                "lookup of {}",
                addr
            );
            if let Some(entry) = routes.lookup(addr) {
                assert!(entry.contains_addr(addr));
            }
        }
    }
}
