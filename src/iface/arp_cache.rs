// Heads up! The cache only ever grows: a second reply for an address
// already present is appended behind the first one, and `find` keeps
// returning the oldest mapping.

use alloc::vec::Vec;

use crate::config::ARP_CACHE_INITIAL_CAPACITY;
use crate::wire::{EthernetAddress, Ipv4Address};
use crate::{Error, Result};

/// A learned protocol to hardware address mapping.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct ArpEntry {
    pub ip: Ipv4Address,
    pub mac: EthernetAddress,
}

/// An append-only ARP cache backed by a growable array.
#[derive(Debug)]
pub struct ArpCache {
    storage: Vec<ArpEntry>,
}

impl ArpCache {
    /// Create an empty cache with room for
    /// [ARP_CACHE_INITIAL_CAPACITY](../config/constant.ARP_CACHE_INITIAL_CAPACITY.html)
    /// entries.
    ///
    /// Returns `Err(Error::Exhausted)` if that storage cannot be allocated.
    pub fn new() -> Result<ArpCache> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(ARP_CACHE_INITIAL_CAPACITY)
            .map_err(|_| Error::Exhausted)?;
        Ok(ArpCache { storage })
    }

    /// Return the hardware address first recorded for `ip`, if any.
    pub fn find(&self, ip: Ipv4Address) -> Option<EthernetAddress> {
        self.storage
            .iter()
            .find(|entry| entry.ip == ip)
            .map(|entry| entry.mac)
    }

    /// Record that `ip` is reachable at `mac`.
    ///
    /// When the cache is full its storage is doubled; `Err(Error::Exhausted)`
    /// is returned if that allocation fails, leaving the cache unchanged.
    pub fn insert(&mut self, ip: Ipv4Address, mac: EthernetAddress) -> Result<()> {
        if self.storage.len() == self.storage.capacity() {
            let additional = self.storage.capacity().max(1);
            self.storage
                .try_reserve_exact(additional)
                .map_err(|_| Error::Exhausted)?;
        }

        if self.find(ip).is_some() {
            net_trace!("arp cache: appending duplicate {} => {}", ip, mac);
        } else {
            net_trace!("arp cache: filled {} => {}", ip, mac);
        }
        self.storage.push(ArpEntry { ip, mac });
        Ok(())
    }

    /// Return the number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Query whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Return the number of entries the cache can hold before growing.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ArpEntry> + '_ {
        self.storage.iter()
    }
}
