use alloc::vec::Vec;

use crate::phy::InterfaceId;
use crate::wire::{EthernetAddress, Ipv4Address};

/// Addressing of one router port.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct InterfaceConfig {
    pub mac: EthernetAddress,
    pub ip: Ipv4Address,
}

impl InterfaceConfig {
    pub const fn new(mac: EthernetAddress, ip: Ipv4Address) -> InterfaceConfig {
        InterfaceConfig { mac, ip }
    }
}

/// The set of router ports, indexed by [InterfaceId](../phy/struct.InterfaceId.html).
#[derive(Debug, Clone, Default)]
pub struct Interfaces {
    configs: Vec<InterfaceConfig>,
}

impl Interfaces {
    /// Create the port table; the n-th config describes `InterfaceId(n)`.
    pub fn new(configs: Vec<InterfaceConfig>) -> Interfaces {
        Interfaces { configs }
    }

    /// Return the addressing of `id`, or `None` if there is no such port.
    pub fn get(&self, id: InterfaceId) -> Option<&InterfaceConfig> {
        self.configs.get(id.0)
    }

    /// Return the hardware address of `id`.
    pub fn interface_mac(&self, id: InterfaceId) -> Option<EthernetAddress> {
        self.get(id).map(|config| config.mac)
    }

    /// Return the protocol address of `id`.
    pub fn interface_ip(&self, id: InterfaceId) -> Option<Ipv4Address> {
        self.get(id).map(|config| config.ip)
    }

    /// Query whether `id` names a configured port.
    pub fn contains(&self, id: InterfaceId) -> bool {
        id.0 < self.configs.len()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Iterate over the ports in index order.
    pub fn iter(&self) -> impl Iterator<Item = (InterfaceId, &InterfaceConfig)> + '_ {
        self.configs
            .iter()
            .enumerate()
            .map(|(index, config)| (InterfaceId(index), config))
    }
}
