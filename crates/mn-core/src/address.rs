//! IPv4 addressing for simulated nodes.
//!
//! Every node owns one interface on a single /24 ad-hoc subnet; host part =
//! node id + 1 (the network address itself is never assigned).

use std::net::Ipv4Addr;

use crate::NodeId;

/// Maps node ids to addresses on one /24 subnet and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPlan {
    network: [u8; 3],
}

impl AddressPlan {
    /// Host addresses available on a /24 (excluding network and broadcast).
    pub const CAPACITY: u32 = 254;

    pub fn new(network: Ipv4Addr) -> Self {
        let [a, b, c, _] = network.octets();
        Self { network: [a, b, c] }
    }

    /// Address of `node`, or `None` if the subnet is exhausted.
    pub fn address_of(&self, node: NodeId) -> Option<Ipv4Addr> {
        if node.0 >= Self::CAPACITY {
            return None;
        }
        let [a, b, c] = self.network;
        Some(Ipv4Addr::new(a, b, c, (node.0 + 1) as u8))
    }

    /// Inverse of [`address_of`][Self::address_of].
    pub fn node_of(&self, addr: Ipv4Addr) -> Option<NodeId> {
        let [a, b, c, host] = addr.octets();
        if [a, b, c] != self.network || host == 0 || host == 255 {
            return None;
        }
        Some(NodeId(host as u32 - 1))
    }
}

impl Default for AddressPlan {
    /// `10.1.1.0/24`.
    fn default() -> Self {
        Self::new(Ipv4Addr::new(10, 1, 1, 0))
    }
}
