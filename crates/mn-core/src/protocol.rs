//! Dynamic routing protocol selector shared across crates.
//!
//! Only the name and identity of the protocol matter to the harness; the
//! protocol state machines themselves are external collaborators that fill
//! a route table (see `mn-routing`).

use serde::{Deserialize, Serialize};

/// The dynamic routing protocol installed above static routing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum RoutingProtocol {
    /// Optimized Link State Routing.
    Olsr,
    /// Ad hoc On-Demand Distance Vector.
    #[default]
    Aodv,
    /// Destination-Sequenced Distance Vector.
    Dsdv,
    /// Dynamic Source Routing.
    Dsr,
}

impl RoutingProtocol {
    /// Label used in CSV rows and trace file names.
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingProtocol::Olsr => "OLSR",
            RoutingProtocol::Aodv => "AODV",
            RoutingProtocol::Dsdv => "DSDV",
            RoutingProtocol::Dsr  => "DSR",
        }
    }

    /// Numeric selector used by the command line (1=OLSR 2=AODV 3=DSDV 4=DSR).
    pub fn from_selector(n: u32) -> Option<RoutingProtocol> {
        match n {
            1 => Some(RoutingProtocol::Olsr),
            2 => Some(RoutingProtocol::Aodv),
            3 => Some(RoutingProtocol::Dsdv),
            4 => Some(RoutingProtocol::Dsr),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoutingProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OLSR" | "1" => Ok(RoutingProtocol::Olsr),
            "AODV" | "2" => Ok(RoutingProtocol::Aodv),
            "DSDV" | "3" => Ok(RoutingProtocol::Dsdv),
            "DSR"  | "4" => Ok(RoutingProtocol::Dsr),
            other => Err(format!("unknown routing protocol {other:?}")),
        }
    }
}
