//! Bridge protocol adapters
//!
//! One [`ProtocolAdapter`] implementation per bridge protocol, plus the
//! [`AdapterRegistry`] that selects one at runtime from a [`Protocol`] value.
//!
//! | Protocol  | Visibility | Status source                         |
//! |-----------|------------|---------------------------------------|
//! | Axelar    | Full       | Axelarscan GMP API                    |
//! | Hyperlane | Full       | Mailbox events and `delivered` lookup |
//! | LayerZero | RelayOnly  | LayerZero Scan API                    |
//! | Wormhole  | OriginOnly | none, delivery is assumed             |

mod adapter_trait;
mod axelar;
mod hyperlane;
mod layerzero;
mod registry;
mod wormhole;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

pub(crate) use adapter_trait::ensure_supported;
pub use adapter_trait::ProtocolAdapter;
pub use axelar::{
    axelar_chain_name, AxelarAdapter, GmpStatus, AXELAR_GAS_LIMIT, AXELAR_POLL_INTERVAL,
};
pub use hyperlane::{hyperlane_domain, HyperlaneAdapter, MailboxStatus, HYPERLANE_POLL_INTERVAL};
pub use layerzero::{
    layerzero_endpoint_id, LayerZeroAdapter, LayerZeroMessageStatus, LAYERZERO_POLL_INTERVAL,
};
pub use registry::AdapterRegistry;
pub use wormhole::{wormhole_chain_id, WormholeAdapter, WORMHOLE_POLL_INTERVAL};

/// Placeholder fee charged by protocols without a live quoting service:
/// 0.1 of the origin chain's native token.
pub const FIXED_PLACEHOLDER_FEE_WEI: u128 = 100_000_000_000_000_000;

/// Runtime identifier of a bridge protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Axelar,
    Hyperlane,
    LayerZero,
    Wormhole,
}

impl Protocol {
    pub const ALL: [Protocol; 4] = [
        Protocol::Axelar,
        Protocol::Hyperlane,
        Protocol::LayerZero,
        Protocol::Wormhole,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Axelar => "axelar",
            Self::Hyperlane => "hyperlane",
            Self::LayerZero => "layerzero",
            Self::Wormhole => "wormhole",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrackerError::InvalidConfig(format!("Unknown protocol: {s}")))
    }
}

/// A chain identifier in a protocol's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ProtocolChainId {
    /// Name-addressed protocols such as Axelar (`"moonbeam"`).
    Name(&'static str),
    /// Numerically addressed protocols (LayerZero endpoint ids, Hyperlane
    /// domains, Wormhole chain ids).
    Numeric(u32),
}

impl fmt::Display for ProtocolChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Numeric(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_round_trips_through_str() {
        for protocol in Protocol::ALL {
            assert_eq!(protocol.to_string().parse::<Protocol>().unwrap(), protocol);
        }
        assert_eq!("LayerZero".parse::<Protocol>().unwrap(), Protocol::LayerZero);
    }

    #[test]
    fn test_unknown_protocol() {
        assert!(matches!(
            "ccip".parse::<Protocol>(),
            Err(TrackerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_protocol_chain_id_display() {
        assert_eq!(ProtocolChainId::Name("moonbeam").to_string(), "moonbeam");
        assert_eq!(ProtocolChainId::Numeric(10126).to_string(), "10126");
    }
}
