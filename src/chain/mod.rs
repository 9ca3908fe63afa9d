//! Chain-level configuration shared by every protocol adapter
//!
//! This module contains contract addresses, the mainnet/testnet environment
//! switch that selects relay API endpoints, and native gas token symbols.

pub mod addresses;

use alloy_chains::NamedChain;
use serde::{Deserialize, Serialize};

/// Deployment environment, used to pick relay status API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Mainnet,
    Testnet,
}

impl Environment {
    /// The environment an origin chain belongs to.
    pub fn of(chain: NamedChain) -> Self {
        if chain.is_testnet() {
            Self::Testnet
        } else {
            Self::Mainnet
        }
    }
}

/// Symbol of the native gas token, as fee quoting services expect it.
pub fn native_token_symbol(chain: NamedChain) -> Option<&'static str> {
    use NamedChain::*;

    match chain {
        Mainnet | Goerli | Sepolia => Some("ETH"),
        Moonbeam | Moonbase => Some("GLMR"),
        Polygon | PolygonAmoy => Some("MATIC"),
        Avalanche | AvalancheFuji => Some("AVAX"),
        Fantom | FantomTestnet => Some("FTM"),
        BinanceSmartChain | BinanceSmartChainTestnet => Some("BNB"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NamedChain::Moonbase, Environment::Testnet)]
    #[case(NamedChain::AvalancheFuji, Environment::Testnet)]
    #[case(NamedChain::Mainnet, Environment::Mainnet)]
    #[case(NamedChain::Avalanche, Environment::Mainnet)]
    fn test_environment_of(#[case] chain: NamedChain, #[case] expected: Environment) {
        assert_eq!(Environment::of(chain), expected);
    }

    #[rstest]
    #[case(NamedChain::Moonbase, "GLMR")]
    #[case(NamedChain::FantomTestnet, "FTM")]
    #[case(NamedChain::AvalancheFuji, "AVAX")]
    #[case(NamedChain::PolygonAmoy, "MATIC")]
    #[case(NamedChain::Goerli, "ETH")]
    fn test_native_token_symbol(#[case] chain: NamedChain, #[case] symbol: &str) {
        assert_eq!(native_token_symbol(chain), Some(symbol));
    }

    #[test]
    fn test_native_token_symbol_unknown_chain() {
        assert_eq!(native_token_symbol(NamedChain::Arbitrum), None);
    }
}
