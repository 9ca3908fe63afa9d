//! Wormhole
//!
//! Origin-only visibility: there is no relay status source, so a mined origin
//! transaction is taken as delivered. `Success` here means exactly that.

use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use super::{ensure_supported, Protocol, ProtocolAdapter, ProtocolChainId};
use crate::chain::addresses::WORMHOLE_MESSAGE_CONTRACT;
use crate::error::{Result, TrackerError};
use crate::protocol::{CrossChainState, RelayStatusSnapshot, Visibility};
use crate::providers::AssumedDelivery;
use crate::traits::RelayStatusSource;

pub const WORMHOLE_POLL_INTERVAL: Duration = Duration::from_secs(3);

const WORMHOLE_CHAINS: [NamedChain; 4] = [
    NamedChain::Moonbase,
    NamedChain::FantomTestnet,
    NamedChain::AvalancheFuji,
    NamedChain::Goerli,
];

/// Wormhole chain id for a chain.
pub fn wormhole_chain_id(chain: NamedChain) -> Option<u32> {
    match chain {
        NamedChain::Goerli => Some(2),
        NamedChain::Polygon => Some(5),
        NamedChain::AvalancheFuji => Some(6),
        NamedChain::FantomTestnet => Some(10),
        NamedChain::Moonbase => Some(16),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct WormholeAdapter<S = AssumedDelivery> {
    source: S,
}

impl WormholeAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: RelayStatusSource> WormholeAdapter<S> {
    /// Adapter over a custom status source, e.g. a Wormhole guardian API.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: RelayStatusSource> ProtocolAdapter for WormholeAdapter<S> {
    fn protocol(&self) -> Protocol {
        Protocol::Wormhole
    }

    fn supported_chains(&self) -> &[NamedChain] {
        &WORMHOLE_CHAINS
    }

    fn contract_address(&self, chain: NamedChain) -> Result<Address> {
        ensure_supported(self, chain)?;
        Ok(WORMHOLE_MESSAGE_CONTRACT)
    }

    fn protocol_chain_id(&self, chain: NamedChain) -> Result<ProtocolChainId> {
        ensure_supported(self, chain)?;
        wormhole_chain_id(chain)
            .map(ProtocolChainId::Numeric)
            .ok_or(TrackerError::UnsupportedChain {
                protocol: Protocol::Wormhole,
                chain,
            })
    }

    fn visibility(&self) -> Visibility {
        Visibility::OriginOnly
    }

    fn poll_interval(&self) -> Duration {
        WORMHOLE_POLL_INTERVAL
    }

    async fn poll(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        self.source.query_status(origin_tx_hash).await
    }

    fn classify(&self, snapshot: &RelayStatusSnapshot) -> CrossChainState {
        if snapshot.code == AssumedDelivery::CODE {
            CrossChainState::Success
        } else {
            CrossChainState::RelayPending
        }
    }

    /// Delivery is paid by the relayer, so sends carry no extra value.
    async fn gas_fee_quote(&self, origin: NamedChain, destination: NamedChain) -> Result<U256> {
        ensure_supported(self, origin)?;
        ensure_supported(self, destination)?;
        Ok(U256::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_poll_reports_success() {
        let adapter = WormholeAdapter::new();

        let snapshot = adapter.poll(TxHash::repeat_byte(7)).await.unwrap();

        assert_eq!(adapter.classify(&snapshot), CrossChainState::Success);
    }

    #[test]
    fn test_classify_is_total() {
        let adapter = WormholeAdapter::new();
        assert_eq!(
            adapter.classify(&RelayStatusSnapshot::new("anything")),
            CrossChainState::RelayPending
        );
        assert_eq!(
            adapter.classify(&RelayStatusSnapshot::cannot_fetch()),
            CrossChainState::RelayPending
        );
    }

    #[test]
    fn test_shared_deployment_address() {
        let adapter = WormholeAdapter::new();
        for chain in WORMHOLE_CHAINS {
            assert_eq!(adapter.contract_address(chain).unwrap(), WORMHOLE_MESSAGE_CONTRACT);
        }
        assert!(adapter.contract_address(NamedChain::Mainnet).is_err());
    }

    #[test]
    fn test_chain_id_requires_supported_chain() {
        let adapter = WormholeAdapter::new();
        assert_eq!(
            adapter.protocol_chain_id(NamedChain::Moonbase).unwrap(),
            ProtocolChainId::Numeric(16)
        );
        assert_eq!(wormhole_chain_id(NamedChain::Polygon), Some(5));
        assert!(matches!(
            adapter.protocol_chain_id(NamedChain::Polygon),
            Err(TrackerError::UnsupportedChain {
                protocol: Protocol::Wormhole,
                chain: NamedChain::Polygon,
            })
        ));
    }

    #[tokio::test]
    async fn test_zero_fee() {
        let fee = WormholeAdapter::new()
            .gas_fee_quote(NamedChain::Moonbase, NamedChain::FantomTestnet)
            .await
            .unwrap();
        assert_eq!(fee, U256::ZERO);
    }
}
