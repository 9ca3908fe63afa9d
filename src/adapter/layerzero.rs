//! LayerZero
//!
//! Relay-only visibility: LayerZero Scan reports whether a message is in
//! flight, delivered or failed, but never distinguishes relay hand-off from
//! destination execution. `Success` here means "the relay confirmed delivery".

use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use super::{ensure_supported, Protocol, ProtocolAdapter, ProtocolChainId, FIXED_PLACEHOLDER_FEE_WEI};
use crate::chain::addresses::{
    LAYERZERO_FANTOM_TESTNET_MESSAGE_CONTRACT, LAYERZERO_MOONBASE_MESSAGE_CONTRACT,
};
use crate::error::{Result, TrackerError};
use crate::protocol::{CrossChainState, RelayStatusSnapshot, Visibility};
use crate::providers::LayerZeroScanClient;
use crate::traits::RelayStatusSource;

pub const LAYERZERO_POLL_INTERVAL: Duration = Duration::from_secs(3);

const LAYERZERO_CHAINS: [NamedChain; 2] = [NamedChain::Moonbase, NamedChain::FantomTestnet];

/// LayerZero v1 endpoint id for a chain.
pub fn layerzero_endpoint_id(chain: NamedChain) -> Option<u32> {
    match chain {
        NamedChain::Moonbase => Some(10126),
        NamedChain::AvalancheFuji => Some(10106),
        NamedChain::BinanceSmartChainTestnet => Some(10102),
        NamedChain::FantomTestnet => Some(10112),
        _ => None,
    }
}

/// Message status as reported by LayerZero Scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerZeroMessageStatus {
    Inflight,
    Delivered,
    Failed,
}

impl LayerZeroMessageStatus {
    /// Code used when the scan API knows no message for the transaction yet.
    pub const NOT_FOUND: &'static str = "NOT_FOUND";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inflight => "INFLIGHT",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "INFLIGHT" => Some(Self::Inflight),
            "DELIVERED" => Some(Self::Delivered),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerZeroAdapter<S> {
    source: S,
}

impl<S: RelayStatusSource> LayerZeroAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl LayerZeroAdapter<LayerZeroScanClient> {
    /// Adapter backed by the public LayerZero Scan testnet API.
    pub fn testnet() -> Self {
        Self::new(LayerZeroScanClient::testnet())
    }
}

#[async_trait]
impl<S: RelayStatusSource> ProtocolAdapter for LayerZeroAdapter<S> {
    fn protocol(&self) -> Protocol {
        Protocol::LayerZero
    }

    fn supported_chains(&self) -> &[NamedChain] {
        &LAYERZERO_CHAINS
    }

    fn contract_address(&self, chain: NamedChain) -> Result<Address> {
        match chain {
            NamedChain::Moonbase => Ok(LAYERZERO_MOONBASE_MESSAGE_CONTRACT),
            NamedChain::FantomTestnet => Ok(LAYERZERO_FANTOM_TESTNET_MESSAGE_CONTRACT),
            _ => Err(TrackerError::UnsupportedChain {
                protocol: Protocol::LayerZero,
                chain,
            }),
        }
    }

    fn protocol_chain_id(&self, chain: NamedChain) -> Result<ProtocolChainId> {
        ensure_supported(self, chain)?;
        layerzero_endpoint_id(chain)
            .map(ProtocolChainId::Numeric)
            .ok_or(TrackerError::UnsupportedChain {
                protocol: Protocol::LayerZero,
                chain,
            })
    }

    fn visibility(&self) -> Visibility {
        Visibility::RelayOnly
    }

    fn poll_interval(&self) -> Duration {
        LAYERZERO_POLL_INTERVAL
    }

    async fn poll(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        self.source.query_status(origin_tx_hash).await
    }

    fn classify(&self, snapshot: &RelayStatusSnapshot) -> CrossChainState {
        if snapshot.is_cannot_fetch() {
            return CrossChainState::RelayError;
        }

        if snapshot.destination_success == Some(false) {
            return CrossChainState::DestinationError;
        }

        match LayerZeroMessageStatus::parse(&snapshot.code) {
            Some(LayerZeroMessageStatus::Delivered) => CrossChainState::Success,
            Some(LayerZeroMessageStatus::Failed) => CrossChainState::DestinationError,
            Some(LayerZeroMessageStatus::Inflight) | None => CrossChainState::RelayPending,
        }
    }

    async fn gas_fee_quote(&self, origin: NamedChain, destination: NamedChain) -> Result<U256> {
        ensure_supported(self, origin)?;
        ensure_supported(self, destination)?;
        Ok(U256::from(FIXED_PLACEHOLDER_FEE_WEI))
    }
}
