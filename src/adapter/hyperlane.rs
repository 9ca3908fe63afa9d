//! Hyperlane
//!
//! Full visibility: the origin receipt carries the dispatched message id, and
//! the destination Mailbox answers whether that id has been processed.

use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use super::{ensure_supported, Protocol, ProtocolAdapter, ProtocolChainId, FIXED_PLACEHOLDER_FEE_WEI};
use crate::chain::addresses::{HYPERLANE_FUJI_MESSAGE_CONTRACT, HYPERLANE_MOONBASE_MESSAGE_CONTRACT};
use crate::error::{Result, TrackerError};
use crate::protocol::{CrossChainState, RelayStatusSnapshot, Visibility};
use crate::traits::RelayStatusSource;

pub const HYPERLANE_POLL_INTERVAL: Duration = Duration::from_secs(3);

const HYPERLANE_CHAINS: [NamedChain; 2] = [NamedChain::Moonbase, NamedChain::AvalancheFuji];

/// Hyperlane domain identifier for a chain.
///
/// Moonbase and BSC testnet use ASCII-packed domains (`"mo-a"`, `"bs-t"`)
/// rather than their EVM chain ids.
pub fn hyperlane_domain(chain: NamedChain) -> Option<u32> {
    match chain {
        NamedChain::Moonbase => Some(0x6d6f_2d61),
        NamedChain::AvalancheFuji => Some(43113),
        NamedChain::BinanceSmartChainTestnet => Some(0x6273_2d74),
        _ => None,
    }
}

/// Delivery vocabulary produced by
/// [`MailboxStatusSource`](crate::providers::MailboxStatusSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailboxStatus {
    /// The origin receipt carries no `DispatchId` log (yet).
    NotDispatched,
    /// Dispatched on the origin Mailbox, not yet processed on the destination.
    Dispatched,
    /// The destination Mailbox reports the message id as delivered.
    Delivered,
    /// The destination `process` transaction reverted.
    ProcessFailed,
}

impl MailboxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDispatched => "not_dispatched",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::ProcessFailed => "process_failed",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        [
            Self::NotDispatched,
            Self::Dispatched,
            Self::Delivered,
            Self::ProcessFailed,
        ]
        .into_iter()
        .find(|s| s.as_str() == code)
    }
}

/// Hyperlane adapter.
///
/// The status source is bound to one origin/destination pair because it reads
/// both chains, so there is no zero-configuration constructor.
#[derive(Debug, Clone)]
pub struct HyperlaneAdapter<S> {
    source: S,
}

impl<S: RelayStatusSource> HyperlaneAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: RelayStatusSource> ProtocolAdapter for HyperlaneAdapter<S> {
    fn protocol(&self) -> Protocol {
        Protocol::Hyperlane
    }

    fn supported_chains(&self) -> &[NamedChain] {
        &HYPERLANE_CHAINS
    }

    fn contract_address(&self, chain: NamedChain) -> Result<Address> {
        match chain {
            NamedChain::Moonbase => Ok(HYPERLANE_MOONBASE_MESSAGE_CONTRACT),
            NamedChain::AvalancheFuji => Ok(HYPERLANE_FUJI_MESSAGE_CONTRACT),
            _ => Err(TrackerError::UnsupportedChain {
                protocol: Protocol::Hyperlane,
                chain,
            }),
        }
    }

    fn protocol_chain_id(&self, chain: NamedChain) -> Result<ProtocolChainId> {
        ensure_supported(self, chain)?;
        hyperlane_domain(chain)
            .map(ProtocolChainId::Numeric)
            .ok_or(TrackerError::UnsupportedChain {
                protocol: Protocol::Hyperlane,
                chain,
            })
    }

    fn visibility(&self) -> Visibility {
        Visibility::Full
    }

    fn poll_interval(&self) -> Duration {
        HYPERLANE_POLL_INTERVAL
    }

    async fn poll(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        self.source.query_status(origin_tx_hash).await
    }

    fn classify(&self, snapshot: &RelayStatusSnapshot) -> CrossChainState {
        if snapshot.is_cannot_fetch() {
            return CrossChainState::RelayError;
        }

        match MailboxStatus::parse(&snapshot.code) {
            Some(MailboxStatus::Dispatched) => CrossChainState::DestinationPending,
            Some(MailboxStatus::Delivered) if snapshot.destination_success == Some(false) => {
                CrossChainState::DestinationError
            }
            Some(MailboxStatus::Delivered) => CrossChainState::Success,
            Some(MailboxStatus::ProcessFailed) => CrossChainState::DestinationError,
            Some(MailboxStatus::NotDispatched) | None => CrossChainState::RelayPending,
        }
    }

    async fn gas_fee_quote(&self, origin: NamedChain, destination: NamedChain) -> Result<U256> {
        ensure_supported(self, origin)?;
        ensure_supported(self, destination)?;
        Ok(U256::from(FIXED_PLACEHOLDER_FEE_WEI))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRelayStatusSource;
    use rstest::rstest;

    fn adapter() -> HyperlaneAdapter<FakeRelayStatusSource> {
        HyperlaneAdapter::new(FakeRelayStatusSource::new())
    }

    #[rstest]
    #[case(RelayStatusSnapshot::new("not_dispatched"), CrossChainState::RelayPending)]
    #[case(RelayStatusSnapshot::new("dispatched"), CrossChainState::DestinationPending)]
    #[case(RelayStatusSnapshot::new("delivered"), CrossChainState::Success)]
    #[case(
        RelayStatusSnapshot::new("delivered").with_destination_success(Some(true)),
        CrossChainState::Success
    )]
    #[case(
        RelayStatusSnapshot::new("delivered").with_destination_success(Some(false)),
        CrossChainState::DestinationError
    )]
    #[case(RelayStatusSnapshot::new("process_failed"), CrossChainState::DestinationError)]
    #[case(RelayStatusSnapshot::cannot_fetch(), CrossChainState::RelayError)]
    #[case(RelayStatusSnapshot::new("garbage"), CrossChainState::RelayPending)]
    fn test_classify(#[case] snapshot: RelayStatusSnapshot, #[case] expected: CrossChainState) {
        assert_eq!(adapter().classify(&snapshot), expected);
    }

    #[rstest]
    #[case(NamedChain::Moonbase, 1_836_002_657)]
    #[case(NamedChain::AvalancheFuji, 43113)]
    #[case(NamedChain::BinanceSmartChainTestnet, 1_651_715_444)]
    fn test_domains(#[case] chain: NamedChain, #[case] domain: u32) {
        assert_eq!(hyperlane_domain(chain), Some(domain));
    }

    #[rstest]
    #[case(NamedChain::Moonbase, Some(1_836_002_657))]
    #[case(NamedChain::AvalancheFuji, Some(43113))]
    #[case(NamedChain::BinanceSmartChainTestnet, None)]
    fn test_protocol_chain_id_requires_supported_chain(
        #[case] chain: NamedChain,
        #[case] expected: Option<u32>,
    ) {
        let result = adapter().protocol_chain_id(chain);
        match expected {
            Some(domain) => assert_eq!(result.unwrap(), ProtocolChainId::Numeric(domain)),
            None => assert!(matches!(
                result,
                Err(TrackerError::UnsupportedChain {
                    protocol: Protocol::Hyperlane,
                    ..
                })
            )),
        }
    }

    #[tokio::test]
    async fn test_fixed_fee() {
        let fee = adapter()
            .gas_fee_quote(NamedChain::Moonbase, NamedChain::AvalancheFuji)
            .await
            .unwrap();
        assert_eq!(fee, U256::from(FIXED_PLACEHOLDER_FEE_WEI));
    }

    #[tokio::test]
    async fn test_fee_for_unsupported_destination() {
        let err = adapter()
            .gas_fee_quote(NamedChain::Moonbase, NamedChain::BinanceSmartChainTestnet)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::UnsupportedChain { .. }));
    }
}
