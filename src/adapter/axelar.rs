//! Axelar General Message Passing
//!
//! Full visibility: Axelarscan reports gateway approval and destination
//! execution separately, so all three stages are observable.

use std::fmt;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{ensure_supported, Protocol, ProtocolAdapter, ProtocolChainId};
use crate::chain::addresses::{
    AXELAR_FANTOM_TESTNET_MESSAGE_CONTRACT, AXELAR_FUJI_MESSAGE_CONTRACT,
    AXELAR_MOONBASE_MESSAGE_CONTRACT,
};
use crate::chain::native_token_symbol;
use crate::error::{Result, TrackerError};
use crate::protocol::{CrossChainState, RelayStatusSnapshot, Visibility};
use crate::providers::AxelarscanClient;
use crate::traits::{GasFeeEstimator, RelayStatusSource};

pub const AXELAR_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Destination execution gas the fee quote pays for.
pub const AXELAR_GAS_LIMIT: u64 = 200_000;

const AXELAR_CHAINS: [NamedChain; 3] = [
    NamedChain::Moonbase,
    NamedChain::FantomTestnet,
    NamedChain::AvalancheFuji,
];

/// Chain name Axelar uses on the wire. Testnets share their mainnet's name.
pub fn axelar_chain_name(chain: NamedChain) -> Option<&'static str> {
    use NamedChain::*;

    match chain {
        Moonbase | Moonbeam => Some("moonbeam"),
        FantomTestnet | Fantom => Some("fantom"),
        AvalancheFuji | Avalanche => Some("avalanche"),
        Polygon => Some("polygon"),
        _ => None,
    }
}

/// GMP status vocabulary carried in Axelar snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GmpStatus {
    SourceGatewayCalled,
    Confirmed,
    Approving,
    DestinationGatewayApproved,
    Executing,
    DestinationExecuted,
    ExpressExecuted,
    DestinationExecuteError,
    InsufficientFee,
    CannotFetchStatus,
}

impl GmpStatus {
    const ALL: [GmpStatus; 10] = [
        GmpStatus::SourceGatewayCalled,
        GmpStatus::Confirmed,
        GmpStatus::Approving,
        GmpStatus::DestinationGatewayApproved,
        GmpStatus::Executing,
        GmpStatus::DestinationExecuted,
        GmpStatus::ExpressExecuted,
        GmpStatus::DestinationExecuteError,
        GmpStatus::InsufficientFee,
        GmpStatus::CannotFetchStatus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceGatewayCalled => "source_gateway_called",
            Self::Confirmed => "confirmed",
            Self::Approving => "approving",
            Self::DestinationGatewayApproved => "destination_gateway_approved",
            Self::Executing => "executing",
            Self::DestinationExecuted => "destination_executed",
            Self::ExpressExecuted => "express_executed",
            Self::DestinationExecuteError => "destination_execute_error",
            Self::InsufficientFee => "insufficient_fee",
            Self::CannotFetchStatus => RelayStatusSnapshot::CANNOT_FETCH,
        }
    }

    /// Parses a snapshot code. Unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == code)
    }

    /// Translates a raw Axelarscan `status` field into the GMP vocabulary.
    ///
    /// Axelarscan reports the bare lifecycle step (`called`, `approved`,
    /// `executed`, ...); unrecognised values pass through untranslated and
    /// classify as in flight.
    pub fn from_axelarscan(raw: &str) -> Option<Self> {
        match raw {
            "called" => Some(Self::SourceGatewayCalled),
            "confirmed" | "confirming" => Some(Self::Confirmed),
            "approving" => Some(Self::Approving),
            "approved" => Some(Self::DestinationGatewayApproved),
            "executing" => Some(Self::Executing),
            "executed" => Some(Self::DestinationExecuted),
            "express_executed" => Some(Self::ExpressExecuted),
            "error" => Some(Self::DestinationExecuteError),
            "insufficient_fee" => Some(Self::InsufficientFee),
            _ => None,
        }
    }
}

impl fmt::Display for GmpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axelar adapter over any status source that can also quote fees.
#[derive(Debug, Clone)]
pub struct AxelarAdapter<S> {
    source: S,
}

impl<S> AxelarAdapter<S>
where
    S: RelayStatusSource + GasFeeEstimator,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl AxelarAdapter<AxelarscanClient> {
    /// Adapter backed by the public Axelarscan testnet API.
    pub fn testnet() -> Self {
        Self::new(AxelarscanClient::testnet())
    }
}

#[async_trait]
impl<S> ProtocolAdapter for AxelarAdapter<S>
where
    S: RelayStatusSource + GasFeeEstimator,
{
    fn protocol(&self) -> Protocol {
        Protocol::Axelar
    }

    fn supported_chains(&self) -> &[NamedChain] {
        &AXELAR_CHAINS
    }

    fn contract_address(&self, chain: NamedChain) -> Result<Address> {
        match chain {
            NamedChain::Moonbase => Ok(AXELAR_MOONBASE_MESSAGE_CONTRACT),
            NamedChain::FantomTestnet => Ok(AXELAR_FANTOM_TESTNET_MESSAGE_CONTRACT),
            NamedChain::AvalancheFuji => Ok(AXELAR_FUJI_MESSAGE_CONTRACT),
            _ => Err(TrackerError::UnsupportedChain {
                protocol: Protocol::Axelar,
                chain,
            }),
        }
    }

    fn protocol_chain_id(&self, chain: NamedChain) -> Result<ProtocolChainId> {
        ensure_supported(self, chain)?;
        axelar_chain_name(chain)
            .map(ProtocolChainId::Name)
            .ok_or(TrackerError::UnsupportedChain {
                protocol: Protocol::Axelar,
                chain,
            })
    }

    fn visibility(&self) -> Visibility {
        Visibility::Full
    }

    fn poll_interval(&self) -> Duration {
        AXELAR_POLL_INTERVAL
    }

    async fn poll(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        self.source.query_status(origin_tx_hash).await
    }

    fn classify(&self, snapshot: &RelayStatusSnapshot) -> CrossChainState {
        use GmpStatus::*;

        match GmpStatus::parse(&snapshot.code) {
            Some(CannotFetchStatus) => CrossChainState::RelayError,
            Some(DestinationExecuteError | InsufficientFee) => CrossChainState::DestinationError,
            Some(DestinationGatewayApproved | Executing) => CrossChainState::DestinationPending,
            Some(DestinationExecuted | ExpressExecuted) => CrossChainState::Success,
            Some(SourceGatewayCalled | Confirmed | Approving) | None => {
                CrossChainState::RelayPending
            }
        }
    }

    #[instrument(skip(self), fields(protocol = "axelar"))]
    async fn gas_fee_quote(&self, origin: NamedChain, destination: NamedChain) -> Result<U256> {
        ensure_supported(self, origin)?;
        ensure_supported(self, destination)?;

        let symbol = native_token_symbol(origin).ok_or_else(|| TrackerError::FeeQuote {
            reason: format!("no native token symbol known for {origin}"),
        })?;

        let fee = self
            .source
            .estimate(origin, destination, symbol, AXELAR_GAS_LIMIT)
            .await
            .map_err(|e| match e {
                TrackerError::FeeQuote { .. } => e,
                other => TrackerError::FeeQuote {
                    reason: other.to_string(),
                },
            })?;

        debug!(
            fee = %fee,
            token = symbol,
            event = "axelar_fee_quoted"
        );
        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRelayStatusSource;
    use rstest::rstest;

    fn adapter() -> AxelarAdapter<FakeRelayStatusSource> {
        AxelarAdapter::new(FakeRelayStatusSource::new())
    }

    #[rstest]
    #[case("cannot_fetch_status", CrossChainState::RelayError)]
    #[case("destination_execute_error", CrossChainState::DestinationError)]
    #[case("insufficient_fee", CrossChainState::DestinationError)]
    #[case("destination_gateway_approved", CrossChainState::DestinationPending)]
    #[case("executing", CrossChainState::DestinationPending)]
    #[case("destination_executed", CrossChainState::Success)]
    #[case("express_executed", CrossChainState::Success)]
    #[case("source_gateway_called", CrossChainState::RelayPending)]
    #[case("approving", CrossChainState::RelayPending)]
    #[case("something_new", CrossChainState::RelayPending)]
    #[case("", CrossChainState::RelayPending)]
    fn test_classify(#[case] code: &str, #[case] expected: CrossChainState) {
        assert_eq!(adapter().classify(&RelayStatusSnapshot::new(code)), expected);
    }

    #[test]
    fn test_gmp_status_round_trips_through_code() {
        for status in GmpStatus::ALL {
            assert_eq!(GmpStatus::parse(status.as_str()), Some(status));
        }
    }

    #[rstest]
    #[case("called", Some(GmpStatus::SourceGatewayCalled))]
    #[case("approved", Some(GmpStatus::DestinationGatewayApproved))]
    #[case("executed", Some(GmpStatus::DestinationExecuted))]
    #[case("error", Some(GmpStatus::DestinationExecuteError))]
    #[case("unheard_of", None)]
    fn test_from_axelarscan(#[case] raw: &str, #[case] expected: Option<GmpStatus>) {
        assert_eq!(GmpStatus::from_axelarscan(raw), expected);
    }

    #[rstest]
    #[case(NamedChain::Moonbase, "moonbeam")]
    #[case(NamedChain::FantomTestnet, "fantom")]
    #[case(NamedChain::AvalancheFuji, "avalanche")]
    fn test_protocol_chain_id(#[case] chain: NamedChain, #[case] name: &'static str) {
        assert_eq!(
            adapter().protocol_chain_id(chain).unwrap(),
            ProtocolChainId::Name(name)
        );
    }

    #[test]
    fn test_unsupported_chain() {
        let adapter = adapter();
        assert!(!adapter.supports_chain(NamedChain::Goerli));
        assert!(matches!(
            adapter.contract_address(NamedChain::Goerli),
            Err(TrackerError::UnsupportedChain {
                protocol: Protocol::Axelar,
                chain: NamedChain::Goerli
            })
        ));
    }

    #[tokio::test]
    async fn test_gas_fee_quote_uses_origin_token_and_gas_limit() {
        let source = FakeRelayStatusSource::new().with_fee(U256::from(42u64));
        let adapter = AxelarAdapter::new(source.clone());

        let fee = adapter
            .gas_fee_quote(NamedChain::Moonbase, NamedChain::AvalancheFuji)
            .await
            .unwrap();

        assert_eq!(fee, U256::from(42u64));
        let requests = source.fee_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].token_symbol, "GLMR");
        assert_eq!(requests[0].gas_units, AXELAR_GAS_LIMIT);
    }

    #[tokio::test]
    async fn test_gas_fee_quote_failure_becomes_fee_quote_error() {
        let source = FakeRelayStatusSource::new().with_fee_failure();
        let adapter = AxelarAdapter::new(source);

        let err = adapter
            .gas_fee_quote(NamedChain::Moonbase, NamedChain::AvalancheFuji)
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::FeeQuote { .. }));
    }

    #[tokio::test]
    async fn test_poll_forwards_to_source() {
        let source = FakeRelayStatusSource::new().with_codes(["executing"]);
        let adapter = AxelarAdapter::new(source.clone());

        let snapshot = adapter.poll(TxHash::repeat_byte(1)).await.unwrap();

        assert_eq!(snapshot.code, "executing");
        assert_eq!(source.call_count(), 1);
    }
}
