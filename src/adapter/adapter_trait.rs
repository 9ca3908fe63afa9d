use crate::error::{Result, TrackerError};
use crate::protocol::{CrossChainState, RelayStatusSnapshot, Visibility};
use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::time::Duration;

use super::{Protocol, ProtocolChainId};

/// Capability set every bridge protocol integration provides
///
/// The tracker, poller and projector only ever talk to a protocol through
/// this trait, so supporting a new bridge means writing one implementation
/// and registering it; nothing else changes.
///
/// # Dynamic Dispatch
///
/// The trait is object-safe and trackers hold adapters as
/// `Arc<dyn ProtocolAdapter>`, selected at runtime by [`Protocol`]:
///
/// ```rust,no_run
/// # use gmp_tracker::{AdapterRegistry, Protocol, ProtocolAdapter};
/// # use alloy_chains::NamedChain;
/// # fn example() -> Result<(), gmp_tracker::TrackerError> {
/// let registry = AdapterRegistry::testnet();
/// let adapter = registry.get(Protocol::Axelar)?;
/// assert!(adapter.supports_chain(NamedChain::Moonbase));
/// # Ok(())
/// # }
/// ```
///
/// # Classification
///
/// `classify` must be a total, deterministic function of the snapshot:
/// unknown codes map to a pending state rather than failing. What `Success`
/// means is protocol-relative; full-visibility protocols report it after
/// destination execution, reduced-visibility ones once the relay confirms
/// delivery (or, with no relay visibility at all, once the origin succeeded).
#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    /// Which protocol this adapter speaks.
    fn protocol(&self) -> Protocol;

    /// Chains with a deployed message contract for this protocol.
    fn supported_chains(&self) -> &[NamedChain];

    /// Whether `chain` appears in [`supported_chains`](Self::supported_chains).
    fn supports_chain(&self, chain: NamedChain) -> bool {
        self.supported_chains().contains(&chain)
    }

    /// Address of the protocol's message contract on `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnsupportedChain`] if the protocol has no
    /// deployment there.
    fn contract_address(&self, chain: NamedChain) -> Result<Address>;

    /// The identifier the protocol itself uses for `chain` (Axelar chain name,
    /// LayerZero endpoint id, ...), passed to the message contract on send.
    fn protocol_chain_id(&self, chain: NamedChain) -> Result<ProtocolChainId>;

    /// How much of the delivery pipeline this protocol can observe.
    fn visibility(&self) -> Visibility;

    /// Default delay between two polls of the relay status source.
    fn poll_interval(&self) -> Duration;

    /// Queries the relay status source once for an origin transaction.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure. An explicit "cannot fetch"
    /// answer is returned as a snapshot and classified as `RelayError`.
    async fn poll(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot>;

    /// Maps a raw snapshot onto the unified state.
    fn classify(&self, snapshot: &RelayStatusSnapshot) -> CrossChainState;

    /// Quotes the cross-chain gas fee to attach to a send, in the origin
    /// chain's native token base units.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnsupportedChain`] if either chain has no
    /// deployment, or [`TrackerError::FeeQuote`] if the quoting service fails.
    async fn gas_fee_quote(&self, origin: NamedChain, destination: NamedChain) -> Result<U256>;
}

/// Shared guard used by adapter implementations.
pub(crate) fn ensure_supported<A>(adapter: &A, chain: NamedChain) -> Result<()>
where
    A: ProtocolAdapter + ?Sized,
{
    if adapter.supports_chain(chain) {
        Ok(())
    } else {
        Err(TrackerError::UnsupportedChain {
            protocol: adapter.protocol(),
            chain,
        })
    }
}
