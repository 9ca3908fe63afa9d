//! # gmp-tracker
//!
//! Unified status tracking for cross-chain messages sent through general
//! message passing (GMP) protocols.
//!
//! Axelar, Hyperlane, LayerZero and Wormhole each report delivery progress in
//! their own vocabulary and through their own channels. This library maps all
//! of them onto one ordered [`CrossChainState`] and a three-stage
//! origin/relay/destination view, so a caller can track a message without
//! knowing which protocol carried it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gmp_tracker::{
//!     AdapterRegistry, CrossChainTracker, Protocol, ReceiptObserver, TransactionHandle,
//! };
//! use gmp_tracker::providers::AlloyProvider;
//! use alloy_chains::NamedChain;
//! use alloy_primitives::TxHash;
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = AdapterRegistry::testnet();
//! let tracker = CrossChainTracker::builder()
//!     .adapter(registry.get(Protocol::Axelar)?)
//!     .origin(NamedChain::Moonbase)
//!     .destination(NamedChain::AvalancheFuji)
//!     .build()?;
//!
//! // Quote the fee and resolve the contracts before sending
//! let plan = tracker.plan_send("hello from Moonbase").await?;
//! println!("attach {} wei to {}", plan.fee, plan.origin_contract);
//!
//! // After the wallet broadcasts the transaction, follow it to delivery
//! let provider = ProviderBuilder::new().connect("https://rpc.api.moonbase.moonbeam.network").await?;
//! let tx_hash = TxHash::ZERO;
//! let observer = ReceiptObserver::new(AlloyProvider::new(provider), TransactionHandle::broadcast(tx_hash));
//!
//! tracker.observe(observer).await?;
//! let exit = tracker.join_poller().await?;
//! println!("{exit:?}: {}", tracker.projected_status());
//! # Ok(())
//! # }
//! ```
//!
//! ## Protocols
//!
//! | Protocol  | What `Success` means                            |
//! |-----------|-------------------------------------------------|
//! | Axelar    | executed on the destination chain               |
//! | Hyperlane | processed by the destination Mailbox            |
//! | LayerZero | the relay reports the message delivered         |
//! | Wormhole  | the origin transaction was mined (assumed)      |
//!
//! ## Public API
//!
//! - [`CrossChainTracker`] - Follows one send from origin broadcast to a terminal state
//! - [`ProtocolAdapter`] and [`AdapterRegistry`] - Per-protocol integrations, selected at runtime
//! - [`CrossChainState`], [`ProjectedStatus`] and [`StatusReport`] - The unified status model
//! - [`SendPlan`] and [`MessageReceiverContract`] - Pre-submission validation and the send transaction
//! - [`TrackerError`] and [`Result`] - Error types for error handling
//! - [`traits`], [`providers`] and [`testing`] - Seams, production implementations and fakes

mod adapter;
mod chain;
mod contracts;
mod error;
mod protocol;
mod tracker;

pub use adapter::{
    axelar_chain_name, hyperlane_domain, layerzero_endpoint_id, wormhole_chain_id,
    AdapterRegistry, AxelarAdapter, GmpStatus, HyperlaneAdapter, LayerZeroAdapter,
    LayerZeroMessageStatus, MailboxStatus, Protocol, ProtocolAdapter, ProtocolChainId,
    WormholeAdapter, AXELAR_GAS_LIMIT, AXELAR_POLL_INTERVAL, FIXED_PLACEHOLDER_FEE_WEI,
};
pub use chain::addresses;
pub use chain::{native_token_symbol, Environment};
pub use contracts::message_receiver::MessageReceiverContract;
pub use error::{Result, TrackerError};
pub use protocol::{
    project, CrossChainState, OriginEvent, OriginReceipt, ProjectedStatus, RelayStatusSnapshot,
    Stage, StatusReport, TransactionHandle, Transition, TxLifecycle, Visibility,
};
pub use providers::{AlloyProvider, ReceiptObserver, TokioClock};
pub use tracker::{CrossChainTracker, PollExit, PollingConfig, SendPlan, TrackerStatus};

pub mod providers;
pub mod spans;
pub mod testing;
pub mod traits;
