//! Core trait abstractions for cross-chain status tracking.
//!
//! Every collaborator the tracker talks to sits behind one of these traits:
//! the origin chain client, the per-protocol relay status source, the gas fee
//! quoting service and the clock that paces polling. Production
//! implementations live in [`crate::providers`]; fakes for tests live in
//! [`crate::testing`].
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use gmp_tracker::{RelayStatusSnapshot, Result};
//! use gmp_tracker::traits::RelayStatusSource;
//!
//! struct AlwaysInFlight;
//!
//! #[async_trait::async_trait]
//! impl RelayStatusSource for AlwaysInFlight {
//!     async fn query_status(&self, _tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
//!         Ok(RelayStatusSnapshot::new("INFLIGHT"))
//!     }
//! }
//! ```

use alloy_chains::NamedChain;
use alloy_primitives::{TxHash, U256};
use alloy_rpc_types::TransactionReceipt;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::protocol::{OriginEvent, RelayStatusSnapshot};

/// Trait for origin-chain RPC operations.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Transaction receipt not found (still pending)
/// - Reverted transactions
/// - RPC failures while waiting for a receipt
#[async_trait]
pub trait BlockchainProvider: Send + Sync {
    /// Fetches the transaction receipt for a given transaction hash.
    ///
    /// Returns `None` if the transaction is not found or not yet mined.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails or the response cannot be parsed.
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>>;
}

/// Trait for querying a relay network about one origin transaction.
///
/// Called once per poll iteration. Sources must map an explicit "cannot
/// resolve" answer onto [`RelayStatusSnapshot::cannot_fetch`] rather than an
/// error; errors are reserved for transport failures, which the poller counts.
///
/// # Test Scenarios
///
/// - State progressions (in flight → approved → executed)
/// - Explicit "cannot fetch" answers
/// - Transport failures and timeouts
/// - Slow responses that are still in flight during a reset
#[async_trait]
pub trait RelayStatusSource: Send + Sync {
    async fn query_status(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot>;
}

/// Trait for a cross-chain gas fee quoting service.
///
/// Consumed once before submission; failures block the send.
#[async_trait]
pub trait GasFeeEstimator: Send + Sync {
    /// Estimates the fee, in the origin chain's native token base units, that
    /// must accompany a message executing `gas_units` on the destination.
    async fn estimate(
        &self,
        origin: NamedChain,
        destination: NamedChain,
        token_symbol: &str,
        gas_units: u64,
    ) -> Result<U256>;
}

/// Trait for time-based operations.
///
/// This trait abstracts sleep and time queries, enabling fast-forward testing
/// where tests can instantly advance through polling loops without actually
/// waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Asynchronously sleeps for the given duration.
    async fn sleep(&self, duration: Duration);

    /// Returns the current instant in time.
    fn now(&self) -> Instant;
}

/// A stream of origin transaction lifecycle events.
///
/// The tracker subscribes once per send and consumes events until a terminal
/// one (`Mined` or `Failed`) arrives or the stream ends.
#[async_trait]
pub trait OriginObserver: Send {
    /// Waits for the next lifecycle event. `None` means the stream has ended.
    async fn next_event(&mut self) -> Option<OriginEvent>;
}

#[async_trait]
impl OriginObserver for mpsc::Receiver<OriginEvent> {
    async fn next_event(&mut self) -> Option<OriginEvent> {
        self.recv().await
    }
}

#[async_trait]
impl OriginObserver for mpsc::UnboundedReceiver<OriginEvent> {
    async fn next_event(&mut self) -> Option<OriginEvent> {
        self.recv().await
    }
}
