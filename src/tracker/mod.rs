//! The cross-chain message tracker.
//!
//! A [`CrossChainTracker`] follows one send at a time from origin broadcast to
//! a terminal outcome. Origin lifecycle events come in through
//! [`CrossChainTracker::handle_origin_event`] or [`CrossChainTracker::observe`];
//! once the origin transaction is mined a relay poller task is spawned that
//! queries the adapter until the state is terminal.
//!
//! State lives in a `tokio::sync::watch` cell together with the last relay
//! snapshot, the origin hash and a generation counter. Readers get consistent
//! copies without blocking the writer, and [`CrossChainTracker::subscribe`]
//! exposes every change.

mod config;
mod poller;
mod send;

pub use config::PollingConfig;
pub use poller::PollExit;
pub use send::SendPlan;

use std::sync::{Arc, Mutex, MutexGuard};

use alloy_chains::NamedChain;
use alloy_primitives::{TxHash, U256};
use bon::bon;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

use crate::adapter::{ensure_supported, ProtocolAdapter};
use crate::error::{Result, TrackerError};
use crate::protocol::{
    project, CrossChainState, OriginEvent, ProjectedStatus, RelayStatusSnapshot, StatusReport,
    Transition,
};
use crate::providers::TokioClock;
use crate::spans;
use crate::traits::{Clock, OriginObserver};
use poller::RelayPoller;

/// A consistent view of a tracker at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerStatus {
    pub state: CrossChainState,
    /// Last relay status payload, `None` until the first accepted poll.
    pub relay: Option<RelayStatusSnapshot>,
    pub origin_tx_hash: Option<TxHash>,
    /// Incremented by every effective reset.
    pub generation: u64,
}

impl TrackerStatus {
    fn is_pristine(&self) -> bool {
        self.state == CrossChainState::None && self.relay.is_none() && self.origin_tx_hash.is_none()
    }
}

/// Tracks one cross-chain message through a protocol adapter.
///
/// # Example
///
/// ```rust,no_run
/// use gmp_tracker::{AdapterRegistry, CrossChainTracker, OriginEvent, OriginReceipt, Protocol};
/// use alloy_chains::NamedChain;
/// use alloy_primitives::TxHash;
///
/// # async fn example() -> Result<(), gmp_tracker::TrackerError> {
/// let registry = AdapterRegistry::testnet();
/// let tracker = CrossChainTracker::builder()
///     .adapter(registry.get(Protocol::Axelar)?)
///     .origin(NamedChain::Moonbase)
///     .destination(NamedChain::AvalancheFuji)
///     .build()?;
///
/// let tx_hash = TxHash::ZERO;
/// tracker.handle_origin_event(OriginEvent::Pending { tx_hash: Some(tx_hash) })?;
/// tracker.handle_origin_event(OriginEvent::Mined(OriginReceipt {
///     tx_hash: Some(tx_hash),
///     block_number: None,
/// }))?;
///
/// let exit = tracker.join_poller().await?;
/// println!("{:?} {}", exit, tracker.projected_status());
/// # Ok(())
/// # }
/// ```
pub struct CrossChainTracker {
    adapter: Arc<dyn ProtocolAdapter>,
    origin: NamedChain,
    destination: NamedChain,
    polling: PollingConfig,
    clock: Arc<dyn Clock>,
    status: Arc<watch::Sender<TrackerStatus>>,
    poller: Mutex<Option<JoinHandle<PollExit>>>,
}

#[bon]
impl CrossChainTracker {
    /// Creates a tracker for messages from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if either chain is unsupported by the adapter, the
    /// chains are equal, or the polling configuration is invalid.
    #[builder]
    pub fn new(
        adapter: Arc<dyn ProtocolAdapter>,
        origin: NamedChain,
        destination: NamedChain,
        #[builder(default)] polling: PollingConfig,
        clock: Option<Arc<dyn Clock>>,
    ) -> Result<Self> {
        if origin == destination {
            return Err(TrackerError::SameChain(origin));
        }
        ensure_supported(adapter.as_ref(), origin)?;
        ensure_supported(adapter.as_ref(), destination)?;
        polling.validate()?;

        let (status, _) = watch::channel(TrackerStatus::default());

        Ok(Self {
            adapter,
            origin,
            destination,
            polling,
            clock: clock.unwrap_or_else(|| Arc::new(TokioClock)),
            status: Arc::new(status),
            poller: Mutex::new(None),
        })
    }
}

impl CrossChainTracker {
    pub fn adapter(&self) -> &Arc<dyn ProtocolAdapter> {
        &self.adapter
    }

    pub fn origin(&self) -> NamedChain {
        self.origin
    }

    pub fn destination(&self) -> NamedChain {
        self.destination
    }

    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    /// A consistent copy of state, snapshot, origin hash and generation.
    pub fn status(&self) -> TrackerStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> CrossChainState {
        self.status.borrow().state
    }

    /// Receiver notified on every change of [`TrackerStatus`].
    pub fn subscribe(&self) -> watch::Receiver<TrackerStatus> {
        self.status.subscribe()
    }

    pub fn projected_status(&self) -> ProjectedStatus {
        let status = self.status.borrow();
        project(status.state, status.relay.as_ref(), self.adapter.visibility())
    }

    pub fn status_report(&self) -> StatusReport {
        let status = self.status.borrow();
        StatusReport::new(status.state, status.relay.as_ref(), self.adapter.visibility())
    }

    /// Applies one origin lifecycle event to the current generation.
    ///
    /// A `Mined` event with a hash moves the tracker to `RelayPending` and
    /// spawns the relay poller, so this must be called from within a Tokio
    /// runtime. Events that the transition table does not allow are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Poller`] if the event would start polling but
    /// no Tokio runtime is available. The state is left unchanged in that case.
    pub fn handle_origin_event(&self, event: OriginEvent) -> Result<CrossChainState> {
        let generation = self.status.borrow().generation;
        self.apply_origin_event(generation, event)
    }

    /// Drives an origin observer until it reports a terminal event, its
    /// stream ends, or the tracker is reset.
    ///
    /// Returns the state after the last applied event. Polling continues in
    /// the background; use [`join_poller`](Self::join_poller) to wait for it.
    pub async fn observe<O: OriginObserver>(&self, mut observer: O) -> Result<CrossChainState> {
        let generation = self.status.borrow().generation;
        let span = spans::observe_origin(self.adapter.protocol(), self.origin, self.destination);

        async {
            while let Some(event) = observer.next_event().await {
                let terminal = event.is_terminal();
                self.apply_origin_event(generation, event)?;

                if self.status.borrow().generation != generation {
                    debug!(event = "origin_observation_superseded");
                    break;
                }
                if terminal {
                    break;
                }
            }
            Ok(self.state())
        }
        .instrument(span)
        .await
    }

    /// Returns the tracker to `None` and invalidates the running poller.
    ///
    /// An outstanding poll is allowed to finish, but its result is discarded.
    /// The detached poller handle is returned for callers that want to wait
    /// for it to wind down. Resetting a pristine tracker does nothing.
    pub fn reset(&self) -> Option<JoinHandle<PollExit>> {
        let mut poller = self.lock_poller();
        let detached = poller.take();
        let had_poller = detached.is_some();

        let mut new_generation = None;
        self.status.send_if_modified(|status| {
            if status.is_pristine() && !had_poller {
                return false;
            }
            status.generation += 1;
            status.state = CrossChainState::None;
            status.relay = None;
            status.origin_tx_hash = None;
            new_generation = Some(status.generation);
            true
        });

        match new_generation {
            Some(generation) => info!(
                protocol = %self.adapter.protocol(),
                generation,
                event = "tracker_reset"
            ),
            None => debug!(event = "tracker_reset_noop"),
        }

        detached
    }

    /// Waits for the current poller, if any, to stop.
    ///
    /// Returns `Ok(None)` if no poller has been started since the last reset.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Poller`] if the poller task panicked or was
    /// aborted.
    pub async fn join_poller(&self) -> Result<Option<PollExit>> {
        let handle = self.lock_poller().take();
        match handle {
            Some(handle) => handle
                .await
                .map(Some)
                .map_err(|e| TrackerError::Poller(e.to_string())),
            None => Ok(None),
        }
    }

    /// Quotes the fee to attach to a send on this route.
    pub async fn quote_fee(&self) -> Result<U256> {
        let span = spans::quote_fee(self.adapter.protocol(), self.origin, self.destination);
        async {
            match self.adapter.gas_fee_quote(self.origin, self.destination).await {
                Ok(fee) => {
                    tracing::Span::current().record("fee_wei", tracing::field::display(fee));
                    Ok(fee)
                }
                Err(e) => {
                    spans::record_error(&e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Builds a validated send plan for `message` on this route.
    pub async fn plan_send(&self, message: &str) -> Result<SendPlan> {
        SendPlan::prepare(self.adapter.as_ref(), self.origin, self.destination, message).await
    }

    fn lock_poller(&self) -> MutexGuard<'_, Option<JoinHandle<PollExit>>> {
        self.poller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply_origin_event(&self, generation: u64, event: OriginEvent) -> Result<CrossChainState> {
        let runtime = tokio::runtime::Handle::try_current().ok();

        let mut poller = self.lock_poller();
        let mut stale = false;
        let mut missing_runtime = false;
        let mut start_polling: Option<TxHash> = None;

        self.status.send_if_modified(|status| {
            if status.generation != generation {
                stale = true;
                return false;
            }

            match &event {
                OriginEvent::Pending { tx_hash } => {
                    let mut modified = step(status, CrossChainState::OriginPending);
                    if status.state == CrossChainState::OriginPending
                        && status.origin_tx_hash.is_none()
                        && tx_hash.is_some()
                    {
                        status.origin_tx_hash = *tx_hash;
                        modified = true;
                    }
                    modified
                }
                OriginEvent::Mined(receipt) => {
                    let tx_hash = receipt.tx_hash.or(status.origin_tx_hash);
                    let would_poll = status.state <= CrossChainState::OriginPending;
                    if would_poll && tx_hash.is_some() && runtime.is_none() {
                        missing_runtime = true;
                        return false;
                    }

                    let mut modified = false;
                    if status.state == CrossChainState::None {
                        modified |= step(status, CrossChainState::OriginPending);
                    }
                    match tx_hash {
                        Some(tx_hash) if status.state == CrossChainState::OriginPending => {
                            status.origin_tx_hash = Some(tx_hash);
                            modified |= step(status, CrossChainState::RelayPending);
                            start_polling = Some(tx_hash);
                        }
                        Some(_) => {
                            modified |= step(status, CrossChainState::RelayPending);
                        }
                        None => {
                            warn!(event = "origin_hash_missing_at_poll_start");
                            modified |= step(status, CrossChainState::OriginError);
                        }
                    }
                    modified
                }
                OriginEvent::Failed { reason } => {
                    warn!(reason = %reason, event = "origin_transaction_failed");
                    let mut modified = false;
                    if status.state == CrossChainState::None {
                        modified |= step(status, CrossChainState::OriginPending);
                    }
                    modified | step(status, CrossChainState::OriginError)
                }
            }
        });

        if missing_runtime {
            return Err(TrackerError::Poller(
                "relay polling needs a Tokio runtime".to_string(),
            ));
        }

        if stale {
            debug!(event = "stale_origin_event_discarded");
            return Ok(self.state());
        }

        if let (Some(tx_hash), Some(runtime)) = (start_polling, runtime) {
            let relay_poller = RelayPoller {
                adapter: Arc::clone(&self.adapter),
                status: Arc::clone(&self.status),
                clock: Arc::clone(&self.clock),
                origin_tx_hash: tx_hash,
                generation,
                interval: self.polling.interval_or(self.adapter.poll_interval()),
                max_attempts: self.polling.max_attempts,
                max_consecutive_failures: self.polling.max_consecutive_failures,
            };
            *poller = Some(runtime.spawn(relay_poller.run().in_current_span()));
        }

        Ok(self.state())
    }
}

impl std::fmt::Debug for CrossChainTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossChainTracker")
            .field("protocol", &self.adapter.protocol())
            .field("origin", &self.origin)
            .field("destination", &self.destination)
            .field("polling", &self.polling)
            .field("status", &*self.status.borrow())
            .finish()
    }
}

/// Moves `status.state` to `next`, returning whether it changed.
fn step(status: &mut TrackerStatus, next: CrossChainState) -> bool {
    let from = status.state;
    match status.state.transition(next) {
        Transition::Advanced => {
            debug!(from = %from, to = %next, event = "state_advanced");
            true
        }
        Transition::Unchanged => false,
        Transition::Rejected => {
            debug!(from = %from, to = %next, event = "transition_rejected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AxelarAdapter, LayerZeroAdapter, WormholeAdapter};
    use crate::protocol::OriginReceipt;
    use crate::testing::{FakeClock, FakeRelayStatusSource};

    fn tracker_with(source: &FakeRelayStatusSource) -> CrossChainTracker {
        CrossChainTracker::builder()
            .adapter(Arc::new(AxelarAdapter::new(source.clone())))
            .origin(NamedChain::Moonbase)
            .destination(NamedChain::AvalancheFuji)
            .clock(Arc::new(FakeClock::new()))
            .build()
            .unwrap()
    }

    fn mined(tx_hash: Option<TxHash>) -> OriginEvent {
        OriginEvent::Mined(OriginReceipt {
            tx_hash,
            block_number: Some(1),
        })
    }

    #[test]
    fn test_rejects_same_chain() {
        let err = CrossChainTracker::builder()
            .adapter(Arc::new(WormholeAdapter::new()))
            .origin(NamedChain::Moonbase)
            .destination(NamedChain::Moonbase)
            .build()
            .unwrap_err();
        assert!(matches!(err, TrackerError::SameChain(NamedChain::Moonbase)));
    }

    #[test]
    fn test_rejects_unsupported_chain() {
        let err = CrossChainTracker::builder()
            .adapter(Arc::new(LayerZeroAdapter::new(FakeRelayStatusSource::new())))
            .origin(NamedChain::Moonbase)
            .destination(NamedChain::BinanceSmartChainTestnet)
            .build()
            .unwrap_err();
        assert!(matches!(err, TrackerError::UnsupportedChain { .. }));
    }

    #[test]
    fn test_rejects_invalid_polling() {
        let err = CrossChainTracker::builder()
            .adapter(Arc::new(WormholeAdapter::new()))
            .origin(NamedChain::Moonbase)
            .destination(NamedChain::FantomTestnet)
            .polling(PollingConfig::default().with_max_attempts(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfig(_)));
    }

    #[test]
    fn test_pending_records_hash() {
        let tracker = tracker_with(&FakeRelayStatusSource::new());
        let tx_hash = TxHash::repeat_byte(1);

        let state = tracker
            .handle_origin_event(OriginEvent::Pending {
                tx_hash: Some(tx_hash),
            })
            .unwrap();

        assert_eq!(state, CrossChainState::OriginPending);
        assert_eq!(tracker.status().origin_tx_hash, Some(tx_hash));
    }

    #[test]
    fn test_failed_before_pending_collapses_to_origin_error() {
        let tracker = tracker_with(&FakeRelayStatusSource::new());

        let state = tracker
            .handle_origin_event(OriginEvent::Failed {
                reason: "user rejected".to_string(),
            })
            .unwrap();

        assert_eq!(state, CrossChainState::OriginError);
    }

    #[test]
    fn test_mined_without_hash_is_origin_error_outside_runtime() {
        let tracker = tracker_with(&FakeRelayStatusSource::new());
        tracker
            .handle_origin_event(OriginEvent::Pending { tx_hash: None })
            .unwrap();

        let state = tracker.handle_origin_event(mined(None)).unwrap();

        assert_eq!(state, CrossChainState::OriginError);
    }

    #[test]
    fn test_mined_outside_runtime_leaves_state_untouched() {
        let tracker = tracker_with(&FakeRelayStatusSource::new());
        tracker
            .handle_origin_event(OriginEvent::Pending { tx_hash: None })
            .unwrap();

        let result = tracker.handle_origin_event(mined(Some(TxHash::repeat_byte(1))));

        assert!(matches!(result, Err(TrackerError::Poller(_))));
        assert_eq!(tracker.state(), CrossChainState::OriginPending);
    }

    #[tokio::test]
    async fn test_mined_without_hash_in_runtime() {
        let source = FakeRelayStatusSource::new();
        let tracker = tracker_with(&source);
        tracker
            .handle_origin_event(OriginEvent::Pending { tx_hash: None })
            .unwrap();

        let state = tracker.handle_origin_event(mined(None)).unwrap();

        assert_eq!(state, CrossChainState::OriginError);
        assert_eq!(tracker.join_poller().await.unwrap(), None);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mined_uses_hash_from_pending() {
        let source = FakeRelayStatusSource::new().with_codes(["destination_executed"]);
        let tracker = tracker_with(&source);
        let tx_hash = TxHash::repeat_byte(2);
        tracker
            .handle_origin_event(OriginEvent::Pending {
                tx_hash: Some(tx_hash),
            })
            .unwrap();

        tracker.handle_origin_event(mined(None)).unwrap();

        assert_eq!(
            tracker.join_poller().await.unwrap(),
            Some(PollExit::Terminal(CrossChainState::Success))
        );
        assert_eq!(source.queried_hashes(), vec![tx_hash]);
    }

    #[tokio::test]
    async fn test_duplicate_mined_does_not_spawn_second_poller() {
        let source = FakeRelayStatusSource::new().with_codes(["destination_executed"]);
        let tracker = tracker_with(&source);
        let tx_hash = TxHash::repeat_byte(3);

        tracker.handle_origin_event(mined(Some(tx_hash))).unwrap();
        tracker.join_poller().await.unwrap();
        tracker.handle_origin_event(mined(Some(tx_hash))).unwrap();

        assert_eq!(tracker.join_poller().await.unwrap(), None);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_quote_fee_goes_through_adapter() {
        let source = FakeRelayStatusSource::new().with_fee(U256::from(5u64));
        let tracker = tracker_with(&source);

        assert_eq!(tracker.quote_fee().await.unwrap(), U256::from(5u64));
    }

    #[test]
    fn test_reset_pristine_is_noop() {
        let tracker = tracker_with(&FakeRelayStatusSource::new());
        let rx = tracker.subscribe();

        assert!(tracker.reset().is_none());

        assert!(!rx.has_changed().unwrap());
        assert_eq!(tracker.status().generation, 0);
    }
}
