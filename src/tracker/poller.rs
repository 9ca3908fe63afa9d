//! The relay poller task.
//!
//! One poller exists per tracked send. It holds the generation it was started
//! under and every write it makes goes through a single `send_if_modified`
//! closure that first compares that generation with the cell's, so a result
//! that completes after a reset is dropped rather than applied.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::TxHash;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};

use super::TrackerStatus;
use crate::adapter::ProtocolAdapter;
use crate::protocol::{CrossChainState, RelayStatusSnapshot, Transition};
use crate::spans;
use crate::traits::Clock;

/// Why a poller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The tracker reached Success or an error state.
    Terminal(CrossChainState),
    /// The tracker was reset while this poller was running.
    Cancelled,
    /// The configured attempt budget ran out; the tracker is still pending.
    Exhausted { attempts: u32 },
}

/// Result of trying to write through the generation guard.
enum Applied {
    Stale,
    Current(CrossChainState),
}

/// Whole milliseconds in `interval`, saturating at `u64::MAX`.
fn interval_millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) struct RelayPoller {
    pub(crate) adapter: Arc<dyn ProtocolAdapter>,
    pub(crate) status: Arc<watch::Sender<TrackerStatus>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) origin_tx_hash: TxHash,
    pub(crate) generation: u64,
    pub(crate) interval: Duration,
    pub(crate) max_attempts: Option<u32>,
    pub(crate) max_consecutive_failures: u32,
}

impl RelayPoller {
    pub(crate) async fn run(self) -> PollExit {
        let span = spans::relay_polling(
            self.adapter.protocol(),
            self.origin_tx_hash,
            self.generation,
            interval_millis(self.interval),
            self.max_attempts,
        );
        let exit = self.poll_until_settled().instrument(span.clone()).await;
        span.record("exit", tracing::field::debug(&exit));
        exit
    }

    async fn poll_until_settled(&self) -> PollExit {
        let protocol = self.adapter.protocol();
        let mut attempts = 0u32;
        let mut consecutive_failures = 0u32;

        info!(
            protocol = %protocol,
            interval_ms = interval_millis(self.interval),
            event = "relay_polling_started"
        );

        loop {
            if !self.is_current() {
                debug!(attempts, event = "relay_polling_cancelled");
                return PollExit::Cancelled;
            }

            attempts += 1;

            let poll_span = spans::poll_relay_status(protocol, self.origin_tx_hash, attempts);
            let result = self
                .adapter
                .poll(self.origin_tx_hash)
                .instrument(poll_span.clone())
                .await;

            let applied = match result {
                Ok(snapshot) => {
                    consecutive_failures = 0;
                    poll_span.record("code", snapshot.code.as_str());
                    let next = self.adapter.classify(&snapshot);
                    debug!(
                        attempt = attempts,
                        code = %snapshot.code,
                        classified = %next,
                        event = "relay_status_classified"
                    );
                    self.apply(Some(snapshot), next)
                }
                Err(e) => {
                    consecutive_failures += 1;
                    poll_span.in_scope(|| spans::record_error(&e));
                    warn!(
                        attempt = attempts,
                        consecutive_failures,
                        error = %e,
                        event = "relay_status_poll_failed"
                    );

                    if consecutive_failures >= self.max_consecutive_failures {
                        consecutive_failures = 0;
                        spans::record_error_with_context(
                            "RelayTransportFailed",
                            &e.to_string(),
                            Some("consecutive transport failure limit reached"),
                        );
                        self.apply(None, CrossChainState::RelayError)
                    } else {
                        Applied::Current(self.current_state())
                    }
                }
            };

            match applied {
                Applied::Stale => {
                    debug!(attempt = attempts, event = "stale_poll_result_discarded");
                    return PollExit::Cancelled;
                }
                Applied::Current(state) if state.is_terminal() => {
                    info!(
                        state = %state,
                        attempts,
                        event = "relay_polling_settled"
                    );
                    return PollExit::Terminal(state);
                }
                Applied::Current(_) => {}
            }

            if self.max_attempts.is_some_and(|max| attempts >= max) {
                info!(attempts, event = "relay_polling_exhausted");
                return PollExit::Exhausted { attempts };
            }

            self.clock.sleep(self.interval).await;
        }
    }

    fn is_current(&self) -> bool {
        self.status.borrow().generation == self.generation
    }

    fn current_state(&self) -> CrossChainState {
        self.status.borrow().state
    }

    /// Applies a classified poll result if this poller's generation is still
    /// current. The snapshot is stored only when the state move is accepted,
    /// so state and snapshot always change together.
    fn apply(&self, snapshot: Option<RelayStatusSnapshot>, next: CrossChainState) -> Applied {
        let mut applied = Applied::Stale;

        self.status.send_if_modified(|status| {
            if status.generation != self.generation {
                return false;
            }

            let from = status.state;
            let modified = match status.state.transition(next) {
                Transition::Advanced => {
                    debug!(from = %from, to = %next, event = "state_advanced");
                    if snapshot.is_some() {
                        status.relay = snapshot;
                    }
                    true
                }
                Transition::Unchanged => match snapshot {
                    Some(snapshot) if status.relay.as_ref() != Some(&snapshot) => {
                        status.relay = Some(snapshot);
                        true
                    }
                    _ => false,
                },
                Transition::Rejected => {
                    debug!(from = %from, to = %next, event = "transition_rejected");
                    false
                }
            };

            applied = Applied::Current(status.state);
            modified
        });

        applied
    }
}
