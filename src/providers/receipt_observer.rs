use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::TxHash;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::protocol::{OriginEvent, OriginReceipt, TransactionHandle, TxLifecycle};
use crate::providers::TokioClock;
use crate::traits::{BlockchainProvider, Clock, OriginObserver};

const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_RPC_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Broadcast,
    AwaitingReceipt,
    Finished,
}

/// Origin observer that watches a submitted transaction by polling its
/// receipt.
///
/// Emits `Pending` first, then `Mined` or `Failed` once a receipt appears
/// (by receipt status), then ends. A handle without a hash, a handle already
/// marked failed, and consecutive RPC failures beyond the limit are all
/// reported as `Failed` without further polling.
pub struct ReceiptObserver<B> {
    provider: B,
    handle: TransactionHandle,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    max_rpc_failures: u32,
    phase: Phase,
}

impl<B: BlockchainProvider> ReceiptObserver<B> {
    pub fn new(provider: B, handle: TransactionHandle) -> Self {
        Self {
            provider,
            handle,
            clock: Arc::new(TokioClock),
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            max_rpc_failures: DEFAULT_MAX_RPC_FAILURES,
            phase: Phase::Broadcast,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_rpc_failures(mut self, failures: u32) -> Self {
        self.max_rpc_failures = failures.max(1);
        self
    }

    async fn wait_for_receipt(&self) -> OriginEvent {
        if self.handle.lifecycle() == TxLifecycle::Failed {
            return OriginEvent::Failed {
                reason: "transaction rejected before mining".to_string(),
            };
        }
        let Some(tx_hash) = self.handle.hash() else {
            warn!(event = "origin_hash_missing");
            return OriginEvent::Failed {
                reason: "transaction handle has no hash".to_string(),
            };
        };

        let mut failures = 0u32;

        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) if receipt.inner.status() => {
                    debug!(
                        tx_hash = %tx_hash,
                        block_number = ?receipt.block_number,
                        event = "origin_transaction_mined"
                    );
                    return OriginEvent::Mined(OriginReceipt {
                        tx_hash: Some(receipt.transaction_hash),
                        block_number: receipt.block_number,
                    });
                }
                Ok(Some(_)) => {
                    debug!(tx_hash = %tx_hash, event = "origin_transaction_reverted");
                    return OriginEvent::Failed {
                        reason: "transaction reverted".to_string(),
                    };
                }
                Ok(None) => failures = 0,
                Err(e) => {
                    failures += 1;
                    warn!(
                        error = %e,
                        consecutive_failures = failures,
                        event = "origin_receipt_fetch_failed"
                    );
                    if failures >= self.max_rpc_failures {
                        return OriginEvent::Failed {
                            reason: format!("receipt unavailable: {e}"),
                        };
                    }
                }
            }

            self.clock.sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl<B: BlockchainProvider> OriginObserver for ReceiptObserver<B> {
    async fn next_event(&mut self) -> Option<OriginEvent> {
        match self.phase {
            Phase::Broadcast => {
                self.phase = Phase::AwaitingReceipt;
                Some(OriginEvent::Pending {
                    tx_hash: self.handle.hash(),
                })
            }
            Phase::AwaitingReceipt => {
                let event = self.wait_for_receipt().await;
                self.phase = Phase::Finished;
                Some(event)
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_receipt, FakeBlockchainProvider, FakeClock};

    fn observer(
        provider: FakeBlockchainProvider,
        clock: &FakeClock,
        tx_hash: TxHash,
    ) -> ReceiptObserver<FakeBlockchainProvider> {
        ReceiptObserver::new(provider, TransactionHandle::broadcast(tx_hash))
            .with_clock(Arc::new(clock.clone()))
            .with_poll_interval(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_pending_then_mined() {
        let tx_hash = TxHash::repeat_byte(3);
        let provider = FakeBlockchainProvider::new();
        provider.add_receipt_sequence(
            tx_hash,
            vec![None, None, Some(fake_receipt(tx_hash, true, vec![]))],
        );
        let clock = FakeClock::new();
        let mut observer = observer(provider, &clock, tx_hash);

        assert_eq!(
            observer.next_event().await,
            Some(OriginEvent::Pending {
                tx_hash: Some(tx_hash)
            })
        );
        match observer.next_event().await {
            Some(OriginEvent::Mined(receipt)) => assert_eq!(receipt.tx_hash, Some(tx_hash)),
            other => panic!("expected Mined, got {other:?}"),
        }
        assert_eq!(observer.next_event().await, None);
        assert_eq!(clock.sleep_count(), 2);
    }

    #[tokio::test]
    async fn test_reverted_receipt_fails() {
        let tx_hash = TxHash::repeat_byte(4);
        let provider = FakeBlockchainProvider::new();
        provider.add_receipt(tx_hash, fake_receipt(tx_hash, false, vec![]));
        let clock = FakeClock::new();
        let mut observer = observer(provider, &clock, tx_hash);

        observer.next_event().await;

        assert!(matches!(
            observer.next_event().await,
            Some(OriginEvent::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn test_rpc_failures_give_up() {
        let tx_hash = TxHash::repeat_byte(5);
        let provider = FakeBlockchainProvider::new();
        provider.add_failure(tx_hash);
        let clock = FakeClock::new();
        let mut observer = observer(provider.clone(), &clock, tx_hash).with_max_rpc_failures(2);

        observer.next_event().await;

        assert!(matches!(
            observer.next_event().await,
            Some(OriginEvent::Failed { .. })
        ));
        assert_eq!(provider.call_count(tx_hash), 2);
        assert_eq!(clock.sleep_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_hash_fails_without_polling() {
        let provider = FakeBlockchainProvider::new();
        let mut observer = ReceiptObserver::new(
            provider.clone(),
            TransactionHandle::new(None, TxLifecycle::Pending),
        );

        assert_eq!(
            observer.next_event().await,
            Some(OriginEvent::Pending { tx_hash: None })
        );
        assert!(matches!(
            observer.next_event().await,
            Some(OriginEvent::Failed { .. })
        ));
        assert_eq!(provider.total_calls(), 0);
    }
}
