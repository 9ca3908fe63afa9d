//! Test utilities and fake implementations for the tracker's traits
//!
//! This module provides fakes for every collaborator the tracker talks to, so
//! adapter classification, poller termination, resets racing in-flight polls
//! and origin receipt handling can all be tested without a chain or a relay
//! API.
//!
//! The fakes are cheap to clone and share state between clones: keep one
//! handle in the test for inspection and give another to the code under test.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use alloy_rpc_types::{Log, TransactionReceipt};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use crate::error::{Result, TrackerError};
use crate::protocol::RelayStatusSnapshot;
use crate::traits::{BlockchainProvider, Clock, GasFeeEstimator, RelayStatusSource};

// ============================================================================
// Fake Relay Status Source
// ============================================================================

/// One scripted answer from [`FakeRelayStatusSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeResponse {
    Status(RelayStatusSnapshot),
    /// Simulates a network failure; counts towards the transport threshold.
    TransportFailure,
}

impl From<RelayStatusSnapshot> for FakeResponse {
    fn from(snapshot: RelayStatusSnapshot) -> Self {
        Self::Status(snapshot)
    }
}

/// A fee estimate request seen by [`FakeRelayStatusSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeRequest {
    pub origin: NamedChain,
    pub destination: NamedChain,
    pub token_symbol: String,
    pub gas_units: u64,
}

#[derive(Debug, Default)]
struct RelayScript {
    responses: Vec<FakeResponse>,
    /// Query index at which `responses` was scripted.
    scripted_at: usize,
    queried: Vec<TxHash>,
    fee: Option<U256>,
    fee_failure: bool,
    fee_requests: Vec<FeeRequest>,
    hold_at: Option<usize>,
}

#[derive(Debug, Default)]
struct CallGate {
    held: Notify,
    released: Notify,
}

/// A relay status source that replays a scripted sequence of answers.
///
/// Each query returns the next scripted response; once the script is used up
/// the last response repeats. An empty script fails every query. The same
/// fake doubles as a fee estimator so it can back an Axelar adapter.
///
/// This allows testing scenarios like:
/// - Status progressions (in flight, approved, executed)
/// - Regressing answers that the state machine must reject
/// - Transport failures below and at the failure threshold
/// - A slow response still in flight when the tracker is reset
#[derive(Clone, Debug, Default)]
pub struct FakeRelayStatusSource {
    script: Arc<Mutex<RelayScript>>,
    gate: Arc<CallGate>,
}

impl FakeRelayStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one snapshot per code, in order.
    pub fn with_codes<'a>(self, codes: impl IntoIterator<Item = &'a str>) -> Self {
        self.script_codes(codes);
        self
    }

    /// Script an explicit sequence of responses.
    pub fn with_responses(self, responses: impl IntoIterator<Item = FakeResponse>) -> Self {
        self.script_responses(responses);
        self
    }

    /// Replace the script on a source already handed to a tracker. The next
    /// query answers with the first of `codes`.
    pub fn script_codes<'a>(&self, codes: impl IntoIterator<Item = &'a str>) {
        self.script_responses(
            codes
                .into_iter()
                .map(|code| FakeResponse::Status(RelayStatusSnapshot::new(code))),
        );
    }

    /// Replace the script with an explicit sequence of responses.
    pub fn script_responses(&self, responses: impl IntoIterator<Item = FakeResponse>) {
        let mut script = self.script.lock().unwrap();
        script.responses = responses.into_iter().collect();
        script.scripted_at = script.queried.len();
    }

    /// Answer every fee estimate with `fee`.
    pub fn with_fee(self, fee: U256) -> Self {
        self.script.lock().unwrap().fee = Some(fee);
        self
    }

    /// Fail every fee estimate.
    pub fn with_fee_failure(self) -> Self {
        self.script.lock().unwrap().fee_failure = true;
        self
    }

    /// Hold the `index`-th status query (zero based) in flight until
    /// [`release`](Self::release) is called.
    pub fn hold_call(&self, index: usize) {
        self.script.lock().unwrap().hold_at = Some(index);
    }

    /// Wait until the held query has started.
    pub async fn wait_until_held(&self) {
        self.gate.held.notified().await;
    }

    /// Let the held query return.
    pub fn release(&self) {
        self.gate.released.notify_one();
    }

    /// Number of status queries made so far.
    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().queried.len()
    }

    /// Hashes passed to each status query, in order.
    pub fn queried_hashes(&self) -> Vec<TxHash> {
        self.script.lock().unwrap().queried.clone()
    }

    /// Fee estimate requests made so far.
    pub fn fee_requests(&self) -> Vec<FeeRequest> {
        self.script.lock().unwrap().fee_requests.clone()
    }
}

#[async_trait]
impl RelayStatusSource for FakeRelayStatusSource {
    async fn query_status(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        let (response, hold) = {
            let mut script = self.script.lock().unwrap();
            let index = script.queried.len();
            script.queried.push(origin_tx_hash);

            let response = script
                .responses
                .get(index - script.scripted_at)
                .or_else(|| script.responses.last())
                .cloned();
            (response, script.hold_at == Some(index))
        };

        if hold {
            self.gate.held.notify_one();
            self.gate.released.notified().await;
        }

        match response {
            Some(FakeResponse::Status(snapshot)) => Ok(snapshot),
            Some(FakeResponse::TransportFailure) => Err(TrackerError::Provider(
                "Simulated relay API outage".to_string(),
            )),
            None => Err(TrackerError::Provider(
                "No relay status scripted".to_string(),
            )),
        }
    }
}

#[async_trait]
impl GasFeeEstimator for FakeRelayStatusSource {
    async fn estimate(
        &self,
        origin: NamedChain,
        destination: NamedChain,
        token_symbol: &str,
        gas_units: u64,
    ) -> Result<U256> {
        let mut script = self.script.lock().unwrap();
        script.fee_requests.push(FeeRequest {
            origin,
            destination,
            token_symbol: token_symbol.to_string(),
            gas_units,
        });

        if script.fee_failure {
            return Err(TrackerError::FeeQuote {
                reason: "Simulated fee service failure".to_string(),
            });
        }
        Ok(script.fee.unwrap_or(U256::ZERO))
    }
}

// ============================================================================
// Fake Blockchain Provider
// ============================================================================

/// A fake blockchain provider that returns pre-configured transaction receipts.
///
/// This allows testing scenarios like:
/// - Transaction not yet mined for a few polls
/// - Reverted transactions
/// - Persistent RPC failures
#[derive(Clone, Debug, Default)]
pub struct FakeBlockchainProvider {
    receipts: Arc<Mutex<HashMap<TxHash, Vec<Option<TransactionReceipt>>>>>,
    failures: Arc<Mutex<Vec<TxHash>>>,
    calls: Arc<Mutex<HashMap<TxHash, usize>>>,
}

impl FakeBlockchainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction receipt that will be returned for the given hash
    pub fn add_receipt(&self, tx_hash: TxHash, receipt: TransactionReceipt) {
        self.add_receipt_sequence(tx_hash, vec![Some(receipt)]);
    }

    /// Configure successive answers for a hash; the last one repeats.
    pub fn add_receipt_sequence(&self, tx_hash: TxHash, receipts: Vec<Option<TransactionReceipt>>) {
        self.receipts.lock().unwrap().insert(tx_hash, receipts);
    }

    /// Configure a transaction hash to return None (not found)
    pub fn add_not_found(&self, tx_hash: TxHash) {
        self.add_receipt_sequence(tx_hash, vec![None]);
    }

    /// Configure a transaction hash to return an error
    pub fn add_failure(&self, tx_hash: TxHash) {
        self.failures.lock().unwrap().push(tx_hash);
    }

    /// Number of receipt lookups made for a hash.
    pub fn call_count(&self, tx_hash: TxHash) -> usize {
        self.calls.lock().unwrap().get(&tx_hash).copied().unwrap_or(0)
    }

    /// Number of receipt lookups made for any hash.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl BlockchainProvider for FakeBlockchainProvider {
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(tx_hash).or_insert(0);
            *count += 1;
            *count - 1
        };

        if self.failures.lock().unwrap().contains(&tx_hash) {
            return Err(TrackerError::Provider("Simulated RPC error".to_string()));
        }

        let receipts = self.receipts.lock().unwrap();
        Ok(receipts
            .get(&tx_hash)
            .and_then(|sequence| sequence.get(index).or_else(|| sequence.last()))
            .cloned()
            .flatten())
    }
}

// ============================================================================
// Receipt builders
// ============================================================================

/// Builds an EIP-1559 receipt for `tx_hash` mined in block 1.
pub fn fake_receipt(tx_hash: TxHash, success: bool, logs: Vec<Log>) -> TransactionReceipt {
    let receipt = json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": logs,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": Address::ZERO,
        "to": Address::ZERO,
        "contractAddress": null,
    });
    serde_json::from_value(receipt).expect("fake receipt must deserialize")
}

/// Builds a log emitted by `address` with the given topics and no data.
pub fn fake_log(address: Address, topics: Vec<B256>) -> Log {
    Log {
        inner: alloy_primitives::Log::new_unchecked(address, topics, Bytes::new()),
        ..Default::default()
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time in tests.
///
/// Sleeping records the duration, advances the clock and yields to the
/// scheduler, so polling loops make progress without waiting while other
/// tasks still get to run between polls.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
        tokio::task::yield_now().await;
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}
