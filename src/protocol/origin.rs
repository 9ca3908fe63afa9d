use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Lifecycle of an origin-chain transaction as reported by the chain client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxLifecycle {
    #[default]
    Idle,
    Pending,
    Mined,
    Failed,
}

/// Opaque reference to a submitted origin-chain transaction.
///
/// The hash stays `None` until the transaction has been broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    hash: Option<TxHash>,
    lifecycle: TxLifecycle,
}

impl TransactionHandle {
    pub fn new(hash: Option<TxHash>, lifecycle: TxLifecycle) -> Self {
        Self { hash, lifecycle }
    }

    /// Handle for a transaction that has just been broadcast.
    pub fn broadcast(hash: TxHash) -> Self {
        Self::new(Some(hash), TxLifecycle::Pending)
    }

    pub fn hash(&self) -> Option<TxHash> {
        self.hash
    }

    pub fn lifecycle(&self) -> TxLifecycle {
        self.lifecycle
    }
}

/// Receipt data the tracker needs from a mined origin transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginReceipt {
    pub tx_hash: Option<TxHash>,
    pub block_number: Option<u64>,
}

/// One step of the origin transaction lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OriginEvent {
    Pending { tx_hash: Option<TxHash> },
    Mined(OriginReceipt),
    Failed { reason: String },
}

impl OriginEvent {
    /// Mined and Failed end the origin lifecycle.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}
