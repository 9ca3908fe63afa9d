use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// The last raw status payload obtained from a relay status source.
///
/// The shape is protocol-neutral: `code` carries the protocol's own status
/// vocabulary verbatim (for example Axelar's `destination_executed` or
/// LayerZero's `INFLIGHT`) and only the adapter that produced it knows how to
/// classify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStatusSnapshot {
    pub code: String,
    #[serde(default)]
    pub destination_tx_hash: Option<TxHash>,
    #[serde(default)]
    pub destination_success: Option<bool>,
}

impl RelayStatusSnapshot {
    /// Status code used by every source when it cannot resolve the message.
    pub const CANNOT_FETCH: &'static str = "cannot_fetch_status";

    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            destination_tx_hash: None,
            destination_success: None,
        }
    }

    /// Snapshot reporting that the source could not resolve the status.
    pub fn cannot_fetch() -> Self {
        Self::new(Self::CANNOT_FETCH)
    }

    pub fn with_destination_tx_hash(mut self, hash: Option<TxHash>) -> Self {
        self.destination_tx_hash = hash;
        self
    }

    pub fn with_destination_success(mut self, success: Option<bool>) -> Self {
        self.destination_success = success;
        self
    }

    pub fn is_cannot_fetch(&self) -> bool {
        self.code == Self::CANNOT_FETCH
    }
}
