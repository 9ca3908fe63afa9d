//! LayerZero Scan API client.

use alloy_primitives::TxHash;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, trace};
use url::Url;

use crate::adapter::LayerZeroMessageStatus;
use crate::chain::Environment;
use crate::error::Result;
use crate::protocol::RelayStatusSnapshot;
use crate::traits::RelayStatusSource;

pub const LAYERZERO_SCAN_API: &str = "https://api-mainnet.layerzero-scan.com";
pub const LAYERZERO_SCAN_API_TESTNET: &str = "https://api-testnet.layerzero-scan.com";
pub const LAYERZERO_SCAN_API_SANDBOX: &str = "https://api-sandbox.layerzero-scan.com";

/// Relay status source backed by LayerZero Scan's `/tx/{hash}` endpoint.
#[derive(Debug, Clone)]
pub struct LayerZeroScanClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<ScanMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanMessage {
    status: String,
    dst_tx_hash: Option<TxHash>,
    dst_tx_error: Option<String>,
}

impl LayerZeroScanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn mainnet() -> Self {
        Self::new(LAYERZERO_SCAN_API)
    }

    pub fn testnet() -> Self {
        Self::new(LAYERZERO_SCAN_API_TESTNET)
    }

    pub fn sandbox() -> Self {
        Self::new(LAYERZERO_SCAN_API_SANDBOX)
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Mainnet => Self::mainnet(),
            Environment::Testnet => Self::testnet(),
        }
    }

    /// The messages endpoint for an origin transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Url`](crate::TrackerError::Url) if the base URL is malformed.
    pub fn tx_url(&self, tx_hash: TxHash) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?.join(&format!("tx/{tx_hash}"))?)
    }
}

/// Only the first message of a transaction is tracked; the message contracts
/// send exactly one per call.
pub(crate) fn parse_messages_response(body: &str) -> RelayStatusSnapshot {
    let response: MessagesResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, event = "layerzero_scan_response_unparseable");
            return RelayStatusSnapshot::cannot_fetch();
        }
    };

    match response.messages.into_iter().next() {
        None => RelayStatusSnapshot::new(LayerZeroMessageStatus::NOT_FOUND),
        Some(message) => {
            if let Some(reason) = &message.dst_tx_error {
                debug!(reason = %reason, event = "layerzero_destination_error_reported");
            }
            let failed = message.dst_tx_error.is_some()
                || LayerZeroMessageStatus::parse(&message.status)
                    == Some(LayerZeroMessageStatus::Failed);

            RelayStatusSnapshot::new(message.status)
                .with_destination_tx_hash(message.dst_tx_hash)
                .with_destination_success(failed.then_some(false))
        }
    }
}

#[async_trait]
impl RelayStatusSource for LayerZeroScanClient {
    #[instrument(skip(self), fields(tx_hash = %origin_tx_hash))]
    async fn query_status(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        let url = self.tx_url(origin_tx_hash)?;
        trace!(url = %url, "Requesting messages from LayerZero Scan");

        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(event = "layerzero_message_not_found");
                Ok(RelayStatusSnapshot::new(LayerZeroMessageStatus::NOT_FOUND))
            }
            status_code if !status_code.is_success() => {
                debug!(status_code = %status_code, event = "layerzero_scan_http_error");
                Ok(RelayStatusSnapshot::cannot_fetch())
            }
            _ => {
                let body = response.text().await?;
                let snapshot = parse_messages_response(&body);
                debug!(code = %snapshot.code, event = "layerzero_status_parsed");
                Ok(snapshot)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_url() {
        let client = LayerZeroScanClient::testnet();
        insta::assert_snapshot!(
            client.tx_url(TxHash::repeat_byte(0x01)).unwrap(),
            @"https://api-testnet.layerzero-scan.com/tx/0x0101010101010101010101010101010101010101010101010101010101010101"
        );
    }

    #[test]
    fn test_parse_delivered() {
        let body = r#"{"messages":[{
            "srcUaAddress": "0x95e0b8cfcfbac0ee92b5064a108aa02f68e622d6",
            "status": "DELIVERED",
            "dstTxHash": "0x2222222222222222222222222222222222222222222222222222222222222222"
        }]}"#;

        let snapshot = parse_messages_response(body);

        assert_eq!(snapshot.code, "DELIVERED");
        assert_eq!(snapshot.destination_tx_hash, Some(TxHash::repeat_byte(0x22)));
        assert_eq!(snapshot.destination_success, None);
    }

    #[test]
    fn test_parse_failed_marks_destination_unsuccessful() {
        let body = r#"{"messages":[{"status":"FAILED","dstTxError":"reverted"}]}"#;

        let snapshot = parse_messages_response(body);

        assert_eq!(snapshot.code, "FAILED");
        assert_eq!(snapshot.destination_success, Some(false));
    }

    #[test]
    fn test_parse_no_messages() {
        assert_eq!(
            parse_messages_response(r#"{"messages":[]}"#).code,
            LayerZeroMessageStatus::NOT_FOUND
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_messages_response("null").is_cannot_fetch());
    }
}
