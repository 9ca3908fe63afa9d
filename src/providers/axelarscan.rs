//! Axelarscan GMP API client.

use alloy_chains::NamedChain;
use alloy_primitives::{TxHash, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, trace};

use crate::adapter::{axelar_chain_name, GmpStatus};
use crate::chain::Environment;
use crate::error::{Result, TrackerError};
use crate::protocol::RelayStatusSnapshot;
use crate::traits::{GasFeeEstimator, RelayStatusSource};

pub const AXELARSCAN_GMP_API: &str = "https://api.gmp.axelarscan.io";
pub const AXELARSCAN_GMP_API_TESTNET: &str = "https://testnet.api.gmp.axelarscan.io";

/// Code reported while Axelarscan has not indexed the origin transaction yet.
pub const NOT_INDEXED: &str = "not_indexed";

/// Status source and fee estimator backed by Axelarscan.
///
/// # Examples
///
/// ```rust,no_run
/// use gmp_tracker::providers::AxelarscanClient;
/// use gmp_tracker::traits::RelayStatusSource;
/// use alloy_primitives::TxHash;
///
/// # async fn example() -> Result<(), gmp_tracker::TrackerError> {
/// let client = AxelarscanClient::testnet();
/// let snapshot = client.query_status(TxHash::ZERO).await?;
/// println!("{}", snapshot.code);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AxelarscanClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchGmpResponse {
    #[serde(default)]
    data: Vec<GmpRecord>,
}

#[derive(Debug, Deserialize)]
struct GmpRecord {
    status: Option<String>,
    executed: Option<ExecutedCall>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutedCall {
    transaction_hash: Option<TxHash>,
}

impl AxelarscanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn mainnet() -> Self {
        Self::new(AXELARSCAN_GMP_API)
    }

    pub fn testnet() -> Self {
        Self::new(AXELARSCAN_GMP_API_TESTNET)
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Mainnet => Self::mainnet(),
            Environment::Testnet => Self::testnet(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_request(tx_hash: TxHash) -> Value {
        json!({
            "method": "searchGMP",
            "txHash": tx_hash.to_string(),
        })
    }

    fn fee_request(
        source_chain: &str,
        destination_chain: &str,
        token_symbol: &str,
        gas_units: u64,
    ) -> Value {
        json!({
            "method": "estimateGasFee",
            "sourceChain": source_chain,
            "destinationChain": destination_chain,
            "gasLimit": gas_units,
            "sourceTokenSymbol": token_symbol,
        })
    }
}

/// Turns a `searchGMP` response body into a snapshot.
///
/// An unparseable body is an explicit "cannot fetch" answer; an empty result
/// set means the transaction is not indexed yet.
pub(crate) fn parse_search_response(body: &str) -> RelayStatusSnapshot {
    let response: SearchGmpResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, event = "axelarscan_response_unparseable");
            return RelayStatusSnapshot::cannot_fetch();
        }
    };

    let Some(record) = response.data.into_iter().next() else {
        return RelayStatusSnapshot::new(NOT_INDEXED);
    };

    let raw = record.status.unwrap_or_default();
    let code = GmpStatus::from_axelarscan(&raw)
        .map(|status| status.as_str().to_string())
        .unwrap_or(raw);

    RelayStatusSnapshot::new(code)
        .with_destination_tx_hash(record.executed.and_then(|e| e.transaction_hash))
}

/// Extracts a fee from an `estimateGasFee` response, which is either a bare
/// value or wrapped in `{"result": ...}`.
pub(crate) fn parse_fee(value: &Value) -> Option<U256> {
    match value {
        Value::String(s) => s.parse::<U256>().ok(),
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::Object(map) => map.get("result").and_then(parse_fee),
        _ => None,
    }
}

#[async_trait]
impl RelayStatusSource for AxelarscanClient {
    #[instrument(skip(self), fields(tx_hash = %origin_tx_hash))]
    async fn query_status(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        trace!(url = %self.base_url, "Requesting GMP status from Axelarscan");

        let response = self
            .client
            .post(&self.base_url)
            .json(&Self::search_request(origin_tx_hash))
            .send()
            .await?;

        let status_code = response.status();
        if !status_code.is_success() {
            debug!(
                status_code = %status_code,
                event = "axelarscan_http_error"
            );
            return Ok(RelayStatusSnapshot::cannot_fetch());
        }

        let body = response.text().await?;
        let snapshot = parse_search_response(&body);
        debug!(code = %snapshot.code, event = "axelarscan_status_parsed");

        Ok(snapshot)
    }
}

#[async_trait]
impl GasFeeEstimator for AxelarscanClient {
    #[instrument(skip(self))]
    async fn estimate(
        &self,
        origin: NamedChain,
        destination: NamedChain,
        token_symbol: &str,
        gas_units: u64,
    ) -> Result<U256> {
        let name = |chain: NamedChain| {
            axelar_chain_name(chain).ok_or_else(|| TrackerError::FeeQuote {
                reason: format!("{chain} has no Axelar chain name"),
            })
        };
        let request = Self::fee_request(name(origin)?, name(destination)?, token_symbol, gas_units);

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?;

        let status_code = response.status();
        if !status_code.is_success() {
            return Err(TrackerError::FeeQuote {
                reason: format!("Axelarscan returned HTTP {status_code}"),
            });
        }

        let value: Value = response.json().await?;
        parse_fee(&value).ok_or_else(|| TrackerError::FeeQuote {
            reason: format!("unrecognised fee response: {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_search_request_shape() {
        let request = AxelarscanClient::search_request(TxHash::repeat_byte(0xab));
        assert_eq!(request["method"], "searchGMP");
        insta::assert_snapshot!(
            request["txHash"].as_str().unwrap(),
            @"0xabababababababababababababababababababababababababababababababab"
        );
    }

    #[test]
    fn test_fee_request_shape() {
        let request = AxelarscanClient::fee_request("moonbeam", "avalanche", "GLMR", 200_000);
        assert_eq!(request["method"], "estimateGasFee");
        assert_eq!(request["sourceChain"], "moonbeam");
        assert_eq!(request["destinationChain"], "avalanche");
        assert_eq!(request["sourceTokenSymbol"], "GLMR");
        assert_eq!(request["gasLimit"], 200_000);
    }

    #[test]
    fn test_parse_executed_record() {
        let body = r#"{
            "data": [{
                "status": "executed",
                "executed": {
                    "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111"
                }
            }]
        }"#;

        let snapshot = parse_search_response(body);

        assert_eq!(snapshot.code, "destination_executed");
        assert_eq!(
            snapshot.destination_tx_hash,
            Some(b256!("1111111111111111111111111111111111111111111111111111111111111111"))
        );
    }

    #[test]
    fn test_parse_unknown_status_passes_through() {
        let snapshot = parse_search_response(r#"{"data":[{"status":"forecalled"}]}"#);
        assert_eq!(snapshot.code, "forecalled");
        assert_eq!(snapshot.destination_tx_hash, None);
    }

    #[test]
    fn test_parse_empty_result_set() {
        assert_eq!(parse_search_response(r#"{"data":[]}"#).code, NOT_INDEXED);
        assert_eq!(parse_search_response("{}").code, NOT_INDEXED);
    }

    #[test]
    fn test_parse_garbage_is_cannot_fetch() {
        assert!(parse_search_response("<html>bad gateway</html>").is_cannot_fetch());
    }

    #[test]
    fn test_parse_fee() {
        assert_eq!(
            parse_fee(&json!("123456789012345678901")),
            Some(U256::from(123_456_789_012_345_678_901u128))
        );
        assert_eq!(parse_fee(&json!(42)), Some(U256::from(42u64)));
        assert_eq!(parse_fee(&json!({"result": "7"})), Some(U256::from(7u64)));
        assert_eq!(parse_fee(&json!({"error": "boom"})), None);
        assert_eq!(parse_fee(&json!("not a number")), None);
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            AxelarscanClient::for_environment(Environment::Testnet).base_url(),
            AXELARSCAN_GMP_API_TESTNET
        );
        assert_eq!(
            AxelarscanClient::for_environment(Environment::Mainnet).base_url(),
            AXELARSCAN_GMP_API
        );
    }
}
