use alloy_chains::NamedChain;
use thiserror::Error;

use crate::adapter::Protocol;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Chain {chain} is not supported by {protocol}")]
    UnsupportedChain {
        protocol: Protocol,
        chain: NamedChain,
    },

    #[error("No adapter registered for protocol {0}")]
    AdapterNotRegistered(Protocol),

    #[error("Origin and destination must differ, both are {0}")]
    SameChain(NamedChain),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ContractCall(#[from] alloy_contract::Error),

    #[error("Gas fee quote failed: {reason}")]
    FeeQuote { reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Relay poller terminated abnormally: {0}")]
    Poller(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
