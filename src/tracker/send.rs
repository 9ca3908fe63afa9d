use alloy_chains::NamedChain;
use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use crate::adapter::{Protocol, ProtocolAdapter, ProtocolChainId};
use crate::error::{Result, TrackerError};

/// Everything needed to submit one message through a protocol's message
/// contract, resolved and validated before anything touches a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendPlan {
    pub protocol: Protocol,
    pub origin: NamedChain,
    pub destination: NamedChain,
    /// Message contract on the origin chain; the transaction goes here.
    pub origin_contract: Address,
    /// Message contract on the destination chain; the relay delivers here.
    pub destination_contract: Address,
    /// Destination identifier in the protocol's own vocabulary.
    pub destination_chain_id: ProtocolChainId,
    pub message: String,
    /// Native value to attach, in origin base units.
    pub fee: U256,
}

impl SendPlan {
    /// Validates the route and message, resolves both contracts and quotes
    /// the fee.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::SameChain`] if origin and destination are equal
    /// - [`TrackerError::EmptyMessage`] if the message is empty or whitespace
    /// - [`TrackerError::UnsupportedChain`] if either chain has no deployment
    /// - [`TrackerError::FeeQuote`] if the fee cannot be quoted
    pub async fn prepare<A>(
        adapter: &A,
        origin: NamedChain,
        destination: NamedChain,
        message: &str,
    ) -> Result<Self>
    where
        A: ProtocolAdapter + ?Sized,
    {
        if origin == destination {
            return Err(TrackerError::SameChain(origin));
        }
        if message.trim().is_empty() {
            return Err(TrackerError::EmptyMessage);
        }

        let origin_contract = adapter.contract_address(origin)?;
        let destination_contract = adapter.contract_address(destination)?;
        let destination_chain_id = adapter.protocol_chain_id(destination)?;

        debug!(
            protocol = %adapter.protocol(),
            origin_contract = %origin_contract,
            destination_contract = %destination_contract,
            destination_chain_id = %destination_chain_id,
            event = "send_route_resolved"
        );

        let fee = adapter.gas_fee_quote(origin, destination).await?;

        info!(
            protocol = %adapter.protocol(),
            origin_chain = %origin,
            destination_chain = %destination,
            fee_wei = %fee,
            message_len = message.len(),
            event = "send_plan_prepared"
        );

        Ok(Self {
            protocol: adapter.protocol(),
            origin,
            destination,
            origin_contract,
            destination_contract,
            destination_chain_id,
            message: message.to_string(),
            fee,
        })
    }

    /// The destination chain argument as the message contract expects it.
    pub fn destination_chain_arg(&self) -> String {
        self.destination_chain_id.to_string()
    }
}
