// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Bindings for the cross-chain message contract
//!
//! Every protocol deploys the same "hello world" contract shape: `sendMessage`
//! on the origin dispatches through the protocol, and the destination stores
//! the last message received per sender.

use alloy_network::Ethereum;
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use tracing::{debug, info};

use crate::tracker::SendPlan;
use MessageReceiver::MessageReceiverInstance;

/// Message contract wrapper for sending and reading messages
///
/// # Example
///
/// ```rust,no_run
/// use gmp_tracker::{AdapterRegistry, CrossChainTracker, MessageReceiverContract, Protocol};
/// use alloy_chains::NamedChain;
/// use alloy_primitives::address;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("https://rpc.api.moonbase.moonbeam.network").await?;
/// let tracker = CrossChainTracker::builder()
///     .adapter(AdapterRegistry::testnet().get(Protocol::Axelar)?)
///     .origin(NamedChain::Moonbase)
///     .destination(NamedChain::AvalancheFuji)
///     .build()?;
///
/// let plan = tracker.plan_send("hello").await?;
/// let contract = MessageReceiverContract::new(plan.origin_contract, provider);
///
/// let sender = address!("1234567890123456789012345678901234567890");
/// let tx = contract.send_message_transaction(sender, &plan);
/// // Sign and send, then feed the hash to the tracker...
/// # Ok(())
/// # }
/// ```
pub struct MessageReceiverContract<P: Provider<Ethereum>> {
    instance: MessageReceiverInstance<P>,
}

impl<P: Provider<Ethereum>> MessageReceiverContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "message_receiver_contract_initialized"
        );
        Self {
            instance: MessageReceiverInstance::new(address, provider),
        }
    }

    /// Create the `sendMessage` transaction for a prepared plan
    ///
    /// The plan's fee is attached as value. This creates but does not send
    /// the transaction; the caller signs and submits it.
    pub fn send_message_transaction(&self, from: Address, plan: &SendPlan) -> TransactionRequest {
        info!(
            from = %from,
            protocol = %plan.protocol,
            destination_contract = %plan.destination_contract,
            destination_chain = %plan.destination_chain_id,
            fee_wei = %plan.fee,
            contract_address = %self.instance.address(),
            event = "send_message_transaction_created"
        );

        self.instance
            .sendMessage(
                plan.message.clone(),
                plan.destination_contract,
                plan.destination_chain_arg(),
            )
            .from(from)
            .value(plan.fee)
            .into_transaction_request()
    }

    /// The last message this contract received from `account`
    pub async fn last_message(&self, account: Address) -> Result<String, alloy_contract::Error> {
        debug!(
            account = %account,
            contract_address = %self.instance.address(),
            event = "reading_last_message"
        );

        let message = self.instance.lastMessage(account).call().await?;

        info!(
            account = %account,
            message_len = message.len(),
            contract_address = %self.instance.address(),
            event = "last_message_retrieved"
        );

        Ok(message)
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract MessageReceiver {
        function sendMessage(string _message, address destinationAddress, string destinationChain) external payable;
        function lastMessage(address) external view returns (string);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AxelarAdapter;
    use crate::testing::FakeRelayStatusSource;
    use alloy_chains::NamedChain;
    use alloy_primitives::{address, U256};
    use alloy_provider::ProviderBuilder;
    use alloy_sol_types::SolCall;

    #[tokio::test]
    async fn test_send_message_transaction_carries_plan() {
        let source = FakeRelayStatusSource::new().with_fee(U256::from(7u64));
        let plan = SendPlan::prepare(
            &AxelarAdapter::new(source),
            NamedChain::Moonbase,
            NamedChain::AvalancheFuji,
            "hello",
        )
        .await
        .unwrap();

        let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse().unwrap());
        let contract = MessageReceiverContract::new(plan.origin_contract, provider);
        let from = address!("1234567890123456789012345678901234567890");

        let tx = contract.send_message_transaction(from, &plan);

        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.value, Some(U256::from(7u64)));

        let input = tx.input.input().unwrap();
        let decoded = MessageReceiver::sendMessageCall::abi_decode(input).unwrap();
        assert_eq!(decoded._message, "hello");
        assert_eq!(decoded.destinationAddress, plan.destination_contract);
        assert_eq!(decoded.destinationChain, "avalanche");
    }
}
