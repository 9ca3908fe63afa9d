//! Hyperlane Mailbox status source.

use alloy_network::Ethereum;
use alloy_primitives::{Address, B256, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::{Filter, TransactionReceipt};
use alloy_sol_types::{sol, SolEvent};
use async_trait::async_trait;
use bon::Builder;
use tracing::{debug, instrument};

use crate::adapter::MailboxStatus;
use crate::error::{Result, TrackerError};
use crate::protocol::RelayStatusSnapshot;
use crate::traits::{BlockchainProvider, RelayStatusSource};

use IMailbox::IMailboxInstance;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IMailbox {
        event DispatchId(bytes32 indexed messageId);
        event ProcessId(bytes32 indexed messageId);
        function delivered(bytes32 messageId) external view returns (bool);
    }
);

/// Finds the Hyperlane message id dispatched by an origin transaction.
pub fn dispatched_message_id(receipt: &TransactionReceipt) -> Option<B256> {
    receipt.inner.logs().iter().find_map(|log| {
        let topics = log.topics();
        (topics.first() == Some(&IMailbox::DispatchId::SIGNATURE_HASH))
            .then(|| topics.get(1).copied())
            .flatten()
    })
}

/// Snapshot for a message the destination Mailbox reports as delivered.
///
/// `process_succeeded` is the receipt status of the destination `process`
/// transaction, when it was looked up.
pub fn delivered_snapshot(
    destination_tx_hash: Option<TxHash>,
    process_succeeded: Option<bool>,
) -> RelayStatusSnapshot {
    let status = match process_succeeded {
        Some(false) => MailboxStatus::ProcessFailed,
        _ => MailboxStatus::Delivered,
    };
    RelayStatusSnapshot::new(status.as_str())
        .with_destination_tx_hash(destination_tx_hash)
        .with_destination_success(process_succeeded)
}

/// Reads delivery state from both ends of a Hyperlane route.
///
/// The origin receipt yields the message id from the Mailbox `DispatchId`
/// log; the destination Mailbox's `delivered(messageId)` view answers whether
/// it was processed. When `destination_from_block` is set, the `ProcessId` log
/// is also looked up to report the destination transaction hash, and the
/// receipt of that transaction decides whether execution succeeded.
///
/// # Example
///
/// ```rust,no_run
/// use gmp_tracker::providers::{AlloyProvider, MailboxStatusSource};
/// use alloy_primitives::address;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let origin = ProviderBuilder::new().connect("https://rpc.api.moonbase.moonbeam.network").await?;
/// let destination = ProviderBuilder::new().connect("https://api.avax-test.network/ext/bc/C/rpc").await?;
///
/// let source = MailboxStatusSource::builder()
///     .origin(AlloyProvider::new(origin))
///     .destination(destination)
///     .destination_mailbox(address!("cc737a94fecaec165abcf12ded095bb13f037685"))
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct MailboxStatusSource<O, P>
where
    O: BlockchainProvider,
    P: Provider<Ethereum> + Clone,
{
    origin: O,
    destination: P,
    destination_mailbox: Address,
    destination_from_block: Option<u64>,
}

impl<O, P> MailboxStatusSource<O, P>
where
    O: BlockchainProvider,
    P: Provider<Ethereum> + Clone,
{
    fn mailbox(&self) -> IMailboxInstance<P> {
        IMailboxInstance::new(self.destination_mailbox, self.destination.clone())
    }

    async fn process_tx_hash(&self, message_id: B256, from_block: u64) -> Result<Option<TxHash>> {
        let filter = Filter::new()
            .address(self.destination_mailbox)
            .event_signature(IMailbox::ProcessId::SIGNATURE_HASH)
            .topic1(message_id)
            .from_block(from_block);

        let logs = self
            .destination
            .get_logs(&filter)
            .await
            .map_err(|e| TrackerError::Provider(format!("Failed to get ProcessId logs: {e}")))?;

        Ok(logs.first().and_then(|log| log.transaction_hash))
    }

    async fn process_succeeded(&self, tx_hash: TxHash) -> Result<Option<bool>> {
        let receipt = self
            .destination
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| TrackerError::Provider(format!("Failed to get process receipt: {e}")))?;

        Ok(receipt.map(|receipt| receipt.inner.status()))
    }
}

#[async_trait]
impl<O, P> RelayStatusSource for MailboxStatusSource<O, P>
where
    O: BlockchainProvider,
    P: Provider<Ethereum> + Clone,
{
    #[instrument(skip(self), fields(tx_hash = %origin_tx_hash, mailbox = %self.destination_mailbox))]
    async fn query_status(&self, origin_tx_hash: TxHash) -> Result<RelayStatusSnapshot> {
        let Some(receipt) = self.origin.get_transaction_receipt(origin_tx_hash).await? else {
            debug!(event = "origin_receipt_not_found");
            return Ok(RelayStatusSnapshot::new(MailboxStatus::NotDispatched.as_str()));
        };

        let Some(message_id) = dispatched_message_id(&receipt) else {
            debug!(
                available_logs = receipt.inner.logs().len(),
                event = "dispatch_id_not_found"
            );
            return Ok(RelayStatusSnapshot::new(MailboxStatus::NotDispatched.as_str()));
        };

        let delivered = self.mailbox().delivered(message_id).call().await?;
        debug!(
            message_id = %message_id,
            delivered,
            event = "mailbox_delivery_checked"
        );

        if !delivered {
            return Ok(RelayStatusSnapshot::new(MailboxStatus::Dispatched.as_str()));
        }

        let destination_tx_hash = match self.destination_from_block {
            Some(from_block) => self.process_tx_hash(message_id, from_block).await?,
            None => None,
        };

        let process_succeeded = match destination_tx_hash {
            Some(tx_hash) => self.process_succeeded(tx_hash).await?,
            None => None,
        };
        if process_succeeded == Some(false) {
            debug!(message_id = %message_id, event = "mailbox_process_reverted");
        }

        Ok(delivered_snapshot(destination_tx_hash, process_succeeded))
    }
}
