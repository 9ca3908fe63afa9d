//! Alloy-based origin chain client.

use alloy_network::Ethereum;
use alloy_primitives::TxHash;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionReceipt;
use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use crate::error::{Result, TrackerError};
use crate::traits::BlockchainProvider;

/// Production chain client wrapping Alloy's [`Provider`] trait.
///
/// # Examples
///
/// ```rust,no_run
/// use gmp_tracker::providers::AlloyProvider;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new()
///     .connect("https://rpc.api.moonbase.moonbeam.network")
///     .await?;
///
/// let chain_client = AlloyProvider::new(provider);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AlloyProvider<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
}

impl<P> AlloyProvider<P>
where
    P: Provider<Ethereum> + Clone,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a reference to the underlying Alloy provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> BlockchainProvider for AlloyProvider<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
        trace!("Fetching transaction receipt");
        let result = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| TrackerError::Provider(e.to_string()))?;

        debug!(found = result.is_some(), event = "transaction_receipt_fetched");
        Ok(result)
    }
}
