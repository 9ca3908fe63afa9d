//! Follow a cross-chain message from its origin transaction to delivery
//!
//! Reads its configuration from the environment (a `.env` file is loaded if
//! present), watches the origin receipt, then polls the protocol's relay
//! status until the message settles, printing every change on the way.
//!
//! ```bash
//! PROTOCOL=axelar \
//! ORIGIN_CHAIN_ID=1287 DESTINATION_CHAIN_ID=43113 \
//! ORIGIN_RPC_URL=https://rpc.api.moonbase.moonbeam.network \
//! ORIGIN_TX_HASH=0x... \
//! RUST_LOG=gmp_tracker=debug cargo run --example track_message
//! ```
//!
//! Hyperlane reads delivery from the destination Mailbox, so it also needs
//! `DESTINATION_RPC_URL` and `HYPERLANE_DESTINATION_MAILBOX`.

use std::env;
use std::sync::Arc;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash};
use alloy_provider::ProviderBuilder;
use dotenvy::dotenv;
use gmp_tracker::providers::{AlloyProvider, MailboxStatusSource};
use gmp_tracker::{
    AdapterRegistry, CrossChainTracker, HyperlaneAdapter, PollingConfig, Protocol,
    ReceiptObserver, TransactionHandle, TrackerError,
};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, TrackerError> {
    env::var(name).map_err(|_| TrackerError::InvalidConfig(format!("{name} must be set")))
}

fn chain_from_env(name: &str, default: NamedChain) -> Result<NamedChain, TrackerError> {
    match env::var(name) {
        Ok(id) => {
            let id: u64 = id
                .parse()
                .map_err(|_| TrackerError::InvalidConfig(format!("{name} is not a chain id")))?;
            NamedChain::try_from(id)
                .map_err(|_| TrackerError::InvalidConfig(format!("unknown chain id {id}")))
        }
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gmp_tracker=info")),
        )
        .init();

    let protocol: Protocol = env::var("PROTOCOL")
        .unwrap_or_else(|_| "axelar".to_string())
        .parse()?;
    let origin = chain_from_env("ORIGIN_CHAIN_ID", NamedChain::Moonbase)?;
    let destination = chain_from_env("DESTINATION_CHAIN_ID", NamedChain::AvalancheFuji)?;
    let tx_hash: TxHash = required("ORIGIN_TX_HASH")?.parse()?;

    println!("Tracking {protocol} message {origin} -> {destination}");
    println!("Origin transaction: {tx_hash}\n");

    let origin_provider = ProviderBuilder::new().connect(&required("ORIGIN_RPC_URL")?).await?;

    let mut registry = AdapterRegistry::testnet();
    if protocol == Protocol::Hyperlane {
        let destination_provider = ProviderBuilder::new()
            .connect(&required("DESTINATION_RPC_URL")?)
            .await?;
        let mailbox: Address = required("HYPERLANE_DESTINATION_MAILBOX")?.parse()?;
        let source = MailboxStatusSource::builder()
            .origin(AlloyProvider::new(origin_provider.clone()))
            .destination(destination_provider)
            .destination_mailbox(mailbox)
            .build();
        registry.register(HyperlaneAdapter::new(source));
    }

    let tracker = CrossChainTracker::builder()
        .adapter(registry.get(protocol)?)
        .origin(origin)
        .destination(destination)
        .polling(PollingConfig::interactive())
        .build()?;

    let mut updates = tracker.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().clone();
            println!("  {:<20} {:?}", status.state.to_string(), status.relay.map(|s| s.code));
            if status.state.is_terminal() {
                break;
            }
        }
    });

    let observer = ReceiptObserver::new(
        AlloyProvider::new(origin_provider),
        TransactionHandle::broadcast(tx_hash),
    );
    tracker.observe(observer).await?;
    let exit = tracker.join_poller().await?;
    printer.abort();

    let report = tracker.status_report();
    println!("\nPoller exit: {exit:?}");
    println!("Stages:      {}", report.stages);
    if let Some(hash) = report.destination_tx_hash {
        println!("Destination: {hash}");
    }
    if !report.full_visibility {
        println!("Note: {protocol} does not expose destination execution.");
    }

    Ok(())
}
