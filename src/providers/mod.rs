//! Production implementations of the tracker's trait abstractions.
//!
//! These talk to real chains (through Alloy), to the relay networks' public
//! status APIs and to Tokio's timer. Tests use the fakes in
//! [`crate::testing`] instead.

mod alloy;
mod assumed;
mod axelarscan;
mod layerzero_scan;
mod mailbox;
mod receipt_observer;
mod tokio_clock;

pub use self::alloy::AlloyProvider;
pub use self::assumed::AssumedDelivery;
pub use self::axelarscan::{
    AxelarscanClient, AXELARSCAN_GMP_API, AXELARSCAN_GMP_API_TESTNET, NOT_INDEXED,
};
pub use self::layerzero_scan::{
    LayerZeroScanClient, LAYERZERO_SCAN_API, LAYERZERO_SCAN_API_SANDBOX,
    LAYERZERO_SCAN_API_TESTNET,
};
#[cfg(test)]
pub(crate) use self::layerzero_scan::parse_messages_response;
pub use self::mailbox::{
    delivered_snapshot, dispatched_message_id, IMailbox, MailboxStatusSource,
};
pub use self::receipt_observer::ReceiptObserver;
pub use self::tokio_clock::TokioClock;
