//! Unified cross-chain status model
//!
//! This module contains the protocol-independent types every adapter maps onto:
//! the ordered [`CrossChainState`], the raw [`RelayStatusSnapshot`], origin
//! lifecycle events and the three-stage projection.

mod origin;
mod projection;
mod snapshot;
mod state;

pub use origin::{OriginEvent, OriginReceipt, TransactionHandle, TxLifecycle};
pub use projection::{project, ProjectedStatus, Stage, StatusReport, Visibility};
pub use snapshot::RelayStatusSnapshot;
pub use state::{CrossChainState, Transition};
