//! Message contract bindings
//!
//! Alloy-generated bindings for the message contract each protocol deploys.
//! The addresses live in [`crate::chain::addresses`] and are resolved per
//! protocol through [`ProtocolAdapter::contract_address`](crate::ProtocolAdapter::contract_address).

pub mod message_receiver;
