//! Deployed message contract addresses, per protocol
//!
//! Each protocol has its own deployment of the message sender/receiver
//! contract. The tracker only reads these; they are resolved through
//! [`ProtocolAdapter::contract_address`](crate::ProtocolAdapter::contract_address).

use alloy_primitives::{address, Address};

// Axelar

/// <https://moonbase.moonscan.io/address/0x522172f49d0e04bddb9bf14d66ca38619b42f19a>
pub const AXELAR_MOONBASE_MESSAGE_CONTRACT: Address =
    address!("522172f49d0e04bddb9bf14d66ca38619b42f19a");

/// <https://testnet.ftmscan.com/address/0xfb8afead05b130796de04f00d9213a7bac2bc6c2>
pub const AXELAR_FANTOM_TESTNET_MESSAGE_CONTRACT: Address =
    address!("fb8afead05b130796de04f00d9213a7bac2bc6c2");

/// <https://testnet.snowtrace.io/address/0x827d4b6bd9660d1a4c42e4453307c8d3d5c1f051>
pub const AXELAR_FUJI_MESSAGE_CONTRACT: Address =
    address!("827d4b6bd9660d1a4c42e4453307c8d3d5c1f051");

// Hyperlane

pub const HYPERLANE_MOONBASE_MESSAGE_CONTRACT: Address =
    address!("DedC95A31c0a04175CeB9d31Da505D4592e2C1f3");

pub const HYPERLANE_FUJI_MESSAGE_CONTRACT: Address =
    address!("af108eF646c8214c9DD9C13CBC5fadf964Bbe293");

// LayerZero

pub const LAYERZERO_MOONBASE_MESSAGE_CONTRACT: Address =
    address!("95e0B8CFcFbac0Ee92B5064A108aA02f68E622d6");

pub const LAYERZERO_FANTOM_TESTNET_MESSAGE_CONTRACT: Address =
    address!("5d9fa4E09AC085d3281c7bbC433e2B9500bD9923");

// Wormhole
//
// The Wormhole message contract is deployed at the same address on every
// supported testnet.

pub const WORMHOLE_MESSAGE_CONTRACT: Address =
    address!("fB7327Fe26aD52b693E38232E5D97F4892623075");
