use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{AxelarAdapter, LayerZeroAdapter, Protocol, ProtocolAdapter, WormholeAdapter};
use crate::error::{Result, TrackerError};

/// Runtime lookup from [`Protocol`] to its adapter.
///
/// Adapters are shared as `Arc<dyn ProtocolAdapter>` so any number of
/// trackers can hold the same one.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Protocol, Arc<dyn ProtocolAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every adapter that works without per-route configuration:
    /// Axelar, LayerZero and Wormhole against their public testnet services.
    ///
    /// Hyperlane reads the destination Mailbox over RPC, so it has to be
    /// registered explicitly with a [`MailboxStatusSource`](crate::providers::MailboxStatusSource).
    pub fn testnet() -> Self {
        let mut registry = Self::new();
        registry.register(AxelarAdapter::testnet());
        registry.register(LayerZeroAdapter::testnet());
        registry.register(WormholeAdapter::new());
        registry
    }

    /// Registers an adapter under its own [`ProtocolAdapter::protocol`],
    /// replacing any adapter previously registered for that protocol.
    pub fn register<A>(&mut self, adapter: A) -> &mut Self
    where
        A: ProtocolAdapter + 'static,
    {
        self.register_shared(Arc::new(adapter))
    }

    pub fn register_shared(&mut self, adapter: Arc<dyn ProtocolAdapter>) -> &mut Self {
        let protocol = adapter.protocol();
        if self.adapters.insert(protocol, adapter).is_some() {
            debug!(protocol = %protocol, event = "adapter_replaced");
        }
        self
    }

    /// Looks up the adapter for `protocol`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::AdapterNotRegistered`] if none was registered.
    pub fn get(&self, protocol: Protocol) -> Result<Arc<dyn ProtocolAdapter>> {
        self.adapters
            .get(&protocol)
            .cloned()
            .ok_or(TrackerError::AdapterNotRegistered(protocol))
    }

    pub fn contains(&self, protocol: Protocol) -> bool {
        self.adapters.contains_key(&protocol)
    }

    pub fn protocols(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.adapters.keys().copied()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("protocols", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
