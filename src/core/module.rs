//! Module system
//!
//! A module contributes entity descriptors to the server. Every module is
//! handed the same [`ModuleContext`] so all routes share one store, one
//! policy and one event bus.

use crate::core::events::EventBus;
use crate::core::policy::OrderingPolicy;
use crate::server::entity_registry::EntityRegistry;
use crate::storage::InMemoryStore;
use std::sync::Arc;

/// Shared state handed to modules when the server host is built
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub store: InMemoryStore,
    pub policy: Arc<OrderingPolicy>,
    pub events: EventBus,
}

impl ModuleContext {
    pub fn new(store: InMemoryStore, policy: OrderingPolicy, events: EventBus) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
            events,
        }
    }
}

/// Trait for a service module
pub trait Module: Send + Sync {
    /// Unique module name
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Entity types managed by this module
    fn entity_types(&self) -> Vec<&str>;

    /// Register all entity descriptors of the module
    fn register_entities(&self, context: &ModuleContext, registry: &mut EntityRegistry);
}
