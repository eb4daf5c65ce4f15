//! Server host
//!
//! Holds everything the exposures need: validated configuration, the shared
//! module context and the entity registry. The host knows nothing about
//! HTTP; [`RestExposure`](super::exposure::RestExposure) turns it into a
//! router.

use crate::config::OmisConfig;
use crate::core::events::EventBus;
use crate::core::module::ModuleContext;
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

pub struct ServerHost {
    pub config: Arc<OmisConfig>,

    /// Store, policy and event bus shared by every route
    pub context: ModuleContext,

    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    pub fn from_builder_components(
        config: OmisConfig,
        context: ModuleContext,
        entity_registry: EntityRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            context,
            entity_registry,
        }
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }

    /// Whether any module registered routes
    pub fn is_ready(&self) -> bool {
        !self.entity_registry.entity_types().is_empty()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.context.events
    }

    pub fn api_prefix(&self) -> &str {
        &self.config.server.api_prefix
    }
}
