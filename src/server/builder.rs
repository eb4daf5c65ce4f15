//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::OmisConfig;
use crate::core::events::EventBus;
use crate::core::module::{Module, ModuleContext};
use crate::core::policy::OrderingPolicy;
use crate::storage::InMemoryStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(OmisConfig::from_yaml_file("omis.yaml")?)
///     .register_module(OrderingModule)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: Option<OmisConfig>,
    store: Option<InMemoryStore>,
    event_bus: Option<EventBus>,
    modules: Vec<Arc<dyn Module>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
            event_bus: None,
            modules: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Use this configuration instead of the defaults
    pub fn with_config(mut self, config: OmisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing store, e.g. one seeded by a test
    pub fn with_store(mut self, store: InMemoryStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Publish domain events on this bus
    ///
    /// Subscribe to the bus before building so no event is missed. Without
    /// it a bus sized by `events.capacity` is created.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Extra routes nested under the API prefix next to the entity routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn register_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// Validate the configuration and let every module register its entities
    pub fn build_host(mut self) -> Result<ServerHost> {
        let config = self.config.take().unwrap_or_default();
        config.validate()?;

        let policy = OrderingPolicy::from_config(&config)?;
        let events = self
            .event_bus
            .take()
            .unwrap_or_else(|| EventBus::new(config.events.capacity));
        let context = ModuleContext::new(self.store.take().unwrap_or_default(), policy, events);

        let mut registry = EntityRegistry::new();
        for module in &self.modules {
            tracing::info!(
                module = module.name(),
                version = module.version(),
                entities = ?module.entity_types(),
                "registering module"
            );
            module.register_entities(&context, &mut registry);
        }

        Ok(ServerHost::from_builder_components(
            config, context, registry,
        ))
    }

    /// Build the REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        Ok(RestExposure::build_router(host, custom_routes))
    }

    /// Serve with graceful shutdown on Ctrl+C / SIGTERM
    ///
    /// Binds to `addr`, or to `server.bind` from the configuration when `None`.
    pub async fn serve(self, addr: Option<&str>) -> Result<()> {
        let addr = match addr {
            Some(addr) => addr.to_string(),
            None => self.config.clone().unwrap_or_default().server.bind,
        };
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
