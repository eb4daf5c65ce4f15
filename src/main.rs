//! omis-server
//!
//! Usage: `omis-server [config.yaml]`. Without a path the built-in defaults
//! are used. Log levels come from `RUST_LOG`.

use anyhow::{Context, Result};
use omis::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("omis=info,tower_http=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => OmisConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => OmisConfig::default_config(),
    };

    tracing::info!(
        bind = %config.server.bind,
        api_prefix = %config.server.api_prefix,
        order_mode = %config.ordering.order_mode,
        "starting omis-server"
    );

    let events = EventBus::new(config.events.capacity);
    tokio::spawn(run_notification_worker(events.subscribe()));

    ServerBuilder::new()
        .with_config(config)
        .with_event_bus(events)
        .register_module(OrderingModule)
        .serve(None)
        .await
}
