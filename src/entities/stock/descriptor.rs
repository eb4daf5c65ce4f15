//! Entity descriptor for Stock

use super::handlers::{
    StockAppState, adjust_stock, create_stock, delete_stock, get_stock, list_stocks, update_stock,
};
use super::service::StockService;
use crate::core::module::ModuleContext;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Descriptor for the Stock entity
pub struct StockDescriptor {
    context: ModuleContext,
}

impl StockDescriptor {
    pub fn new(context: ModuleContext) -> Self {
        Self { context }
    }
}

impl EntityDescriptor for StockDescriptor {
    fn entity_type(&self) -> &str {
        "stock"
    }

    fn plural(&self) -> &str {
        "stocks"
    }

    fn build_routes(&self) -> Router {
        let state = StockAppState {
            stocks: Arc::new(self.context.store.clone()),
            service: StockService::new(self.context.store.clone(), self.context.events.clone()),
        };

        Router::new()
            .route("/stocks", get(list_stocks).post(create_stock))
            .route(
                "/stocks/{id}",
                get(get_stock).put(update_stock).delete(delete_stock),
            )
            .route("/stocks/{id}/adjustments", post(adjust_stock))
            .with_state(state)
    }
}
