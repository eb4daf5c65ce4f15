//! Entity descriptor for Order

use super::handlers::{
    OrderAppState, change_status, checkout, get_order, list_orders, return_items,
};
use super::service::OrderService;
use crate::core::module::ModuleContext;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

/// Descriptor for the Order entity
pub struct OrderDescriptor {
    context: ModuleContext,
}

impl OrderDescriptor {
    pub fn new(context: ModuleContext) -> Self {
        Self { context }
    }
}

impl EntityDescriptor for OrderDescriptor {
    fn entity_type(&self) -> &str {
        "order"
    }

    fn plural(&self) -> &str {
        "orders"
    }

    fn build_routes(&self) -> Router {
        let state = OrderAppState {
            service: OrderService::new(
                self.context.store.clone(),
                self.context.policy.clone(),
                self.context.events.clone(),
            ),
        };

        Router::new()
            .route("/orders", get(list_orders))
            .route("/orders/checkout", post(checkout))
            .route("/orders/{id}", get(get_order))
            .route("/orders/{id}/status", post(change_status))
            .route("/orders/{id}/returns", post(return_items))
            .with_state(state)
    }
}
