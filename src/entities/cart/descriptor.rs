//! Entity descriptor for Cart

use super::handlers::{CartAppState, clear_cart, get_cart, remove_item, set_item};
use super::service::CartService;
use crate::core::module::ModuleContext;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, put},
};

/// Descriptor for the Cart entity
pub struct CartDescriptor {
    context: ModuleContext,
}

impl CartDescriptor {
    pub fn new(context: ModuleContext) -> Self {
        Self { context }
    }
}

impl EntityDescriptor for CartDescriptor {
    fn entity_type(&self) -> &str {
        "cart"
    }

    fn plural(&self) -> &str {
        "carts"
    }

    fn build_routes(&self) -> Router {
        let state = CartAppState {
            service: CartService::new(self.context.store.clone(), self.context.policy.clone()),
        };

        Router::new()
            .route("/cart", get(get_cart).delete(clear_cart))
            .route("/cart/items/{stock_id}", put(set_item).delete(remove_item))
            .with_state(state)
    }
}
