//! Descriptor exposing the discount schedule

use super::handlers::{DiscountAppState, list_tiers, quote};
use crate::core::policy::OrderingPolicy;
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

pub struct DiscountDescriptor {
    policy: Arc<OrderingPolicy>,
}

impl DiscountDescriptor {
    pub fn new(policy: Arc<OrderingPolicy>) -> Self {
        Self { policy }
    }
}

impl EntityDescriptor for DiscountDescriptor {
    fn entity_type(&self) -> &str {
        "discount"
    }

    fn plural(&self) -> &str {
        "discounts"
    }

    fn build_routes(&self) -> Router {
        let state = DiscountAppState {
            policy: self.policy.clone(),
        };

        Router::new()
            .route("/discounts/tiers", get(list_tiers))
            .route("/discounts/quote", get(quote))
            .with_state(state)
    }
}
