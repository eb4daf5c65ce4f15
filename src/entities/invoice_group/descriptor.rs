//! Entity descriptor for InvoiceGroup

use super::handlers::{
    InvoiceGroupAppState, create_invoice_group, get_invoice_group, list_invoice_groups,
    settle_invoice_group,
};
use super::service::InvoiceService;
use crate::core::module::ModuleContext;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

/// Descriptor for the InvoiceGroup entity
pub struct InvoiceGroupDescriptor {
    context: ModuleContext,
}

impl InvoiceGroupDescriptor {
    pub fn new(context: ModuleContext) -> Self {
        Self { context }
    }
}

impl EntityDescriptor for InvoiceGroupDescriptor {
    fn entity_type(&self) -> &str {
        "invoice_group"
    }

    fn plural(&self) -> &str {
        "invoice-groups"
    }

    fn build_routes(&self) -> Router {
        let state = InvoiceGroupAppState {
            service: InvoiceService::new(self.context.store.clone(), self.context.events.clone()),
        };

        Router::new()
            .route(
                "/invoice-groups",
                get(list_invoice_groups).post(create_invoice_group),
            )
            .route("/invoice-groups/{id}", get(get_invoice_group))
            .route(
                "/invoice-groups/{id}/settlements",
                post(settle_invoice_group),
            )
            .with_state(state)
    }
}
