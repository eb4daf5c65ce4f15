//! Business entities of the ordering service
//!
//! Each entity lives in its own directory with a model, HTTP handlers and a
//! descriptor that builds its routes. Entities with business rules beyond
//! CRUD also carry a service.

pub mod macros;

pub mod cart;
pub mod discount;
pub mod invoice_group;
pub mod order;
pub mod product;
pub mod stock;

pub use cart::Cart;
pub use invoice_group::InvoiceGroup;
pub use order::Order;
pub use product::Product;
pub use stock::Stock;

use crate::core::module::{Module, ModuleContext};
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

/// Catalog, cart, checkout and billing for pharmacy customers
pub struct OrderingModule;

impl Module for OrderingModule {
    fn name(&self) -> &str {
        "ordering-service"
    }

    fn entity_types(&self) -> Vec<&str> {
        vec![
            "product",
            "stock",
            "cart",
            "order",
            "invoice_group",
            "discount",
        ]
    }

    fn register_entities(&self, context: &ModuleContext, registry: &mut EntityRegistry) {
        registry.register(Box::new(product::ProductDescriptor::new(Arc::new(
            context.store.clone(),
        ))));
        registry.register(Box::new(stock::StockDescriptor::new(context.clone())));
        registry.register(Box::new(cart::CartDescriptor::new(context.clone())));
        registry.register(Box::new(order::OrderDescriptor::new(context.clone())));
        registry.register(Box::new(invoice_group::InvoiceGroupDescriptor::new(
            context.clone(),
        )));
        registry.register(Box::new(discount::DiscountDescriptor::new(
            context.policy.clone(),
        )));
    }
}
