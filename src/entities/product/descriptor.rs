//! Entity descriptor for Product

use super::handlers::{
    ProductAppState, create_product, delete_product, get_product, list_products, update_product,
};
use super::model::Product;
use crate::core::service::DataService;
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Product entity
pub struct ProductDescriptor {
    pub products: Arc<dyn DataService<Product>>,
}

impl ProductDescriptor {
    pub fn new(products: Arc<dyn DataService<Product>>) -> Self {
        Self { products }
    }
}

impl EntityDescriptor for ProductDescriptor {
    fn entity_type(&self) -> &str {
        "product"
    }

    fn plural(&self) -> &str {
        "products"
    }

    fn build_routes(&self) -> Router {
        let state = ProductAppState {
            products: self.products.clone(),
        };

        Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .with_state(state)
    }
}
