//! Product entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::ProductDescriptor;
pub use model::{CreateProduct, Product, UpdateProduct};
