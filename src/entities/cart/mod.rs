//! Cart entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::CartDescriptor;
pub use model::{Cart, CartItem, CartSummary, SetCartQuantity};
pub use service::CartService;
