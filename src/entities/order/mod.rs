//! Order entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::OrderDescriptor;
pub use model::{ChangeStatus, Order, OrderKind, OrderLine, OrderStatus, ReturnItems, ReturnLine};
pub use service::OrderService;
