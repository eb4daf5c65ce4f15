//! Stock entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::StockDescriptor;
pub use model::{CreateStock, Stock, StockAdjustment, StockStatus, UpdateStock};
pub use service::StockService;
