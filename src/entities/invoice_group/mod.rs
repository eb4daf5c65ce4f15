//! Invoice group entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::InvoiceGroupDescriptor;
pub use model::{
    CreateInvoiceGroup, InvoiceGroup, InvoiceGroupView, PaymentStatus, SettleInvoice, Settlement,
};
pub use service::InvoiceService;
