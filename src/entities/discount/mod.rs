//! Discount schedule routes

pub mod descriptor;
pub mod handlers;

pub use descriptor::DiscountDescriptor;
