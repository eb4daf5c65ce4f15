//! Core traits, rule engines and cross-cutting types

pub mod auth;
pub mod discount;
pub mod entity;
pub mod error;
pub mod events;
pub mod module;
pub mod policy;
pub mod quantity;
pub mod query;
pub mod service;

pub use auth::{AuthContext, AuthPolicy};
pub use discount::{DiscountBreakdown, DiscountSchedule, DiscountTier};
pub use entity::Entity;
pub use error::{OmisError, OmisResult};
pub use events::{EventBus, OrderEvent};
pub use module::{Module, ModuleContext};
pub use policy::OrderingPolicy;
pub use quantity::{Adjustment, OrderMode, QuantityRequest, QuantityResolution};
pub use query::{PaginatedResponse, QueryParams, Queryable};
pub use service::DataService;
