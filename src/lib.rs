//! # omis
//!
//! Order capture for a multi-tenant pharmacy distribution service: catalog
//! and stock, carts resolved against order rules, checkout into regular and
//! pre-orders, order lifecycle with returns, and invoice groups with
//! settlements.
//!
//! ## Rules
//!
//! - **Order quantity resolution** ([`core::quantity`]): minimum order
//!   quantity, per-day customer limits and the order mode decide how much of
//!   a request is served today and how much is queued for tomorrow.
//! - **Tiered discounts** ([`core::discount`]): the cart total picks the
//!   highest tier it reaches.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use omis::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(OmisConfig::from_yaml_file("omis.yaml")?)
//!     .register_module(OrderingModule)
//!     .build()?;
//! ```
//!
//! Every `/api/v1` request carries its tenant in `X-Organization-Id`.

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy},
        discount::{DiscountBreakdown, DiscountSchedule, DiscountTier},
        entity::Entity,
        error::{OmisError, OmisResult},
        events::{EventBus, EventEnvelope, OrderEvent, run_notification_worker},
        module::{Module, ModuleContext},
        policy::OrderingPolicy,
        quantity::{Adjustment, OrderMode, QuantityRequest, QuantityResolution},
        query::{PaginatedResponse, QueryParams},
        service::DataService,
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Entities ===
    pub use crate::entities::{
        Cart, InvoiceGroup, Order, OrderingModule, Product, Stock,
        order::{OrderKind, OrderStatus},
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::OmisConfig;

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
