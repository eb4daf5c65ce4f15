//! Typed error handling for the ordering service
//!
//! Every failure that can reach an HTTP client is an [`OmisError`]. The
//! top-level enum only groups errors by category; each category knows its
//! HTTP status and a stable machine-readable code.
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups and CRUD on stored entities
//! - [`ValidationError`]: malformed input and violated business bounds
//! - [`OrderError`]: cart, checkout and order lifecycle conflicts
//! - [`RequestError`]: tenant context and permissions
//! - [`ConfigError`]: configuration parsing and validation
//! - [`StorageError`]: storage backend faults
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(&tenant, &id).await {
//!     Err(OmisError::Entity(EntityError::NotFound { id, .. })) => { /* 404 */ }
//!     Err(e) => eprintln!("{}: {}", e.error_code(), e),
//!     Ok(order) => { /* ... */ }
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Result alias used across services and handlers
pub type OmisResult<T> = std::result::Result<T, OmisError>;

/// The main error type of the service
#[derive(Debug, thiserror::Error)]
pub enum OmisError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl OmisError {
    /// Shorthand for a single-field validation failure
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        OmisError::Validation(ValidationError::FieldError {
            field: field.to_string(),
            message: message.into(),
        })
    }

    /// Shorthand for a missing entity
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        OmisError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            OmisError::Entity(e) => e.status_code(),
            OmisError::Validation(_) => StatusCode::BAD_REQUEST,
            OmisError::Order(e) => e.status_code(),
            OmisError::Request(e) => e.status_code(),
            OmisError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OmisError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OmisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OmisError::Entity(e) => e.error_code(),
            OmisError::Validation(_) => "VALIDATION_ERROR",
            OmisError::Order(e) => e.error_code(),
            OmisError::Request(e) => e.error_code(),
            OmisError::Config(_) => "CONFIG_ERROR",
            OmisError::Storage(_) => "STORAGE_ERROR",
            OmisError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            OmisError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            OmisError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({ "fields": { field: [message] } }))
            }
            OmisError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            OmisError::Order(OrderError::CartOutOfDate { stock_ids }) => {
                Some(serde_json::json!({ "stock_ids": stock_ids }))
            }
            OmisError::Order(OrderError::IllegalTransition { from, to, .. }) => {
                Some(serde_json::json!({ "from": from, "to": to }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for OmisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    #[error("{entity_type} with id '{id}' already exists")]
    AlreadyExists { entity_type: String, id: Uuid },

    #[error("Failed to serialize/deserialize {entity_type}: {message}")]
    SerializationError { entity_type: String, message: String },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::SerializationError { .. } => "ENTITY_SERIALIZATION_ERROR",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Validation failed for '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation failed: {}", summarize(.0))]
    FieldErrors(BTreeMap<String, Vec<String>>),

    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

fn summarize(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        use validator::ValidationErrorsKind;

        let fields = errors
            .errors()
            .iter()
            .map(|(field, kind)| {
                let messages = match kind {
                    ValidationErrorsKind::Field(errs) => errs
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect(),
                    ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                        vec!["contains invalid entries".to_string()]
                    }
                };
                (field.to_string(), messages)
            })
            .collect();
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for OmisError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OmisError::Validation(errors.into())
    }
}

// =============================================================================
// Order Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart is out of date for {} item(s); review the cart and retry", .stock_ids.len())]
    CartOutOfDate { stock_ids: Vec<Uuid> },

    #[error("Order {order_id} cannot move from {from} to {to}")]
    IllegalTransition {
        order_id: Uuid,
        from: String,
        to: String,
    },

    #[error("{product_name} is not orderable right now")]
    NotOrderable { product_name: String },
}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::EmptyCart => StatusCode::BAD_REQUEST,
            OrderError::CartOutOfDate { .. } => StatusCode::CONFLICT,
            OrderError::IllegalTransition { .. } => StatusCode::BAD_REQUEST,
            OrderError::NotOrderable { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::EmptyCart => "EMPTY_CART",
            OrderError::CartOutOfDate { .. } => "CART_OUT_OF_DATE",
            OrderError::IllegalTransition { .. } => "ILLEGAL_STATUS_TRANSITION",
            OrderError::NotOrderable { .. } => "NOT_ORDERABLE",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid header '{header}': {message}")]
    InvalidHeader { header: String, message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::InvalidHeader { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::InvalidHeader { .. } => "INVALID_HEADER",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    FileNotFound { path: String, message: String },

    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// =============================================================================
// Storage Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}
