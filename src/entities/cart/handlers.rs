//! Cart HTTP handlers
//!
//! The cart is addressed through the caller's tenant, never by id.

use super::model::{CartSummary, SetCartQuantity};
use super::service::CartService;
use crate::core::auth::AuthContext;
use crate::core::error::OmisResult;
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

/// Cart-specific AppState
#[derive(Clone)]
pub struct CartAppState {
    pub service: CartService,
}

pub async fn get_cart(
    State(state): State<CartAppState>,
    auth: AuthContext,
) -> OmisResult<Json<CartSummary>> {
    state.service.summary(&auth).map(Json)
}

pub async fn set_item(
    State(state): State<CartAppState>,
    auth: AuthContext,
    Path(stock_id): Path<Uuid>,
    Json(payload): Json<SetCartQuantity>,
) -> OmisResult<Json<CartSummary>> {
    payload.validate()?;
    state
        .service
        .set_quantity(&auth, &stock_id, payload.quantity)
        .map(Json)
}

pub async fn remove_item(
    State(state): State<CartAppState>,
    auth: AuthContext,
    Path(stock_id): Path<Uuid>,
) -> OmisResult<Json<CartSummary>> {
    state.service.remove_item(&auth, &stock_id).map(Json)
}

pub async fn clear_cart(
    State(state): State<CartAppState>,
    auth: AuthContext,
) -> OmisResult<Json<CartSummary>> {
    state.service.clear(&auth).map(Json)
}
