//! Order HTTP handlers

use super::model::{ChangeStatus, Order, ReturnItems};
use super::service::OrderService;
use crate::core::auth::AuthContext;
use crate::core::error::OmisResult;
use crate::core::query::{PaginatedResponse, QueryParams};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

/// Order-specific AppState
#[derive(Clone)]
pub struct OrderAppState {
    pub service: OrderService,
}

/// Place the caller's cart; answers with the created orders
pub async fn checkout(
    State(state): State<OrderAppState>,
    auth: AuthContext,
) -> OmisResult<(StatusCode, Json<Vec<Order>>)> {
    let orders = state.service.checkout(&auth)?;
    Ok((StatusCode::CREATED, Json(orders)))
}

pub async fn list_orders(
    State(state): State<OrderAppState>,
    auth: AuthContext,
    Query(params): Query<QueryParams>,
) -> OmisResult<Json<PaginatedResponse<Order>>> {
    let orders = state.service.list(&auth)?;
    Ok(Json(params.apply(orders)))
}

pub async fn get_order(
    State(state): State<OrderAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> OmisResult<Json<Order>> {
    state.service.get(&auth, &id).map(Json)
}

pub async fn change_status(
    State(state): State<OrderAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStatus>,
) -> OmisResult<Json<Order>> {
    state
        .service
        .change_status(&auth, &id, payload.status)
        .map(Json)
}

pub async fn return_items(
    State(state): State<OrderAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReturnItems>,
) -> OmisResult<Json<Order>> {
    payload.validate()?;
    state.service.return_items(&auth, &id, payload).map(Json)
}
