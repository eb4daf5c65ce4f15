//! Stock HTTP handlers

use super::model::{CreateStock, Stock, StockAdjustment, UpdateStock};
use super::service::StockService;
use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::entity::Entity;
use crate::core::error::{OmisError, OmisResult};
use crate::core::query::{PaginatedResponse, QueryParams};
use crate::core::service::DataService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Stock-specific AppState
#[derive(Clone)]
pub struct StockAppState {
    pub stocks: Arc<dyn DataService<Stock>>,
    pub service: StockService,
}

pub async fn list_stocks(
    State(state): State<StockAppState>,
    _auth: AuthContext,
    Query(params): Query<QueryParams>,
) -> OmisResult<Json<PaginatedResponse<Stock>>> {
    let stocks = state.stocks.list().await?;
    Ok(Json(params.apply(stocks)))
}

pub async fn get_stock(
    State(state): State<StockAppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> OmisResult<Json<Stock>> {
    state
        .stocks
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| OmisError::not_found(Stock::resource_name_singular(), id))
}

pub async fn create_stock(
    State(state): State<StockAppState>,
    auth: AuthContext,
    Json(payload): Json<CreateStock>,
) -> OmisResult<(StatusCode, Json<Stock>)> {
    payload.validate()?;
    let stock = state.service.create(&auth, payload)?;
    Ok((StatusCode::CREATED, Json(stock)))
}

pub async fn update_stock(
    State(state): State<StockAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStock>,
) -> OmisResult<Json<Stock>> {
    payload.validate()?;
    state.service.update(&auth, &id, payload).map(Json)
}

pub async fn delete_stock(
    State(state): State<StockAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> OmisResult<StatusCode> {
    auth.require(&AuthPolicy::Staff)?;
    state.stocks.delete(&id).await?;
    tracing::info!(stock_id = %id, "stock deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn adjust_stock(
    State(state): State<StockAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustment>,
) -> OmisResult<Json<Stock>> {
    payload.validate()?;
    state.service.adjust(&auth, &id, payload).map(Json)
}
