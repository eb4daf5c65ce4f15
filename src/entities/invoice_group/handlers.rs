//! Invoice group HTTP handlers

use super::model::{CreateInvoiceGroup, InvoiceGroupView, SettleInvoice};
use super::service::InvoiceService;
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

/// InvoiceGroup-specific AppState
#[derive(Clone)]
pub struct InvoiceGroupAppState {
    pub service: InvoiceService,
}

pub async fn create_invoice_group(
    State(state): State<InvoiceGroupAppState>,
    auth: AuthContext,
    Json(payload): Json<CreateInvoiceGroup>,
) -> OmisResult<(StatusCode, Json<InvoiceGroupView>)> {
    payload.validate()?;
    let group = state.service.create(&auth, payload.order_ids)?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn list_invoice_groups(
    State(state): State<InvoiceGroupAppState>,
    auth: AuthContext,
    Query(params): Query<QueryParams>,
) -> OmisResult<Json<PaginatedResponse<InvoiceGroupView>>> {
    let groups = state.service.list(&auth)?;
    Ok(Json(params.apply(groups)))
}

pub async fn get_invoice_group(
    State(state): State<InvoiceGroupAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> OmisResult<Json<InvoiceGroupView>> {
    state.service.get(&auth, &id).map(Json)
}

pub async fn settle_invoice_group(
    State(state): State<InvoiceGroupAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<SettleInvoice>,
) -> OmisResult<Json<InvoiceGroupView>> {
    payload.validate()?;
    state.service.settle(&auth, &id, payload.amount).map(Json)
}
