//! Discount schedule HTTP handlers

use crate::core::auth::AuthContext;
use crate::core::discount::{DiscountBreakdown, DiscountTier};
use crate::core::error::OmisResult;
use crate::core::policy::OrderingPolicy;
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct DiscountAppState {
    pub policy: Arc<OrderingPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub amount: f64,
}

pub async fn list_tiers(
    State(state): State<DiscountAppState>,
    _auth: AuthContext,
) -> Json<Vec<DiscountTier>> {
    Json(state.policy.discounts.tiers().to_vec())
}

/// Discount a purchase of `amount` would get, and what the next tier needs
pub async fn quote(
    State(state): State<DiscountAppState>,
    _auth: AuthContext,
    Query(params): Query<QuoteParams>,
) -> OmisResult<Json<DiscountBreakdown>> {
    state.policy.discounts.calculate(params.amount).map(Json)
}
