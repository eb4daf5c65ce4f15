//! Product HTTP handlers

use super::model::{CreateProduct, Product, UpdateProduct};
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

/// Product-specific AppState
#[derive(Clone)]
pub struct ProductAppState {
    pub products: Arc<dyn DataService<Product>>,
}

impl ProductAppState {
    async fn find(&self, id: &Uuid) -> OmisResult<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| OmisError::not_found(Product::resource_name_singular(), *id))
    }
}

/// Catalog listing; unpublished products are only shown to staff
pub async fn list_products(
    State(state): State<ProductAppState>,
    auth: AuthContext,
    Query(params): Query<QueryParams>,
) -> OmisResult<Json<PaginatedResponse<Product>>> {
    let products = state
        .products
        .list()
        .await?
        .into_iter()
        .filter(|p| p.is_published || auth.is_staff())
        .collect();
    Ok(Json(params.apply(products)))
}

pub async fn get_product(
    State(state): State<ProductAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> OmisResult<Json<Product>> {
    let product = state.find(&id).await?;
    if !product.is_published && !auth.is_staff() {
        return Err(OmisError::not_found(Product::resource_name_singular(), id));
    }
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<ProductAppState>,
    auth: AuthContext,
    Json(payload): Json<CreateProduct>,
) -> OmisResult<(StatusCode, Json<Product>)> {
    auth.require(&AuthPolicy::Staff)?;
    payload.validate()?;

    let product = Product::new(
        auth.organization_id,
        payload.name,
        payload.generic_name,
        payload.manufacturer,
        payload.trade_price,
        payload.minimum_order_quantity,
        payload.is_published,
    );
    let product = state.products.create(product).await?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<ProductAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduct>,
) -> OmisResult<Json<Product>> {
    auth.require(&AuthPolicy::Staff)?;
    payload.validate()?;

    let mut product = state.find(&id).await?;
    product.apply(payload);
    let product = state.products.update(&id, product).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<ProductAppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> OmisResult<StatusCode> {
    auth.require(&AuthPolicy::Staff)?;
    state.products.delete(&id).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
