//! Stock entity model

use crate::core::query::{Queryable, numeric_filter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    Active,
    Inactive,
}

crate::impl_entity!(Stock, "stock", "stocks", {
    product_id: Uuid,
    /// Warehouse / hub the units sit in
    store_point_id: Uuid,
    product_name: String,
    unit_price: f64,
    minimum_order_quantity: u32,
    /// Units customers can still order from this stock today
    orderable_quantity: u32,
    /// Units one customer may order per day; the configured default applies when unset
    daily_order_limit: Option<u32>,
    status: StockStatus,
});

impl Stock {
    /// Whether customers can put this stock in a cart
    pub fn is_orderable(&self) -> bool {
        self.status == StockStatus::Active && self.deleted_at.is_none()
    }

    /// Apply a signed delta; fails when the balance would go negative
    pub fn adjust(&mut self, delta: i64) -> Result<u32, String> {
        let next = self.orderable_quantity as i64 + delta;
        if next < 0 {
            return Err(format!(
                "adjustment of {} would leave {} below zero (current {})",
                delta, self.product_name, self.orderable_quantity
            ));
        }
        self.orderable_quantity = u32::try_from(next)
            .map_err(|_| format!("adjustment of {} overflows the balance", delta))?;
        self.touch();
        Ok(self.orderable_quantity)
    }

    /// Put units back on the balance
    pub fn restock(&mut self, quantity: u32) {
        self.orderable_quantity = self.orderable_quantity.saturating_add(quantity);
        self.touch();
    }
}

/// Body of `POST /stocks`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStock {
    pub product_id: Uuid,
    pub store_point_id: Uuid,
    /// Defaults to the product's trade price
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub orderable_quantity: u32,
    #[validate(range(min = 1))]
    pub daily_order_limit: Option<u32>,
}

/// Body of `POST /stocks/{id}/adjustments`
#[derive(Debug, Deserialize, Validate)]
pub struct StockAdjustment {
    pub delta: i64,
    #[validate(length(min = 3, max = 200))]
    pub reason: String,
}

/// Body of `PUT /stocks/{id}`
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateStock {
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
    #[validate(range(min = 1))]
    pub daily_order_limit: Option<u32>,
    pub status: Option<StockStatus>,
}

impl Queryable for Stock {
    fn matches(&self, key: &str, value: &Value) -> bool {
        match key {
            "status" => serde_json::to_value(self.status).ok().as_ref() == Some(value),
            "product_id" => value.as_str() == Some(self.product_id.to_string().as_str()),
            "store_point_id" => value.as_str() == Some(self.store_point_id.to_string().as_str()),
            "product_name" => value
                .as_str()
                .is_some_and(|v| self.product_name.to_lowercase().contains(&v.to_lowercase())),
            _ => numeric_filter(
                key,
                "orderable_quantity",
                self.orderable_quantity as f64,
                value,
            )
            .or_else(|| numeric_filter(key, "unit_price", self.unit_price, value))
            .unwrap_or(true),
        }
    }

    fn compare(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "product_name" => Some(self.product_name.cmp(&other.product_name)),
            "orderable_quantity" => Some(self.orderable_quantity.cmp(&other.orderable_quantity)),
            "unit_price" => self.unit_price.partial_cmp(&other.unit_price),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            _ => None,
        }
    }
}
