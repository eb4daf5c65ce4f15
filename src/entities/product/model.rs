//! Product entity model

use crate::core::query::{Queryable, numeric_filter};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;
use validator::Validate;

crate::impl_entity!(Product, "product", "products", {
    name: String,
    generic_name: Option<String>,
    manufacturer: String,
    /// Price per unit
    trade_price: f64,
    minimum_order_quantity: u32,
    is_published: bool,
});

/// Body of `POST /products`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 2, max = 200))]
    pub name: String,
    pub generic_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub manufacturer: String,
    #[validate(range(min = 0.0))]
    pub trade_price: f64,
    #[validate(range(min = 1))]
    pub minimum_order_quantity: u32,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

fn published_by_default() -> bool {
    true
}

/// Body of `PUT /products/{id}`; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateProduct {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,
    pub generic_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 0.0))]
    pub trade_price: Option<f64>,
    #[validate(range(min = 1))]
    pub minimum_order_quantity: Option<u32>,
    pub is_published: Option<bool>,
}

impl Product {
    pub fn apply(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(generic_name) = update.generic_name {
            self.generic_name = Some(generic_name);
        }
        if let Some(manufacturer) = update.manufacturer {
            self.manufacturer = manufacturer;
        }
        if let Some(price) = update.trade_price {
            self.trade_price = price;
        }
        if let Some(moq) = update.minimum_order_quantity {
            self.minimum_order_quantity = moq;
        }
        if let Some(published) = update.is_published {
            self.is_published = published;
        }
        self.touch();
    }
}

impl Queryable for Product {
    fn matches(&self, key: &str, value: &Value) -> bool {
        match key {
            "name" => value
                .as_str()
                .is_some_and(|v| self.name.to_lowercase().contains(&v.to_lowercase())),
            "manufacturer" => value.as_str() == Some(self.manufacturer.as_str()),
            "is_published" => value.as_bool() == Some(self.is_published),
            _ => numeric_filter(key, "trade_price", self.trade_price, value).unwrap_or(true),
        }
    }

    fn compare(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "name" => Some(self.name.cmp(&other.name)),
            "trade_price" => self.trade_price.partial_cmp(&other.trade_price),
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            _ => None,
        }
    }
}
