//! Cart entity model

use crate::core::discount::{DiscountBreakdown, round_money};
use crate::core::quantity::Adjustment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One stock line in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub stock_id: Uuid,
    pub product_name: String,
    pub unit_price: f64,
    pub minimum_order_quantity: u32,
    /// What the customer asked for
    pub requested_quantity: u32,
    /// Units served from stock today
    pub quantity: u32,
    /// Units queued for the next day
    pub pre_order_quantity: u32,
    pub adjustments: Vec<Adjustment>,
}

impl CartItem {
    pub fn total_quantity(&self) -> u32 {
        self.quantity + self.pre_order_quantity
    }

    pub fn line_total(&self) -> f64 {
        round_money(self.total_quantity() as f64 * self.unit_price)
    }
}

crate::impl_entity!(Cart, "cart", "carts", {
    items: Vec<CartItem>,
});

impl Cart {
    pub fn empty(organization_id: Uuid) -> Self {
        Self::new(organization_id, Vec::new())
    }

    pub fn item(&self, stock_id: &Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.stock_id == *stock_id)
    }

    /// Insert or replace the line for `item.stock_id`
    pub fn upsert(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|i| i.stock_id == item.stock_id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.touch();
    }

    /// Remove a line; returns whether it existed
    pub fn remove(&mut self, stock_id: &Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.stock_id != *stock_id);
        self.touch();
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn sub_total(&self) -> f64 {
        round_money(self.items.iter().map(CartItem::line_total).sum())
    }
}

/// Body of `PUT /cart/items/{stock_id}`
#[derive(Debug, Deserialize, Validate)]
pub struct SetCartQuantity {
    #[validate(range(max = 100_000))]
    pub quantity: u32,
}

/// Cart as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub cart_id: Uuid,
    pub organization_id: Uuid,
    pub items: Vec<CartItem>,
    pub regular_units: u32,
    pub pre_order_units: u32,
    pub sub_total: f64,
    pub discount: DiscountBreakdown,
    pub grand_total: f64,
}
