//! Order entity model

use crate::core::discount::round_money;
use crate::core::query::{Queryable, numeric_filter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Served from on-hand stock
    Regular,
    /// Queued for the next day
    PreOrder,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderKind::Regular => "regular",
            OrderKind::PreOrder => "pre_order",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    ReadyToDeliver,
    OnTheWay,
    Delivered,
    Completed,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// Allowed lifecycle moves
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Cancelled)
                | (Pending, Rejected)
                | (Accepted, ReadyToDeliver)
                | (Accepted, Cancelled)
                | (ReadyToDeliver, OnTheWay)
                | (OnTheWay, Delivered)
                | (Delivered, Completed)
        )
    }

    /// Cancelled and rejected orders hold no stock and cannot be invoiced
    pub fn is_void(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Rejected)
    }

    pub fn accepts_returns(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::ReadyToDeliver => "ready_to_deliver",
            OrderStatus::OnTheWay => "on_the_way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub stock_id: Uuid,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub returned_quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> f64 {
        round_money(self.quantity as f64 * self.unit_price)
    }

    pub fn returnable(&self) -> u32 {
        self.quantity - self.returned_quantity
    }
}

crate::impl_entity!(Order, "order", "orders", {
    order_number: String,
    kind: OrderKind,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    sub_total: f64,
    /// Tier percentage chosen on the whole cart at checkout
    discount_percentage: f64,
    discount_amount: f64,
    grand_total: f64,
    /// Net value of returned units
    return_amount: f64,
    /// Checkout day; the daily allowance is booked under it
    ordered_on: NaiveDate,
    delivery_date: NaiveDate,
    invoice_group_id: Option<Uuid>,
    placed_by: Option<Uuid>,
});

impl Order {
    /// Grand total after returns
    pub fn net_total(&self) -> f64 {
        round_money(self.grand_total - self.return_amount)
    }

    pub fn line_mut(&mut self, stock_id: &Uuid) -> Option<&mut OrderLine> {
        self.lines.iter_mut().find(|l| l.stock_id == *stock_id)
    }
}

/// Body of `POST /orders/{id}/status`
#[derive(Debug, Deserialize)]
pub struct ChangeStatus {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReturnLine {
    pub stock_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// Body of `POST /orders/{id}/returns`
#[derive(Debug, Deserialize, Validate)]
pub struct ReturnItems {
    #[validate(length(min = 1), nested)]
    pub lines: Vec<ReturnLine>,
}

impl Queryable for Order {
    fn matches(&self, key: &str, value: &Value) -> bool {
        match key {
            "status" => serde_json::to_value(self.status).ok().as_ref() == Some(value),
            "kind" => serde_json::to_value(self.kind).ok().as_ref() == Some(value),
            "order_number" => value.as_str() == Some(self.order_number.as_str()),
            "invoiced" => value.as_bool() == Some(self.invoice_group_id.is_some()),
            _ => numeric_filter(key, "grand_total", self.grand_total, value).unwrap_or(true),
        }
    }

    fn compare(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "created_at" => Some(self.created_at.cmp(&other.created_at)),
            "grand_total" => self.grand_total.partial_cmp(&other.grand_total),
            "order_number" => Some(self.order_number.cmp(&other.order_number)),
            "delivery_date" => Some(self.delivery_date.cmp(&other.delivery_date)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_transition_table() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(OnTheWay.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(Completed));

        assert!(!Delivered.can_transition_to(Pending));
        assert!(!OnTheWay.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Accepted));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ReadyToDeliver).unwrap(),
            serde_json::json!("ready_to_deliver")
        );
        assert_eq!(ReadyToDeliver.to_string(), "ready_to_deliver");
        assert_eq!(OrderKind::PreOrder.to_string(), "pre_order");
    }

    #[test]
    fn test_returns_only_after_delivery() {
        assert!(Delivered.accepts_returns());
        assert!(Completed.accepts_returns());
        assert!(!OnTheWay.accepts_returns());
    }
}
