//! Invoice group entity model

use crate::core::discount::round_money;
use crate::core::query::{Queryable, numeric_filter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Uuid,
    pub amount: f64,
    pub received_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

crate::impl_entity!(InvoiceGroup, "invoice_group", "invoice-groups", {
    order_ids: Vec<Uuid>,
    sub_total: f64,
    discount_amount: f64,
    total_amount: f64,
    returned_amount: f64,
    paid_amount: f64,
    status: PaymentStatus,
    settlements: Vec<Settlement>,
});

impl InvoiceGroup {
    /// What the customer still owes
    pub fn due_amount(&self) -> f64 {
        round_money(self.total_amount - self.returned_amount - self.paid_amount).max(0.0)
    }

    /// Recompute the payment status from the amounts
    pub fn refresh_status(&mut self) {
        self.status = if self.due_amount() <= 0.0 {
            PaymentStatus::Paid
        } else if self.paid_amount > 0.0 {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Unpaid
        };
        self.touch();
    }
}

/// Body of `POST /invoice-groups`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceGroup {
    #[validate(length(min = 1, max = 500))]
    pub order_ids: Vec<Uuid>,
}

/// Body of `POST /invoice-groups/{id}/settlements`
#[derive(Debug, Deserialize, Validate)]
pub struct SettleInvoice {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
}

/// Invoice group as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceGroupView {
    #[serde(flatten)]
    pub group: InvoiceGroup,
    pub due_amount: f64,
}

impl From<InvoiceGroup> for InvoiceGroupView {
    fn from(group: InvoiceGroup) -> Self {
        Self {
            due_amount: group.due_amount(),
            group,
        }
    }
}

impl Queryable for InvoiceGroupView {
    fn matches(&self, key: &str, value: &Value) -> bool {
        match key {
            "status" => serde_json::to_value(self.group.status).ok().as_ref() == Some(value),
            _ => numeric_filter(key, "due_amount", self.due_amount, value).unwrap_or(true),
        }
    }

    fn compare(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "created_at" => Some(self.group.created_at.cmp(&other.group.created_at)),
            "total_amount" => self.group.total_amount.partial_cmp(&other.group.total_amount),
            "due_amount" => self.due_amount.partial_cmp(&other.due_amount),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(total: f64) -> InvoiceGroup {
        InvoiceGroup::new(
            Uuid::new_v4(),
            vec![Uuid::new_v4()],
            total,
            0.0,
            total,
            0.0,
            0.0,
            PaymentStatus::Unpaid,
            vec![],
        )
    }

    #[test]
    fn test_due_and_status() {
        let mut g = group(1_000.0);
        assert_eq!(g.due_amount(), 1_000.0);

        g.returned_amount = 100.0;
        g.paid_amount = 400.0;
        g.refresh_status();
        assert_eq!(g.due_amount(), 500.0);
        assert_eq!(g.status, PaymentStatus::PartiallyPaid);

        g.paid_amount = 900.0;
        g.refresh_status();
        assert_eq!(g.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_fully_returned_group_is_paid() {
        let mut g = group(50.0);
        g.returned_amount = 50.0;
        g.refresh_status();
        assert_eq!(g.status, PaymentStatus::Paid);
    }
}
