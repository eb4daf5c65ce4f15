//! Invoice grouping and settlement

use super::model::{InvoiceGroup, InvoiceGroupView, PaymentStatus, Settlement};
use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::discount::round_money;
use crate::core::entity::Entity;
use crate::core::error::{OmisError, OmisResult};
use crate::core::events::{EventBus, OrderEvent};
use crate::entities::order::Order;
use crate::storage::{InMemoryStore, StoreState};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

/// Recompute a group's totals and payment status from its member orders
pub fn recompute_group(state: &mut StoreState, group_id: &Uuid) {
    let Some(order_ids) = state.invoice_groups.get(group_id).map(|g| g.order_ids.clone()) else {
        return;
    };
    let (sub_total, discount_amount, total_amount, returned_amount) = order_ids
        .iter()
        .filter_map(|id| state.orders.get(id))
        .fold((0.0, 0.0, 0.0, 0.0), |(sub, discount, total, returned), o| {
            (
                sub + o.sub_total,
                discount + o.discount_amount,
                total + o.grand_total,
                returned + o.return_amount,
            )
        });

    if let Some(group) = state.invoice_groups.get_mut(group_id) {
        group.sub_total = round_money(sub_total);
        group.discount_amount = round_money(discount_amount);
        group.total_amount = round_money(total_amount);
        group.returned_amount = round_money(returned_amount);
        group.refresh_status();
    }
}

/// Take a voided order out of its invoice group
///
/// Refused when the group has already collected more than the orders left
/// in it are worth. A group left without orders is soft-deleted.
pub fn detach_order(state: &mut StoreState, order: &Order) -> OmisResult<()> {
    let Some(group_id) = order.invoice_group_id else {
        return Ok(());
    };
    let group = state
        .invoice_groups
        .get(&group_id)
        .ok_or_else(|| OmisError::not_found(InvoiceGroup::resource_name_singular(), group_id))?;

    let remaining: f64 = group
        .order_ids
        .iter()
        .filter(|id| **id != order.id)
        .filter_map(|id| state.orders.get(id))
        .map(Order::net_total)
        .sum();
    if group.paid_amount > round_money(remaining) {
        tracing::warn!(
            order_id = %order.id,
            invoice_group_id = %group_id,
            paid_amount = group.paid_amount,
            remaining,
            "void refused, order already paid for"
        );
        return Err(OmisError::field(
            "status",
            format!(
                "order {} is already paid for in its invoice group",
                order.order_number
            ),
        ));
    }

    if let Some(group) = state.invoice_groups.get_mut(&group_id) {
        group.order_ids.retain(|id| *id != order.id);
        if group.order_ids.is_empty() {
            group.soft_delete();
        }
    }
    if let Some(stored) = state.orders.get_mut(&order.id) {
        stored.invoice_group_id = None;
        stored.touch();
    }
    recompute_group(state, &group_id);

    tracing::info!(
        order_id = %order.id,
        invoice_group_id = %group_id,
        "order removed from invoice group"
    );
    Ok(())
}

#[derive(Debug, Clone)]
pub struct InvoiceService {
    store: InMemoryStore,
    events: EventBus,
}

impl InvoiceService {
    pub fn new(store: InMemoryStore, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Group a tenant's orders for delivery and billing
    pub fn create(&self, auth: &AuthContext, order_ids: Vec<Uuid>) -> OmisResult<InvoiceGroupView> {
        let unique: HashSet<Uuid> = order_ids.iter().copied().collect();
        if unique.len() != order_ids.len() {
            return Err(OmisError::field("order_ids", "order ids must be unique"));
        }

        let group = self.store.transaction(|state| {
            let mut sub_total = 0.0;
            let mut discount_amount = 0.0;
            let mut total_amount = 0.0;
            let mut returned_amount = 0.0;

            for id in &order_ids {
                let order = state
                    .orders
                    .get(id)
                    .filter(|o| !o.is_deleted() && o.belongs_to(&auth.organization_id))
                    .ok_or_else(|| {
                        OmisError::field("order_ids", format!("order {} not found", id))
                    })?;
                if order.status.is_void() {
                    return Err(OmisError::field(
                        "order_ids",
                        format!("order {} is {}", order.order_number, order.status),
                    ));
                }
                if order.invoice_group_id.is_some() {
                    return Err(OmisError::field(
                        "order_ids",
                        format!("order {} is already grouped", order.order_number),
                    ));
                }
                sub_total += order.sub_total;
                discount_amount += order.discount_amount;
                total_amount += order.grand_total;
                returned_amount += order.return_amount;
            }

            let mut group = InvoiceGroup::new(
                auth.organization_id,
                order_ids.clone(),
                round_money(sub_total),
                round_money(discount_amount),
                round_money(total_amount),
                round_money(returned_amount),
                0.0,
                PaymentStatus::Unpaid,
                Vec::new(),
            );
            group.refresh_status();

            for id in &order_ids {
                if let Some(order) = state.orders.get_mut(id) {
                    order.invoice_group_id = Some(group.id);
                    order.touch();
                }
            }
            state.invoice_groups.insert(group.id, group.clone());
            Ok(group)
        })?;

        tracing::info!(
            invoice_group_id = %group.id,
            orders = group.order_ids.len(),
            total_amount = group.total_amount,
            "invoice group created"
        );
        self.events.publish(OrderEvent::InvoiceGroupCreated {
            invoice_group_id: group.id,
            organization_id: group.organization_id,
            total_amount: group.total_amount,
        });
        Ok(group.into())
    }

    pub fn list(&self, auth: &AuthContext) -> OmisResult<Vec<InvoiceGroupView>> {
        self.store.read(|state| {
            state
                .invoice_groups
                .values()
                .filter(|g| !g.is_deleted())
                .filter(|g| auth.is_staff() || g.belongs_to(&auth.organization_id))
                .cloned()
                .map(InvoiceGroupView::from)
                .collect()
        })
    }

    pub fn get(&self, auth: &AuthContext, id: &Uuid) -> OmisResult<InvoiceGroupView> {
        self.store.read(|state| {
            state
                .invoice_groups
                .get(id)
                .filter(|g| !g.is_deleted())
                .filter(|g| auth.is_staff() || g.belongs_to(&auth.organization_id))
                .cloned()
                .map(InvoiceGroupView::from)
                .ok_or_else(|| OmisError::not_found(InvoiceGroup::resource_name_singular(), *id))
        })?
    }

    /// Record a payment received against the group
    pub fn settle(&self, auth: &AuthContext, id: &Uuid, amount: f64) -> OmisResult<InvoiceGroupView> {
        auth.require(&AuthPolicy::Staff)?;

        let group = self.store.transaction(|state| {
            let group = state
                .invoice_groups
                .get_mut(id)
                .filter(|g| !g.is_deleted())
                .ok_or_else(|| OmisError::not_found(InvoiceGroup::resource_name_singular(), *id))?;

            let due = group.due_amount();
            if amount <= 0.0 || round_money(amount) > due {
                tracing::warn!(invoice_group_id = %id, amount, due, "settlement rejected");
                return Err(OmisError::field(
                    "amount",
                    format!("amount must be greater than 0 and at most the due {:.2}", due),
                ));
            }

            group.paid_amount = round_money(group.paid_amount + amount);
            group.settlements.push(Settlement {
                id: Uuid::new_v4(),
                amount: round_money(amount),
                received_by: auth.user_id,
                created_at: Utc::now(),
            });
            group.refresh_status();
            Ok(group.clone())
        })?;

        let due_amount = group.due_amount();
        tracing::info!(
            invoice_group_id = %group.id,
            amount,
            due_amount,
            status = ?group.status,
            "invoice settled"
        );
        self.events.publish(OrderEvent::InvoiceSettled {
            invoice_group_id: group.id,
            organization_id: group.organization_id,
            amount,
            due_amount,
        });
        Ok(group.into())
    }
}
