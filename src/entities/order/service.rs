//! Checkout and order lifecycle

use super::model::{Order, OrderKind, OrderLine, OrderStatus, ReturnItems};
use crate::core::auth::AuthContext;
use crate::core::discount::round_money;
use crate::core::entity::Entity;
use crate::core::error::{OmisError, OmisResult, OrderError, RequestError};
use crate::core::events::{EventBus, OrderEvent};
use crate::core::policy::OrderingPolicy;
use crate::entities::cart::CartItem;
use crate::entities::cart::service::resolve_item;
use crate::entities::stock::Stock;
use crate::entities::invoice_group::service::{detach_order, recompute_group};
use crate::storage::{InMemoryStore, StoreState};
use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// What a checkout transaction commits
enum CheckoutOutcome {
    Placed(Vec<Order>),
    /// The cart was refreshed; these lines changed
    Stale(Vec<Uuid>),
}

#[derive(Debug, Clone)]
pub struct OrderService {
    store: InMemoryStore,
    policy: Arc<OrderingPolicy>,
    events: EventBus,
}

impl OrderService {
    pub fn new(store: InMemoryStore, policy: Arc<OrderingPolicy>, events: EventBus) -> Self {
        Self {
            store,
            policy,
            events,
        }
    }

    /// Turn the caller's cart into a regular order and/or a pre-order
    ///
    /// Every line is resolved again against current stock and today's
    /// ledger. When anything moved since the cart was filled, the refreshed
    /// cart is saved and the checkout fails with `CART_OUT_OF_DATE`.
    pub fn checkout(&self, auth: &AuthContext) -> OmisResult<Vec<Order>> {
        let today = Utc::now().date_naive();
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| OmisError::Internal("delivery date out of range".to_string()))?;

        let outcome = self.store.transaction(|state| {
            let items = state
                .carts
                .get(&auth.organization_id)
                .map(|c| c.items.clone())
                .unwrap_or_default();
            if items.is_empty() {
                return Err(OrderError::EmptyCart.into());
            }

            let stale = self.refresh_lines(state, auth.organization_id, &items, today);
            if !stale.is_empty() {
                return Ok(CheckoutOutcome::Stale(stale));
            }

            self.place(state, auth, &items, today, tomorrow)
                .map(CheckoutOutcome::Placed)
        })?;

        match outcome {
            CheckoutOutcome::Stale(stock_ids) => {
                tracing::warn!(
                    organization_id = %auth.organization_id,
                    changed = stock_ids.len(),
                    "checkout refused, cart out of date"
                );
                Err(OrderError::CartOutOfDate { stock_ids }.into())
            }
            CheckoutOutcome::Placed(orders) => {
                for order in &orders {
                    tracing::info!(
                        order_id = %order.id,
                        order_number = %order.order_number,
                        kind = %order.kind,
                        grand_total = order.grand_total,
                        "order placed"
                    );
                    self.events.publish(OrderEvent::OrderPlaced {
                        order_id: order.id,
                        organization_id: order.organization_id,
                        order_number: order.order_number.clone(),
                        kind: order.kind.to_string(),
                        grand_total: order.grand_total,
                        delivery_date: order.delivery_date,
                    });
                }
                Ok(orders)
            }
        }
    }

    /// Re-resolve cart lines; returns the stock ids whose line changed
    ///
    /// When any line changed, the cart is rewritten with the fresh lines.
    fn refresh_lines(
        &self,
        state: &mut StoreState,
        customer: Uuid,
        items: &[CartItem],
        today: NaiveDate,
    ) -> Vec<Uuid> {
        let mut stale = Vec::new();
        let mut fresh_items = Vec::with_capacity(items.len());

        for item in items {
            let view: &StoreState = state;
            let fresh = view
                .stocks
                .get(&item.stock_id)
                .filter(|s| s.is_orderable())
                .map(|stock| {
                    resolve_item(
                        view,
                        &self.policy,
                        &customer,
                        stock,
                        item.requested_quantity,
                        today,
                    )
                });

            match fresh {
                Some(fresh)
                    if fresh.quantity == item.quantity
                        && fresh.pre_order_quantity == item.pre_order_quantity
                        && fresh.unit_price == item.unit_price =>
                {
                    fresh_items.push(fresh);
                }
                Some(fresh) => {
                    stale.push(item.stock_id);
                    if fresh.total_quantity() > 0 {
                        fresh_items.push(fresh);
                    }
                }
                None => stale.push(item.stock_id),
            }
        }

        if !stale.is_empty() {
            let cart = state.cart_mut(customer);
            cart.items = fresh_items;
            cart.touch();
        }
        stale
    }

    fn place(
        &self,
        state: &mut StoreState,
        auth: &AuthContext,
        items: &[CartItem],
        today: NaiveDate,
        tomorrow: NaiveDate,
    ) -> OmisResult<Vec<Order>> {
        let cart_total = round_money(items.iter().map(CartItem::line_total).sum());
        let tier = self.policy.discounts.calculate(cart_total)?;

        let regular: Vec<OrderLine> = items
            .iter()
            .filter(|i| i.quantity > 0)
            .map(|i| order_line(i, i.quantity))
            .collect();
        let pre_order: Vec<OrderLine> = items
            .iter()
            .filter(|i| i.pre_order_quantity > 0)
            .map(|i| order_line(i, i.pre_order_quantity))
            .collect();

        let draws_from_stock = self.policy.order_mode.draws_from_stock();
        if draws_from_stock {
            for line in &regular {
                let stock = state
                    .stocks
                    .get(&line.stock_id)
                    .filter(|s| s.is_orderable())
                    .ok_or_else(|| {
                        OmisError::not_found(Stock::resource_name_singular(), line.stock_id)
                    })?;
                if stock.orderable_quantity < line.quantity {
                    return Err(OmisError::field(
                        "quantity",
                        format!(
                            "only {} of {} left",
                            stock.orderable_quantity, line.product_name
                        ),
                    ));
                }
            }
            for line in &regular {
                let stock = state.live_stock_mut(&line.stock_id)?;
                stock
                    .adjust(-(line.quantity as i64))
                    .map_err(|message| OmisError::field("quantity", message))?;
            }
        }

        state.daily_ledger.prune_before(today);
        for item in items {
            state.daily_ledger.record(
                auth.organization_id,
                item.stock_id,
                today,
                item.total_quantity(),
            );
        }

        let mut orders = Vec::new();
        for (kind, lines, delivery_date) in [
            (OrderKind::Regular, regular, today),
            (OrderKind::PreOrder, pre_order, tomorrow),
        ] {
            if lines.is_empty() {
                continue;
            }
            let sub_total = round_money(lines.iter().map(OrderLine::line_total).sum());
            let discount_amount = round_money(sub_total * tier.discount_percentage / 100.0);
            let order = Order::new(
                auth.organization_id,
                state.next_order_number(),
                kind,
                OrderStatus::Pending,
                lines,
                sub_total,
                tier.discount_percentage,
                discount_amount,
                round_money(sub_total - discount_amount),
                0.0,
                today,
                delivery_date,
                None,
                auth.user_id,
            );
            state.orders.insert(order.id, order.clone());
            orders.push(order);
        }

        state.cart_mut(auth.organization_id).clear();
        Ok(orders)
    }

    /// Orders visible to the caller; staff see every tenant's
    pub fn list(&self, auth: &AuthContext) -> OmisResult<Vec<Order>> {
        self.store.read(|state| {
            state
                .orders
                .values()
                .filter(|o| !o.is_deleted())
                .filter(|o| auth.is_staff() || o.belongs_to(&auth.organization_id))
                .cloned()
                .collect()
        })
    }

    pub fn get(&self, auth: &AuthContext, id: &Uuid) -> OmisResult<Order> {
        self.store
            .read(|state| visible_order(state, auth, id).cloned())?
    }

    /// Move an order through its lifecycle
    pub fn change_status(
        &self,
        auth: &AuthContext,
        id: &Uuid,
        next: OrderStatus,
    ) -> OmisResult<Order> {
        let draws_from_stock = self.policy.order_mode.draws_from_stock();

        let (order, previous) = self.store.transaction(|state| {
            let order = visible_order(state, auth, id)?.clone();
            let previous = order.status;

            let self_cancel = next == OrderStatus::Cancelled && previous == OrderStatus::Pending;
            if !auth.is_staff() && !self_cancel {
                return Err(RequestError::Forbidden {
                    message: "customers may only cancel their own pending orders".to_string(),
                }
                .into());
            }
            if !previous.can_transition_to(next) {
                return Err(OrderError::IllegalTransition {
                    order_id: order.id,
                    from: previous.to_string(),
                    to: next.to_string(),
                }
                .into());
            }

            if next.is_void() {
                detach_order(state, &order)?;
                release_order(state, &order, draws_from_stock);
            }

            let stored = state
                .orders
                .get_mut(id)
                .ok_or_else(|| OmisError::not_found(Order::resource_name_singular(), *id))?;
            stored.status = next;
            stored.touch();
            Ok((stored.clone(), previous))
        })?;

        tracing::info!(
            order_id = %order.id,
            from = %previous,
            to = %next,
            "order status changed"
        );
        self.events.publish(OrderEvent::OrderStatusChanged {
            order_id: order.id,
            organization_id: order.organization_id,
            from: previous.to_string(),
            to: next.to_string(),
        });
        Ok(order)
    }

    /// Take back delivered units
    pub fn return_items(
        &self,
        auth: &AuthContext,
        id: &Uuid,
        payload: ReturnItems,
    ) -> OmisResult<Order> {
        let draws_from_stock = self.policy.order_mode.draws_from_stock();

        let (order, amount) = self.store.transaction(|state| {
            let mut order = visible_order(state, auth, id)?.clone();
            if !order.status.accepts_returns() {
                return Err(OmisError::field(
                    "status",
                    format!("returns are not accepted for {} orders", order.status),
                ));
            }

            let keep = 1.0 - order.discount_percentage / 100.0;
            let mut amount = 0.0;
            for requested in &payload.lines {
                let line = order.line_mut(&requested.stock_id).ok_or_else(|| {
                    OmisError::field(
                        "lines",
                        format!("stock {} is not part of this order", requested.stock_id),
                    )
                })?;
                if requested.quantity > line.returnable() {
                    tracing::warn!(
                        order_id = %id,
                        stock_id = %requested.stock_id,
                        requested = requested.quantity,
                        returnable = line.returnable(),
                        "return exceeds purchased quantity"
                    );
                    return Err(OmisError::field(
                        "quantity",
                        format!(
                            "cannot return {} of {}; only {} returnable",
                            requested.quantity,
                            line.product_name,
                            line.returnable()
                        ),
                    ));
                }
                line.returned_quantity += requested.quantity;
                amount += requested.quantity as f64 * line.unit_price * keep;
            }

            if draws_from_stock {
                for requested in &payload.lines {
                    if let Some(stock) = state.stocks.get_mut(&requested.stock_id) {
                        stock.restock(requested.quantity);
                    }
                }
            }

            let amount = round_money(amount);
            order.return_amount = round_money(order.return_amount + amount);
            order.touch();
            state.orders.insert(order.id, order.clone());

            if let Some(group_id) = order.invoice_group_id {
                recompute_group(state, &group_id);
            }
            Ok((order, amount))
        })?;

        tracing::info!(order_id = %order.id, amount, "items returned");
        self.events.publish(OrderEvent::ItemsReturned {
            order_id: order.id,
            organization_id: order.organization_id,
            amount,
        });
        Ok(order)
    }
}

fn order_line(item: &CartItem, quantity: u32) -> OrderLine {
    OrderLine {
        stock_id: item.stock_id,
        product_name: item.product_name.clone(),
        unit_price: item.unit_price,
        quantity,
        returned_quantity: 0,
    }
}

/// Live order the caller may see; other tenants' orders are reported missing
fn visible_order<'a>(state: &'a StoreState, auth: &AuthContext, id: &Uuid) -> OmisResult<&'a Order> {
    state
        .orders
        .get(id)
        .filter(|o| !o.is_deleted())
        .filter(|o| auth.is_staff() || o.belongs_to(&auth.organization_id))
        .ok_or_else(|| OmisError::not_found(Order::resource_name_singular(), *id))
}

/// Give back what a voided order held: stock for regular lines, allowance for all
fn release_order(state: &mut StoreState, order: &Order, draws_from_stock: bool) {
    for line in &order.lines {
        if draws_from_stock
            && order.kind == OrderKind::Regular
            && let Some(stock) = state.stocks.get_mut(&line.stock_id)
        {
            stock.restock(line.quantity);
        }
        state.daily_ledger.release(
            order.organization_id,
            line.stock_id,
            order.ordered_on,
            line.quantity,
        );
    }
}
