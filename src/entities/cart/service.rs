//! Cart operations
//!
//! Every quantity a customer puts in the cart goes through the quantity
//! resolver, so the cart always holds what checkout would place.

use super::model::{Cart, CartItem, CartSummary};
use crate::core::auth::AuthContext;
use crate::core::discount::round_money;
use crate::core::entity::Entity;
use crate::core::error::{OmisError, OmisResult, OrderError};
use crate::core::policy::OrderingPolicy;
use crate::entities::stock::Stock;
use crate::storage::{InMemoryStore, StoreState};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Resolve `requested` units of `stock` for `customer` into a cart line
pub fn resolve_item(
    state: &StoreState,
    policy: &OrderingPolicy,
    customer: &Uuid,
    stock: &Stock,
    requested: u32,
    today: NaiveDate,
) -> CartItem {
    let ordered_today = state.daily_ledger.ordered(customer, &stock.id, today);
    let resolution = policy.resolve(
        requested,
        stock.minimum_order_quantity,
        stock.orderable_quantity,
        stock.daily_order_limit,
        ordered_today,
    );

    CartItem {
        stock_id: stock.id,
        product_name: stock.product_name.clone(),
        unit_price: stock.unit_price,
        minimum_order_quantity: stock.minimum_order_quantity,
        requested_quantity: requested,
        quantity: resolution.regular,
        pre_order_quantity: resolution.pre_order,
        adjustments: resolution.adjustments,
    }
}

/// Build the client view of a cart, discount included
pub fn summarize(cart: &Cart, policy: &OrderingPolicy) -> OmisResult<CartSummary> {
    let sub_total = cart.sub_total();
    let discount = policy.discounts.calculate(sub_total)?;
    Ok(CartSummary {
        cart_id: cart.id,
        organization_id: cart.organization_id,
        items: cart.items.clone(),
        regular_units: cart.items.iter().map(|i| i.quantity).sum(),
        pre_order_units: cart.items.iter().map(|i| i.pre_order_quantity).sum(),
        sub_total,
        grand_total: round_money(sub_total - discount.discount_amount),
        discount,
    })
}

#[derive(Debug, Clone)]
pub struct CartService {
    store: InMemoryStore,
    policy: Arc<OrderingPolicy>,
}

impl CartService {
    pub fn new(store: InMemoryStore, policy: Arc<OrderingPolicy>) -> Self {
        Self { store, policy }
    }

    pub fn summary(&self, auth: &AuthContext) -> OmisResult<CartSummary> {
        let cart = self.store.read(|state| {
            state
                .carts
                .get(&auth.organization_id)
                .cloned()
                .unwrap_or_else(|| Cart::empty(auth.organization_id))
        })?;
        summarize(&cart, &self.policy)
    }

    /// Set the requested quantity for a stock line; zero removes the line
    pub fn set_quantity(
        &self,
        auth: &AuthContext,
        stock_id: &Uuid,
        quantity: u32,
    ) -> OmisResult<CartSummary> {
        let customer = auth.organization_id;
        let today = Utc::now().date_naive();

        let cart = self.store.transaction(|state| {
            let stock = state
                .stocks
                .get(stock_id)
                .filter(|s| s.is_orderable())
                .ok_or_else(|| OmisError::not_found(Stock::resource_name_singular(), *stock_id))?;

            if quantity == 0 {
                let cart = state.cart_mut(customer);
                cart.remove(stock_id);
                return Ok(cart.clone());
            }

            let item = resolve_item(state, &self.policy, &customer, stock, quantity, today);
            if item.total_quantity() == 0 {
                tracing::warn!(
                    stock_id = %stock_id,
                    requested = quantity,
                    "nothing orderable for cart line"
                );
                return Err(OrderError::NotOrderable {
                    product_name: item.product_name,
                }
                .into());
            }

            tracing::debug!(
                stock_id = %stock_id,
                requested = quantity,
                regular = item.quantity,
                pre_order = item.pre_order_quantity,
                "cart line resolved"
            );
            let cart = state.cart_mut(customer);
            cart.upsert(item);
            Ok(cart.clone())
        })?;

        summarize(&cart, &self.policy)
    }

    pub fn remove_item(&self, auth: &AuthContext, stock_id: &Uuid) -> OmisResult<CartSummary> {
        let cart = self.store.transaction(|state| {
            let cart = state
                .carts
                .get_mut(&auth.organization_id)
                .filter(|c| c.item(stock_id).is_some())
                .ok_or_else(|| OmisError::not_found("cart_item", *stock_id))?;
            cart.remove(stock_id);
            Ok(cart.clone())
        })?;
        summarize(&cart, &self.policy)
    }

    pub fn clear(&self, auth: &AuthContext) -> OmisResult<CartSummary> {
        let cart = self.store.transaction(|state| {
            let cart = state.cart_mut(auth.organization_id);
            cart.clear();
            Ok(cart.clone())
        })?;
        summarize(&cart, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::discount::DiscountSchedule;
    use crate::core::quantity::{Adjustment, OrderMode};
    use crate::entities::stock::StockStatus;

    fn policy(mode: OrderMode) -> Arc<OrderingPolicy> {
        Arc::new(OrderingPolicy {
            order_mode: mode,
            default_daily_limit: None,
            discounts: DiscountSchedule::default(),
        })
    }

    fn seed_stock(store: &InMemoryStore, quantity: u32, moq: u32) -> Stock {
        let stock = Stock::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Monas 10".to_string(),
            20.0,
            moq,
            quantity,
            None,
            StockStatus::Active,
        );
        store
            .transaction(|state| {
                state.stocks.insert(stock.id, stock.clone());
                Ok(())
            })
            .unwrap();
        stock
    }

    #[test]
    fn test_set_quantity_splits_into_pre_order() {
        let store = InMemoryStore::new();
        let stock = seed_stock(&store, 30, 1);
        let service = CartService::new(store, policy(OrderMode::StockAndNextDay));
        let customer = AuthContext::new(Uuid::new_v4());

        let summary = service.set_quantity(&customer, &stock.id, 50).unwrap();
        assert_eq!(summary.regular_units, 30);
        assert_eq!(summary.pre_order_units, 20);
        assert_eq!(summary.sub_total, 1_000.0);
        assert_eq!(summary.discount.discount_percentage, 0.0);
    }

    #[test]
    fn test_quantity_raised_to_moq_is_recorded() {
        let store = InMemoryStore::new();
        let stock = seed_stock(&store, 100, 10);
        let service = CartService::new(store, policy(OrderMode::Stock));
        let customer = AuthContext::new(Uuid::new_v4());

        let summary = service.set_quantity(&customer, &stock.id, 3).unwrap();
        let item = &summary.items[0];
        assert_eq!(item.quantity, 10);
        assert_eq!(item.requested_quantity, 3);
        assert!(matches!(
            item.adjustments[0],
            Adjustment::RaisedToMinimum { from: 3, to: 10 }
        ));
    }

    #[test]
    fn test_out_of_stock_rejected_in_stock_mode() {
        let store = InMemoryStore::new();
        let stock = seed_stock(&store, 0, 1);
        let service = CartService::new(store, policy(OrderMode::Stock));
        let customer = AuthContext::new(Uuid::new_v4());

        let err = service.set_quantity(&customer, &stock.id, 5).unwrap_err();
        assert_eq!(err.error_code(), "NOT_ORDERABLE");
        assert!(service.summary(&customer).unwrap().items.is_empty());
    }

    #[test]
    fn test_zero_removes_and_carts_are_per_tenant() {
        let store = InMemoryStore::new();
        let stock = seed_stock(&store, 10, 1);
        let service = CartService::new(store, policy(OrderMode::Stock));
        let alice = AuthContext::new(Uuid::new_v4());
        let bob = AuthContext::new(Uuid::new_v4());

        service.set_quantity(&alice, &stock.id, 4).unwrap();
        assert!(service.summary(&bob).unwrap().items.is_empty());

        let summary = service.set_quantity(&alice, &stock.id, 0).unwrap();
        assert!(summary.items.is_empty());

        let err = service.remove_item(&alice, &stock.id).unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_unknown_stock_is_not_found() {
        let service = CartService::new(InMemoryStore::new(), policy(OrderMode::Open));
        let customer = AuthContext::new(Uuid::new_v4());
        let err = service
            .set_quantity(&customer, &Uuid::new_v4(), 1)
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }
}
