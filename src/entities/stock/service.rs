//! Stock business operations

use super::model::{CreateStock, Stock, StockAdjustment, StockStatus, UpdateStock};
use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::entity::Entity;
use crate::core::error::{OmisError, OmisResult};
use crate::core::events::{EventBus, OrderEvent};
use crate::entities::product::Product;
use crate::storage::InMemoryStore;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StockService {
    store: InMemoryStore,
    events: EventBus,
}

impl StockService {
    pub fn new(store: InMemoryStore, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Open a stock record for a catalog product
    ///
    /// Price and minimum order quantity default to the product's.
    pub fn create(&self, auth: &AuthContext, payload: CreateStock) -> OmisResult<Stock> {
        auth.require(&AuthPolicy::Staff)?;

        let stock = self.store.transaction(|state| {
            let product = state
                .products
                .get(&payload.product_id)
                .filter(|p| !p.is_deleted())
                .ok_or_else(|| {
                    OmisError::not_found(Product::resource_name_singular(), payload.product_id)
                })?;

            let stock = Stock::new(
                auth.organization_id,
                product.id,
                payload.store_point_id,
                product.name.clone(),
                payload.unit_price.unwrap_or(product.trade_price),
                product.minimum_order_quantity,
                payload.orderable_quantity,
                payload.daily_order_limit,
                StockStatus::Active,
            );
            state.stocks.insert(stock.id, stock.clone());
            Ok(stock)
        })?;

        tracing::info!(
            stock_id = %stock.id,
            product = %stock.product_name,
            orderable_quantity = stock.orderable_quantity,
            "stock created"
        );
        Ok(stock)
    }

    pub fn update(&self, auth: &AuthContext, id: &Uuid, payload: UpdateStock) -> OmisResult<Stock> {
        auth.require(&AuthPolicy::Staff)?;
        self.store.transaction(|state| {
            let stock = state.live_stock_mut(id)?;
            if let Some(price) = payload.unit_price {
                stock.unit_price = price;
            }
            if let Some(limit) = payload.daily_order_limit {
                stock.daily_order_limit = Some(limit);
            }
            if let Some(status) = payload.status {
                stock.status = status;
            }
            stock.touch();
            Ok(stock.clone())
        })
    }

    /// Apply a manual balance correction
    pub fn adjust(
        &self,
        auth: &AuthContext,
        id: &Uuid,
        payload: StockAdjustment,
    ) -> OmisResult<Stock> {
        auth.require(&AuthPolicy::Staff)?;

        let stock = self.store.transaction(|state| {
            let stock = state.live_stock_mut(id)?;
            stock.adjust(payload.delta).map_err(|message| {
                tracing::warn!(stock_id = %id, delta = payload.delta, "stock adjustment rejected");
                OmisError::field("delta", message)
            })?;
            Ok(stock.clone())
        })?;

        tracing::info!(
            stock_id = %stock.id,
            delta = payload.delta,
            reason = %payload.reason,
            orderable_quantity = stock.orderable_quantity,
            "stock adjusted"
        );
        self.events.publish(OrderEvent::StockAdjusted {
            stock_id: stock.id,
            delta: payload.delta,
            orderable_quantity: stock.orderable_quantity,
            reason: payload.reason,
        });
        Ok(stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::ROLE_STAFF;
    use crate::core::service::DataService;

    async fn setup() -> (StockService, AuthContext, Product) {
        let store = InMemoryStore::new();
        let staff = AuthContext::new(Uuid::new_v4()).with_role(ROLE_STAFF);
        let product = Product::new(
            staff.organization_id,
            "Sergel 20".to_string(),
            None,
            "Healthcare".to_string(),
            7.0,
            5,
            true,
        );
        let product = DataService::<Product>::create(&store, product).await.unwrap();
        (StockService::new(store, EventBus::new(16)), staff, product)
    }

    fn create_payload(product_id: Uuid, quantity: u32) -> CreateStock {
        CreateStock {
            product_id,
            store_point_id: Uuid::new_v4(),
            unit_price: None,
            orderable_quantity: quantity,
            daily_order_limit: None,
        }
    }

    #[tokio::test]
    async fn test_create_copies_product_defaults() {
        let (service, staff, product) = setup().await;
        let stock = service.create(&staff, create_payload(product.id, 40)).unwrap();
        assert_eq!(stock.unit_price, 7.0);
        assert_eq!(stock.minimum_order_quantity, 5);
        assert_eq!(stock.product_name, "Sergel 20");
    }

    #[tokio::test]
    async fn test_create_requires_staff_and_live_product() {
        let (service, staff, product) = setup().await;
        let customer = AuthContext::new(Uuid::new_v4());
        let err = service
            .create(&customer, create_payload(product.id, 1))
            .unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");

        let err = service
            .create(&staff, create_payload(Uuid::new_v4(), 1))
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_adjust_publishes_event_and_rejects_negative() {
        let (service, staff, product) = setup().await;
        let mut rx = service.events.subscribe();
        let stock = service.create(&staff, create_payload(product.id, 10)).unwrap();

        let adjusted = service
            .adjust(
                &staff,
                &stock.id,
                StockAdjustment {
                    delta: -4,
                    reason: "damaged strip".to_string(),
                },
            )
            .unwrap();
        assert_eq!(adjusted.orderable_quantity, 6);

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event.name(), "stock_adjusted");

        let err = service
            .adjust(
                &staff,
                &stock.id,
                StockAdjustment {
                    delta: -7,
                    reason: "count".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
