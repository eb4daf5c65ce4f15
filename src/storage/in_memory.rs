//! In-memory storage backend
//!
//! All state sits behind a single `RwLock`. Mutations go through
//! [`InMemoryStore::transaction`], which holds the write lock for the whole
//! operation and mutates the maps in place. Closures run every check that
//! can fail before their first write, so an `Err` leaves the state as it was.

use crate::core::entity::Entity;
use crate::core::error::{EntityError, OmisError, OmisResult, StorageError};
use crate::core::service::DataService;
use crate::entities::cart::Cart;
use crate::entities::invoice_group::InvoiceGroup;
use crate::entities::order::Order;
use crate::entities::product::Product;
use crate::entities::stock::Stock;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Units ordered per customer, per stock, per day
#[derive(Debug, Clone, Default)]
pub struct DailyOrderLedger {
    entries: HashMap<(Uuid, Uuid, NaiveDate), u32>,
}

impl DailyOrderLedger {
    pub fn ordered(&self, customer: &Uuid, stock: &Uuid, day: NaiveDate) -> u32 {
        self.entries
            .get(&(*customer, *stock, day))
            .copied()
            .unwrap_or(0)
    }

    pub fn record(&mut self, customer: Uuid, stock: Uuid, day: NaiveDate, quantity: u32) {
        *self.entries.entry((customer, stock, day)).or_insert(0) += quantity;
    }

    pub fn release(&mut self, customer: Uuid, stock: Uuid, day: NaiveDate, quantity: u32) {
        let key = (customer, stock, day);
        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = entry.saturating_sub(quantity);
            if *entry == 0 {
                self.entries.remove(&key);
            }
        }
    }

    /// Forget every day before `day`; limits only ever look at today
    pub fn prune_before(&mut self, day: NaiveDate) {
        self.entries.retain(|(_, _, d), _| *d >= day);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the service stores
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub products: HashMap<Uuid, Product>,
    pub stocks: HashMap<Uuid, Stock>,
    /// Keyed by customer organization
    pub carts: HashMap<Uuid, Cart>,
    pub orders: HashMap<Uuid, Order>,
    pub invoice_groups: HashMap<Uuid, InvoiceGroup>,
    pub daily_ledger: DailyOrderLedger,
    order_sequence: u64,
}

impl StoreState {
    /// Next human-readable order number
    pub fn next_order_number(&mut self) -> String {
        self.order_sequence += 1;
        format!("ORD-{:06}", self.order_sequence)
    }

    /// Live (not soft-deleted) stock by id
    pub fn live_stock_mut(&mut self, id: &Uuid) -> OmisResult<&mut Stock> {
        self.stocks
            .get_mut(id)
            .filter(|s| !s.is_deleted())
            .ok_or_else(|| OmisError::not_found(Stock::resource_name_singular(), *id))
    }

    /// The customer's cart, created empty on first access
    pub fn cart_mut(&mut self, organization_id: Uuid) -> &mut Cart {
        self.carts
            .entry(organization_id)
            .or_insert_with(|| Cart::empty(organization_id))
    }
}

/// Maps an entity type to its table inside [`StoreState`]
pub trait Table: Entity {
    fn table(state: &StoreState) -> &HashMap<Uuid, Self>;
    fn table_mut(state: &mut StoreState) -> &mut HashMap<Uuid, Self>;
}

macro_rules! impl_table {
    ($type:ty, $field:ident) => {
        impl Table for $type {
            fn table(state: &StoreState) -> &HashMap<Uuid, Self> {
                &state.$field
            }

            fn table_mut(state: &mut StoreState) -> &mut HashMap<Uuid, Self> {
                &mut state.$field
            }
        }
    };
}

impl_table!(Product, products);
impl_table!(Stock, stocks);
impl_table!(Order, orders);
impl_table!(InvoiceGroup, invoice_groups);

/// Shared handle to the in-memory state
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against the state
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> OmisResult<R> {
        let state = self.state.read().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;
        Ok(f(&state))
    }

    /// Run a mutating closure under the write lock
    ///
    /// Nothing else reads or writes while the closure runs. The closure must
    /// validate before it writes: an `Err` returned after a write does not
    /// undo it.
    pub fn transaction<R>(
        &self,
        f: impl FnOnce(&mut StoreState) -> OmisResult<R>,
    ) -> OmisResult<R> {
        let mut state = self.state.write().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;
        f(&mut state)
    }
}

#[async_trait]
impl<T: Table> DataService<T> for InMemoryStore {
    async fn create(&self, entity: T) -> OmisResult<T> {
        self.transaction(|state| {
            let table = T::table_mut(state);
            if table.contains_key(&entity.id()) {
                return Err(EntityError::AlreadyExists {
                    entity_type: T::resource_name_singular().to_string(),
                    id: entity.id(),
                }
                .into());
            }
            table.insert(entity.id(), entity.clone());
            Ok(entity)
        })
    }

    async fn get(&self, id: &Uuid) -> OmisResult<Option<T>> {
        self.read(|state| T::table(state).get(id).filter(|e| !e.is_deleted()).cloned())
    }

    async fn list(&self) -> OmisResult<Vec<T>> {
        self.read(|state| {
            T::table(state)
                .values()
                .filter(|e| !e.is_deleted())
                .cloned()
                .collect()
        })
    }

    async fn update(&self, id: &Uuid, entity: T) -> OmisResult<T> {
        self.transaction(|state| {
            let slot = T::table_mut(state)
                .get_mut(id)
                .filter(|e| !e.is_deleted())
                .ok_or_else(|| OmisError::not_found(T::resource_name_singular(), *id))?;
            *slot = entity.clone();
            Ok(entity)
        })
    }

    async fn delete(&self, id: &Uuid) -> OmisResult<()> {
        self.transaction(|state| {
            let slot = T::table_mut(state)
                .get_mut(id)
                .filter(|e| !e.is_deleted())
                .ok_or_else(|| OmisError::not_found(T::resource_name_singular(), *id))?;
            slot.set_deleted_at(Some(chrono::Utc::now()));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(org: Uuid) -> Product {
        Product::new(
            org,
            "Ace Plus".to_string(),
            Some("Paracetamol + Caffeine".to_string()),
            "Square".to_string(),
            2.5,
            10,
            true,
        )
    }

    #[tokio::test]
    async fn test_create_get_list() {
        let store = InMemoryStore::new();
        let org = Uuid::new_v4();
        let p = DataService::<Product>::create(&store, product(org)).await.unwrap();

        let fetched: Option<Product> = store.get(&p.id).await.unwrap();
        assert_eq!(fetched.unwrap().name, "Ace Plus");

        let all: Vec<Product> = store.list().await.unwrap();
        assert_eq!(all.len(), 1);

        let mine: Vec<Product> = store.list_for(&org).await.unwrap();
        let theirs: Vec<Product> = store.list_for(&Uuid::new_v4()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let store = InMemoryStore::new();
        let p = product(Uuid::new_v4());
        DataService::<Product>::create(&store, p.clone()).await.unwrap();
        let err = DataService::<Product>::create(&store, p).await.unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_entity() {
        let store = InMemoryStore::new();
        let p = DataService::<Product>::create(&store, product(Uuid::new_v4()))
            .await
            .unwrap();

        DataService::<Product>::delete(&store, &p.id).await.unwrap();

        let fetched: Option<Product> = store.get(&p.id).await.unwrap();
        assert!(fetched.is_none());
        let err = DataService::<Product>::delete(&store, &p.id).await.unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
        let raw = store.read(|s| s.products[&p.id].deleted_at).unwrap();
        assert!(raw.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();
        let p = product(Uuid::new_v4());
        let err = DataService::<Product>::update(&store, &p.id, p.clone())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_transaction_writes_in_place() {
        let store = InMemoryStore::new();
        let first = store.transaction(|state| Ok(state.next_order_number())).unwrap();
        let second = store.transaction(|state| Ok(state.next_order_number())).unwrap();
        assert_eq!(first, "ORD-000001");
        assert_eq!(second, "ORD-000002");

        let err = store
            .transaction(|state| {
                state.live_stock_mut(&Uuid::new_v4())?;
                state.next_order_number();
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
        let next = store.transaction(|state| Ok(state.next_order_number())).unwrap();
        assert_eq!(next, "ORD-000003");
    }

    #[test]
    fn test_ledger_record_and_release() {
        let mut ledger = DailyOrderLedger::default();
        let (c, s) = (Uuid::new_v4(), Uuid::new_v4());
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        ledger.record(c, s, day, 5);
        ledger.record(c, s, day, 3);
        assert_eq!(ledger.ordered(&c, &s, day), 8);
        assert_eq!(ledger.ordered(&c, &s, day.succ_opt().unwrap()), 0);

        ledger.release(c, s, day, 10);
        assert_eq!(ledger.ordered(&c, &s, day), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ledger_prunes_past_days() {
        let mut ledger = DailyOrderLedger::default();
        let (c, s) = (Uuid::new_v4(), Uuid::new_v4());
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let today = yesterday.succ_opt().unwrap();

        ledger.record(c, s, yesterday, 4);
        ledger.record(c, s, today, 2);
        ledger.prune_before(today);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.ordered(&c, &s, yesterday), 0);
        assert_eq!(ledger.ordered(&c, &s, today), 2);
    }
}
