//! Storage backends

pub mod in_memory;

pub use in_memory::{DailyOrderLedger, InMemoryStore, StoreState, Table};
