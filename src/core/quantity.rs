//! Order quantity resolution
//!
//! Splits a requested quantity into the part that can be served from stock
//! today (the regular order) and the part that is queued for the next day
//! (the pre-order), according to the distributor's [`OrderMode`].
//!
//! Rules, applied in order:
//!
//! 1. A request of zero resolves to nothing.
//! 2. A request between 1 and the minimum order quantity is raised to the minimum.
//! 3. The quantity is capped by what is left of the daily limit. The cap wins
//!    over the minimum.
//! 4. The capped quantity is split by mode.
//!
//! ```rust,ignore
//! let resolution = QuantityRequest::new(12, OrderMode::StockAndNextDay)
//!     .minimum_order_quantity(5)
//!     .orderable_stock(8)
//!     .resolve();
//!
//! assert_eq!(resolution.regular, 8);
//! assert_eq!(resolution.pre_order, 4);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where orders are allowed to draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    /// Back-ordering allowed: stock balance is ignored
    Open,
    /// Only on-hand stock can be ordered; the rest is dropped
    Stock,
    /// On-hand stock first, the rest is queued for the next day
    #[default]
    StockAndNextDay,
}

impl OrderMode {
    /// Whether placed orders consume the stock balance
    pub fn draws_from_stock(self) -> bool {
        !matches!(self, OrderMode::Open)
    }
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderMode::Open => "open",
            OrderMode::Stock => "stock",
            OrderMode::StockAndNextDay => "stock_and_next_day",
        };
        f.write_str(name)
    }
}

impl FromStr for OrderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(OrderMode::Open),
            "stock" => Ok(OrderMode::Stock),
            "stock_and_next_day" | "next_day" => Ok(OrderMode::StockAndNextDay),
            other => Err(format!("unknown order mode '{}'", other)),
        }
    }
}

/// Why a resolved quantity differs from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    RaisedToMinimum { from: u32, to: u32 },
    CappedByDailyLimit { from: u32, to: u32 },
    LimitedByStock { unfilled: u32 },
    QueuedForNextDay { quantity: u32 },
}

/// Inputs of a single resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityRequest {
    pub requested: u32,
    pub minimum_order_quantity: u32,
    pub orderable_stock: u32,
    pub mode: OrderMode,
    /// Maximum units per customer per day, if any
    pub daily_limit: Option<u32>,
    /// Units this customer already ordered today
    pub ordered_today: u32,
}

impl QuantityRequest {
    pub fn new(requested: u32, mode: OrderMode) -> Self {
        Self {
            requested,
            minimum_order_quantity: 1,
            orderable_stock: 0,
            mode,
            daily_limit: None,
            ordered_today: 0,
        }
    }

    pub fn minimum_order_quantity(mut self, moq: u32) -> Self {
        self.minimum_order_quantity = moq;
        self
    }

    pub fn orderable_stock(mut self, stock: u32) -> Self {
        self.orderable_stock = stock;
        self
    }

    pub fn daily_limit(mut self, limit: Option<u32>, ordered_today: u32) -> Self {
        self.daily_limit = limit;
        self.ordered_today = ordered_today;
        self
    }

    pub fn resolve(&self) -> QuantityResolution {
        resolve(self)
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuantityResolution {
    /// Units served from stock today
    pub regular: u32,
    /// Units queued for the next day
    pub pre_order: u32,
    pub adjustments: Vec<Adjustment>,
}

impl QuantityResolution {
    pub fn total(&self) -> u32 {
        self.regular + self.pre_order
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Resolve a request into regular and pre-order quantities
pub fn resolve(request: &QuantityRequest) -> QuantityResolution {
    let mut resolution = QuantityResolution::default();

    if request.requested == 0 {
        return resolution;
    }

    let moq = request.minimum_order_quantity.max(1);
    let mut quantity = request.requested;

    if quantity < moq {
        resolution.adjustments.push(Adjustment::RaisedToMinimum {
            from: quantity,
            to: moq,
        });
        quantity = moq;
    }

    if let Some(limit) = request.daily_limit {
        let remaining = limit.saturating_sub(request.ordered_today);
        if quantity > remaining {
            resolution.adjustments.push(Adjustment::CappedByDailyLimit {
                from: quantity,
                to: remaining,
            });
            quantity = remaining;
        }
    }

    if quantity == 0 {
        return resolution;
    }

    match request.mode {
        OrderMode::Open => {
            resolution.regular = quantity;
        }
        OrderMode::Stock => {
            resolution.regular = quantity.min(request.orderable_stock);
            let unfilled = quantity - resolution.regular;
            if unfilled > 0 {
                resolution
                    .adjustments
                    .push(Adjustment::LimitedByStock { unfilled });
            }
        }
        OrderMode::StockAndNextDay => {
            resolution.regular = quantity.min(request.orderable_stock);
            resolution.pre_order = quantity - resolution.regular;
            if resolution.pre_order > 0 {
                resolution.adjustments.push(Adjustment::QueuedForNextDay {
                    quantity: resolution.pre_order,
                });
            }
        }
    }

    tracing::debug!(
        requested = request.requested,
        mode = %request.mode,
        regular = resolution.regular,
        pre_order = resolution.pre_order,
        "resolved order quantity"
    );

    resolution
}
