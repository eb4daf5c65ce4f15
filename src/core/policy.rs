//! Runtime ordering policy built from configuration

use crate::config::OmisConfig;
use crate::core::discount::DiscountSchedule;
use crate::core::error::ConfigError;
use crate::core::quantity::{OrderMode, QuantityRequest, QuantityResolution};

/// Validated rules the cart and checkout apply
#[derive(Debug, Clone)]
pub struct OrderingPolicy {
    pub order_mode: OrderMode,
    pub default_daily_limit: Option<u32>,
    pub discounts: DiscountSchedule,
}

impl OrderingPolicy {
    pub fn from_config(config: &OmisConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            order_mode: config.ordering.order_mode,
            default_daily_limit: config.ordering.default_daily_limit,
            discounts: config.discount_schedule()?,
        })
    }

    /// Resolve a request for a stock line
    ///
    /// `stock_daily_limit` overrides the configured default when set.
    pub fn resolve(
        &self,
        requested: u32,
        minimum_order_quantity: u32,
        orderable_stock: u32,
        stock_daily_limit: Option<u32>,
        ordered_today: u32,
    ) -> QuantityResolution {
        QuantityRequest::new(requested, self.order_mode)
            .minimum_order_quantity(minimum_order_quantity)
            .orderable_stock(orderable_stock)
            .daily_limit(stock_daily_limit.or(self.default_daily_limit), ordered_today)
            .resolve()
    }
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        Self {
            order_mode: OrderMode::default(),
            default_daily_limit: None,
            discounts: DiscountSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_limit_overrides_default() {
        let policy = OrderingPolicy {
            order_mode: OrderMode::Open,
            default_daily_limit: Some(100),
            discounts: DiscountSchedule::default(),
        };
        assert_eq!(policy.resolve(50, 1, 0, Some(20), 0).regular, 20);
        assert_eq!(policy.resolve(50, 1, 0, None, 0).regular, 50);
        assert_eq!(policy.resolve(150, 1, 0, None, 0).regular, 100);
    }

    #[test]
    fn test_from_default_config() {
        let policy = OrderingPolicy::from_config(&OmisConfig::default_config()).unwrap();
        assert_eq!(policy.order_mode, OrderMode::StockAndNextDay);
        assert_eq!(policy.discounts.tiers().len(), 6);
    }
}
