//! Tiered cart discounts
//!
//! A schedule is a short list of `(minimum_amount, discount_percentage)`
//! tiers sorted by threshold. A total earns the percentage of the highest
//! tier it reaches; the breakdown also tells the customer how much more is
//! needed to reach the next tier.

use crate::core::error::{ConfigError, OmisError, OmisResult};
use serde::{Deserialize, Serialize};

/// Round a money amount to 2 decimals
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// A single discount threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub minimum_amount: f64,
    pub discount_percentage: f64,
}

impl DiscountTier {
    pub fn new(minimum_amount: f64, discount_percentage: f64) -> Self {
        Self {
            minimum_amount,
            discount_percentage,
        }
    }
}

/// The next tier a total could reach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextTier {
    pub minimum_amount: f64,
    pub discount_percentage: f64,
    pub amount_needed: f64,
}

/// Discount computed for a total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub total: f64,
    pub applied_tier: Option<DiscountTier>,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    /// Total minus discount
    pub payable: f64,
    pub next_tier: Option<NextTier>,
}

/// Validated, ascending list of tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountSchedule {
    tiers: Vec<DiscountTier>,
}

impl DiscountSchedule {
    pub fn new(tiers: Vec<DiscountTier>) -> Result<Self, ConfigError> {
        for (index, tier) in tiers.iter().enumerate() {
            if !tier.minimum_amount.is_finite() || tier.minimum_amount < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("discount.tiers[{}].minimum_amount", index),
                    message: "must be a non-negative amount".to_string(),
                });
            }
            if !(0.0..=100.0).contains(&tier.discount_percentage) {
                return Err(ConfigError::InvalidValue {
                    field: format!("discount.tiers[{}].discount_percentage", index),
                    message: "must be between 0 and 100".to_string(),
                });
            }
            if index > 0 && tier.minimum_amount <= tiers[index - 1].minimum_amount {
                return Err(ConfigError::InvalidValue {
                    field: format!("discount.tiers[{}].minimum_amount", index),
                    message: "thresholds must be strictly increasing".to_string(),
                });
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// Default schedule used when the configuration omits one
    pub fn default_tiers() -> Vec<DiscountTier> {
        vec![
            DiscountTier::new(0.0, 0.0),
            DiscountTier::new(5_000.0, 0.5),
            DiscountTier::new(10_000.0, 1.0),
            DiscountTier::new(25_000.0, 1.5),
            DiscountTier::new(50_000.0, 2.0),
            DiscountTier::new(100_000.0, 2.5),
        ]
    }

    pub fn calculate(&self, total: f64) -> OmisResult<DiscountBreakdown> {
        if !total.is_finite() || total < 0.0 {
            return Err(OmisError::field("amount", "must be a non-negative amount"));
        }

        let mut applied: Option<DiscountTier> = None;
        let mut next: Option<DiscountTier> = None;
        for tier in &self.tiers {
            if total >= tier.minimum_amount {
                applied = Some(*tier);
            } else {
                next = Some(*tier);
                break;
            }
        }

        let discount_percentage = applied.map(|t| t.discount_percentage).unwrap_or(0.0);
        let discount_amount = round_money(total * discount_percentage / 100.0);

        Ok(DiscountBreakdown {
            total: round_money(total),
            applied_tier: applied,
            discount_percentage,
            discount_amount,
            payable: round_money(total - discount_amount),
            next_tier: next.map(|tier| NextTier {
                minimum_amount: tier.minimum_amount,
                discount_percentage: tier.discount_percentage,
                amount_needed: round_money(tier.minimum_amount - total),
            }),
        })
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self {
            tiers: Self::default_tiers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> DiscountSchedule {
        DiscountSchedule::default()
    }

    #[test]
    fn test_highest_met_tier_is_applied() {
        let b = schedule().calculate(12_000.0).unwrap();
        assert_eq!(b.discount_percentage, 1.0);
        assert_eq!(b.discount_amount, 120.0);
        assert_eq!(b.payable, 11_880.0);
        assert_eq!(b.applied_tier, Some(DiscountTier::new(10_000.0, 1.0)));
    }

    #[test]
    fn test_next_tier_delta() {
        let b = schedule().calculate(12_000.0).unwrap();
        let next = b.next_tier.expect("a higher tier exists");
        assert_eq!(next.minimum_amount, 25_000.0);
        assert_eq!(next.discount_percentage, 1.5);
        assert_eq!(next.amount_needed, 13_000.0);
    }

    #[test]
    fn test_exact_threshold_counts_as_met() {
        let b = schedule().calculate(5_000.0).unwrap();
        assert_eq!(b.discount_percentage, 0.5);
        assert_eq!(b.discount_amount, 25.0);
    }

    #[test]
    fn test_top_tier_has_no_next() {
        let b = schedule().calculate(250_000.0).unwrap();
        assert_eq!(b.discount_percentage, 2.5);
        assert!(b.next_tier.is_none());
    }

    #[test]
    fn test_below_first_positive_tier() {
        let b = schedule().calculate(1_234.56).unwrap();
        assert_eq!(b.discount_amount, 0.0);
        assert_eq!(b.payable, 1_234.56);
        assert_eq!(b.next_tier.unwrap().amount_needed, 3_765.44);
    }

    #[test]
    fn test_empty_schedule_never_discounts() {
        let s = DiscountSchedule::new(vec![]).unwrap();
        let b = s.calculate(999.0).unwrap();
        assert!(b.applied_tier.is_none());
        assert!(b.next_tier.is_none());
        assert_eq!(b.payable, 999.0);
    }

    #[test]
    fn test_schedule_without_zero_tier() {
        let s = DiscountSchedule::new(vec![DiscountTier::new(100.0, 10.0)]).unwrap();
        let b = s.calculate(50.0).unwrap();
        assert!(b.applied_tier.is_none());
        assert_eq!(b.next_tier.unwrap().amount_needed, 50.0);
    }

    #[test]
    fn test_negative_total_rejected() {
        assert!(schedule().calculate(-1.0).is_err());
        assert!(schedule().calculate(f64::NAN).is_err());
    }

    #[test]
    fn test_unsorted_tiers_rejected() {
        let err = DiscountSchedule::new(vec![
            DiscountTier::new(1_000.0, 1.0),
            DiscountTier::new(500.0, 2.0),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_percentage_out_of_range_rejected() {
        assert!(DiscountSchedule::new(vec![DiscountTier::new(0.0, 120.0)]).is_err());
        assert!(DiscountSchedule::new(vec![DiscountTier::new(-5.0, 1.0)]).is_err());
    }
}
