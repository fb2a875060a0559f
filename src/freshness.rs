//! Freshness tiers and shelf-life assessment.
//!
//! A freshness score in [0, 1] lands in exactly one of five tiers. Each tier
//! carries the price multiplier applied by the pricing engine and the
//! discount it represents from full price. Tiers are closed on the lower
//! edge and open on the upper edge, except the top tier which is closed at 1.0.

use crate::types::FreshnessScore;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// A perfectly fresh product is assumed to keep for two weeks.
pub const MAX_SHELF_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreshnessCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    NotFresh,
}

impl FreshnessCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FreshnessCategory::Excellent => "Excellent",
            FreshnessCategory::Good => "Good",
            FreshnessCategory::Fair => "Fair",
            FreshnessCategory::Poor => "Poor",
            FreshnessCategory::NotFresh => "Not Fresh",
        }
    }
}

impl fmt::Display for FreshnessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessTier {
    pub min_score: Decimal,
    pub multiplier: Decimal,
    pub discount_pct: u32,
    pub category: FreshnessCategory,
}

// 2.0: ordered best to worst. lookup takes the first tier whose floor the score reaches.
pub const FRESHNESS_TIERS: [FreshnessTier; 5] = [
    FreshnessTier {
        min_score: dec!(0.8),
        multiplier: dec!(1.00),
        discount_pct: 0,
        category: FreshnessCategory::Excellent,
    },
    FreshnessTier {
        min_score: dec!(0.6),
        multiplier: dec!(0.85),
        discount_pct: 15,
        category: FreshnessCategory::Good,
    },
    FreshnessTier {
        min_score: dec!(0.4),
        multiplier: dec!(0.65),
        discount_pct: 35,
        category: FreshnessCategory::Fair,
    },
    FreshnessTier {
        min_score: dec!(0.2),
        multiplier: dec!(0.40),
        discount_pct: 60,
        category: FreshnessCategory::Poor,
    },
    FreshnessTier {
        min_score: dec!(0.0),
        multiplier: dec!(0.20),
        discount_pct: 80,
        category: FreshnessCategory::NotFresh,
    },
];

// 2.1: a validated score always has a tier since the last floor is 0.0
pub fn freshness_tier(score: FreshnessScore) -> &'static FreshnessTier {
    FRESHNESS_TIERS
        .iter()
        .find(|tier| score.value() >= tier.min_score)
        .unwrap_or(&FRESHNESS_TIERS[FRESHNESS_TIERS.len() - 1])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessAssessment {
    pub freshness_score: Decimal,
    pub category: FreshnessCategory,
    pub estimated_remaining_days: u32,
}

// 2.2: anything with a nonzero score gets at least one day
pub fn estimated_remaining_days(score: FreshnessScore) -> u32 {
    let days = (score.value() * Decimal::from(MAX_SHELF_DAYS))
        .floor()
        .to_u32()
        .unwrap_or(0);
    if days == 0 && score.value() > Decimal::ZERO {
        1
    } else {
        days
    }
}

pub fn assess_freshness(score: FreshnessScore) -> FreshnessAssessment {
    FreshnessAssessment {
        freshness_score: score.value().round_dp(2),
        category: freshness_tier(score).category,
        estimated_remaining_days: estimated_remaining_days(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: Decimal) -> FreshnessScore {
        FreshnessScore::new(value).unwrap()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(freshness_tier(score(dec!(1.0))).category, FreshnessCategory::Excellent);
        assert_eq!(freshness_tier(score(dec!(0.8))).category, FreshnessCategory::Excellent);
        assert_eq!(freshness_tier(score(dec!(0.79))).category, FreshnessCategory::Good);
        assert_eq!(freshness_tier(score(dec!(0.6))).category, FreshnessCategory::Good);
        assert_eq!(freshness_tier(score(dec!(0.55))).category, FreshnessCategory::Fair);
        assert_eq!(freshness_tier(score(dec!(0.2))).category, FreshnessCategory::Poor);
        assert_eq!(freshness_tier(score(dec!(0.19))).category, FreshnessCategory::NotFresh);
        assert_eq!(freshness_tier(score(dec!(0.0))).category, FreshnessCategory::NotFresh);
    }

    #[test]
    fn tiers_are_ordered_and_positive() {
        for pair in FRESHNESS_TIERS.windows(2) {
            assert!(pair[0].min_score > pair[1].min_score);
            assert!(pair[0].multiplier > pair[1].multiplier);
        }
        assert!(FRESHNESS_TIERS.iter().all(|t| t.multiplier > Decimal::ZERO));
    }

    #[test]
    fn multiplier_matches_discount() {
        for tier in &FRESHNESS_TIERS {
            let expected = Decimal::ONE - Decimal::new(tier.discount_pct as i64, 2);
            assert_eq!(tier.multiplier, expected);
        }
    }

    #[test]
    fn remaining_days() {
        assert_eq!(estimated_remaining_days(score(dec!(1.0))), 14);
        assert_eq!(estimated_remaining_days(score(dec!(0.5))), 7);
        assert_eq!(estimated_remaining_days(score(dec!(0.05))), 1);
        assert_eq!(estimated_remaining_days(score(dec!(0.0))), 0);
    }

    #[test]
    fn assessment_rounds_score() {
        let assessment = assess_freshness(score(dec!(0.876)));
        assert_eq!(assessment.freshness_score, dec!(0.88));
        assert_eq!(assessment.category, FreshnessCategory::Excellent);
        assert_eq!(assessment.estimated_remaining_days, 12);
    }
}
