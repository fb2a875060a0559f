// 5.1: human readable explanation and formula for a priced result.
// explanation lines are always in the same order: overall change, freshness,
// demand, season, recommendation.

use crate::demand::DemandFactor;
use crate::freshness::FreshnessTier;
use crate::season::Season;
use crate::types::multiplier_change_pct;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// demand commentary thresholds on the 1..=10 index
const HIGH_DEMAND_FROM: Decimal = dec!(7);
const LOW_DEMAND_UPTO: Decimal = dec!(3);

pub fn explanation_lines(
    base_price: Decimal,
    suggested_price: Decimal,
    freshness: &FreshnessTier,
    demand: &DemandFactor,
    season: Season,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(5);

    let difference = suggested_price - base_price;
    let change_pct = (difference.abs() / base_price * dec!(100)).round_dp(1);
    if difference > Decimal::ZERO {
        lines.push(format!(
            "Price increased by ${:.2} (+{:.1}%)",
            difference, change_pct
        ));
    } else if difference < Decimal::ZERO {
        lines.push(format!(
            "Price reduced by ${:.2} (-{:.1}%)",
            difference.abs(),
            change_pct
        ));
    } else {
        lines.push("Price remains unchanged".to_string());
    }

    lines.push(format!(
        "Freshness: {} - {}% off base price",
        freshness.category, freshness.discount_pct
    ));

    let index = demand.index.value();
    if index >= HIGH_DEMAND_FROM {
        lines.push(format!(
            "High demand ({}) justifies price premium",
            demand.level
        ));
    } else if index <= LOW_DEMAND_UPTO {
        lines.push(format!(
            "Low demand ({}) requires competitive pricing",
            demand.level
        ));
    } else {
        lines.push(format!(
            "Moderate demand ({}) - balanced pricing",
            demand.level
        ));
    }

    let seasonal_pct = multiplier_change_pct(season.multiplier());
    if seasonal_pct > Decimal::ZERO {
        lines.push(format!(
            "Peak season ({}) enables {:.1}% markup",
            season, seasonal_pct
        ));
    } else if seasonal_pct < Decimal::ZERO {
        lines.push(format!(
            "Off-season ({}) requires {:.1}% reduction",
            season,
            seasonal_pct.abs()
        ));
    } else {
        lines.push(format!("Normal season ({}) - no seasonal adjustment", season));
    }

    lines.push(format!("Recommended selling price: ${:.2}", suggested_price));
    lines
}

pub fn calculation_formula(
    base_price: Decimal,
    freshness_mult: Decimal,
    demand_mult: Decimal,
    seasonal_mult: Decimal,
    suggested_price: Decimal,
) -> String {
    format!(
        "Suggested Price = {} × {} (freshness) × {} (demand) × {} (seasonal) = {:.2}",
        base_price.normalize(),
        freshness_mult.normalize(),
        demand_mult.normalize(),
        seasonal_mult.normalize(),
        suggested_price
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::demand_factor;
    use crate::freshness::freshness_tier;
    use crate::types::{DemandIndex, FreshnessScore};

    fn lines_for(
        base: Decimal,
        suggested: Decimal,
        score: Decimal,
        index: Decimal,
        season: Season,
    ) -> Vec<String> {
        let tier = freshness_tier(FreshnessScore::new(score).unwrap());
        let demand = demand_factor(DemandIndex::new(index).unwrap());
        explanation_lines(base, suggested, tier, &demand, season)
    }

    #[test]
    fn increase_explanation() {
        let lines = lines_for(dec!(100), dec!(159.96), dec!(0.85), dec!(7), Season::High);
        assert_eq!(
            lines,
            vec![
                "Price increased by $59.96 (+60.0%)",
                "Freshness: Excellent - 0% off base price",
                "High demand (High) justifies price premium",
                "Peak season (high) enables 20.0% markup",
                "Recommended selling price: $159.96",
            ]
        );
    }

    #[test]
    fn reduction_explanation() {
        let lines = lines_for(dec!(100), dec!(54.56), dec!(0.72), dec!(4), Season::Low);
        assert_eq!(lines[0], "Price reduced by $45.44 (-45.4%)");
        assert_eq!(lines[1], "Freshness: Good - 15% off base price");
        assert_eq!(lines[2], "Moderate demand (Normal) - balanced pricing");
        assert_eq!(lines[3], "Off-season (low) requires 30.0% reduction");
        assert_eq!(lines[4], "Recommended selling price: $54.56");
    }

    #[test]
    fn unchanged_explanation() {
        let lines = lines_for(dec!(20), dec!(20), dec!(1.0), dec!(5), Season::Normal);
        assert_eq!(lines[0], "Price remains unchanged");
        assert_eq!(lines[3], "Normal season (normal) - no seasonal adjustment");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn low_demand_commentary() {
        let lines = lines_for(dec!(50), dec!(32.49), dec!(0.55), dec!(3), Season::High);
        assert_eq!(lines[2], "Low demand (Low) requires competitive pricing");
    }

    #[test]
    fn fractional_demand_commentary() {
        let lines = lines_for(dec!(50), dec!(50), dec!(0.9), dec!(6.5), Season::Normal);
        assert_eq!(lines[2], "Moderate demand (High) - balanced pricing");
        let lines = lines_for(dec!(50), dec!(50), dec!(0.9), dec!(3.5), Season::Normal);
        assert_eq!(lines[2], "Moderate demand (Low) - balanced pricing");
    }

    #[test]
    fn formula_shows_literal_arithmetic() {
        let formula = calculation_formula(dec!(100), dec!(0.85), dec!(1.333), dec!(1.2), dec!(135.97));
        assert_eq!(
            formula,
            "Suggested Price = 100 × 0.85 (freshness) × 1.333 (demand) × 1.2 (seasonal) = 135.97"
        );

        let formula = calculation_formula(dec!(50.00), dec!(1.00), dec!(1.25), dec!(1.2), dec!(75));
        assert_eq!(
            formula,
            "Suggested Price = 50 × 1 (freshness) × 1.25 (demand) × 1.2 (seasonal) = 75.00"
        );
    }
}
