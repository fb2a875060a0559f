//! Core pricing engine: input validation and the dynamic price calculation.

use super::config::EngineConfig;
use super::explain::{calculation_formula, explanation_lines};
use super::results::{FactorBreakdown, PricingError, PricingResult};
use crate::demand::demand_factor;
use crate::freshness::freshness_tier;
use crate::season::Season;
use crate::types::{
    multiplier_change_pct, round_money, DemandIndex, FreshnessScore, InputField, Price,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

/// Validated inputs for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingInputs {
    pub base_price: Price,
    pub freshness: FreshnessScore,
    pub demand: DemandIndex,
    pub season: Season,
    pub season_auto_detected: bool,
}

/// Stateless pricing engine. Holds only configuration, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    pub(crate) config: EngineConfig,
}

impl PricingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Season from the configured calendar for the current month.
    pub fn current_season(&self) -> Season {
        self.config.season_calendar.current_season()
    }

    pub fn resolve_season(&self, season: Option<Season>) -> (Season, bool) {
        match season {
            Some(season) => (season, false),
            None => (self.current_season(), true),
        }
    }

    /// Checks every constraint before any arithmetic runs. Fails on the first
    /// violated field in declaration order.
    pub fn validate_inputs(
        &self,
        base_price: Decimal,
        freshness_score: Decimal,
        demand_index: Decimal,
        season: Option<Season>,
    ) -> Result<PricingInputs, PricingError> {
        let result = self.check_inputs(base_price, freshness_score, demand_index, season);

        if let Err(PricingError::InvalidInput { field, constraint }) = &result {
            warn!(%field, %constraint, "rejected pricing input");
        }
        result
    }

    fn check_inputs(
        &self,
        base_price: Decimal,
        freshness_score: Decimal,
        demand_index: Decimal,
        season: Option<Season>,
    ) -> Result<PricingInputs, PricingError> {
        let base_price = Price::new(base_price).ok_or_else(|| {
            PricingError::invalid(InputField::BasePrice, "must be greater than 0")
        })?;
        let freshness = FreshnessScore::new(freshness_score).ok_or_else(|| {
            PricingError::invalid(InputField::FreshnessScore, "must be between 0 and 1")
        })?;
        let demand = DemandIndex::new(demand_index).ok_or_else(|| {
            PricingError::invalid(InputField::DemandIndex, "must be between 1 and 10")
        })?;
        let (season, season_auto_detected) = self.resolve_season(season);
        Ok(PricingInputs {
            base_price,
            freshness,
            demand,
            season,
            season_auto_detected,
        })
    }

    /// Suggested price = base × freshness × demand × seasonal, rounded to cents.
    pub fn calculate_dynamic_price(
        &self,
        base_price: Decimal,
        freshness_score: Decimal,
        demand_index: Decimal,
        season: Option<Season>,
    ) -> Result<PricingResult, PricingError> {
        let inputs = self.validate_inputs(base_price, freshness_score, demand_index, season)?;
        self.price(&inputs)
    }

    /// Same as [`calculate_dynamic_price`](Self::calculate_dynamic_price) with
    /// the season given as a wire label ("high", "very_high", ...).
    pub fn calculate_dynamic_price_with_label(
        &self,
        base_price: Decimal,
        freshness_score: Decimal,
        demand_index: Decimal,
        season: Option<&str>,
    ) -> Result<PricingResult, PricingError> {
        let season = season.map(parse_season).transpose()?;
        self.calculate_dynamic_price(base_price, freshness_score, demand_index, season)
    }

    pub fn price(&self, inputs: &PricingInputs) -> Result<PricingResult, PricingError> {
        let base = inputs.base_price.value();
        let tier = freshness_tier(inputs.freshness);
        let demand = demand_factor(inputs.demand);
        let seasonal_mult = inputs.season.multiplier();

        let raw = base
            .checked_mul(tier.multiplier)
            .and_then(|v| v.checked_mul(demand.multiplier))
            .and_then(|v| v.checked_mul(seasonal_mult))
            .ok_or_else(|| {
                PricingError::invalid(InputField::BasePrice, "is too large to price")
            })?;

        let suggested_price = round_money(raw);
        let price_difference = suggested_price - base;
        let percentage_change = (price_difference / base * dec!(100)).round_dp(2);
        let final_discount_percentage = if suggested_price < base {
            ((Decimal::ONE - suggested_price / base) * dec!(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let freshness_factor = FactorBreakdown {
            category: tier.category.label().to_string(),
            multiplier: tier.multiplier,
            percentage_change: multiplier_change_pct(tier.multiplier),
            impact: format!(
                "Freshness: {} ({}% discount)",
                tier.category, tier.discount_pct
            ),
        };
        let demand_factor = FactorBreakdown {
            category: demand.level.label().to_string(),
            multiplier: demand.multiplier,
            percentage_change: multiplier_change_pct(demand.multiplier),
            impact: demand.level.impact().to_string(),
        };
        let seasonal_factor = FactorBreakdown {
            category: inputs.season.label().to_string(),
            multiplier: seasonal_mult,
            percentage_change: multiplier_change_pct(seasonal_mult),
            impact: inputs.season.description().to_string(),
        };

        let explanation = explanation_lines(
            base,
            suggested_price,
            tier,
            &demand,
            inputs.season,
        )
        .join("\n");
        let calculation_formula = calculation_formula(
            base,
            tier.multiplier,
            demand.multiplier,
            seasonal_mult,
            suggested_price,
        );

        debug!(
            base_price = %base,
            suggested_price = %suggested_price,
            freshness = %tier.category,
            demand_index = %inputs.demand,
            season = %inputs.season,
            "dynamic price calculated"
        );

        Ok(PricingResult {
            base_price: round_money(base),
            suggested_price,
            price_difference,
            percentage_change,
            final_discount_percentage,
            freshness_score: inputs.freshness.value().round_dp(2),
            demand_index: inputs.demand.value(),
            season: inputs.season,
            season_auto_detected: inputs.season_auto_detected,
            freshness_factor,
            demand_factor,
            seasonal_factor,
            explanation,
            calculation_formula,
        })
    }
}

pub fn parse_season(label: &str) -> Result<Season, PricingError> {
    label.parse::<Season>().map_err(|e| {
        warn!(season = label, "rejected pricing input");
        PricingError::invalid(InputField::Season, e.to_string())
    })
}

/// One-shot calculation with the default configuration.
pub fn calculate_price(
    base_price: Decimal,
    freshness_score: Decimal,
    demand_index: Decimal,
    season: Option<Season>,
) -> Result<PricingResult, PricingError> {
    PricingEngine::default().calculate_dynamic_price(
        base_price,
        freshness_score,
        demand_index,
        season,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PricingEngine {
        PricingEngine::default()
    }

    #[test]
    fn fresh_high_demand_peak_season() {
        let result = engine()
            .calculate_dynamic_price(dec!(50), dec!(0.95), dec!(8), Some(Season::High))
            .unwrap();

        assert_eq!(result.suggested_price, dec!(75.00));
        assert_eq!(result.price_difference, dec!(25.00));
        assert_eq!(result.percentage_change, dec!(50.00));
        assert_eq!(result.final_discount_percentage, Decimal::ZERO);
        assert_eq!(result.freshness_factor.category, "Excellent");
        assert_eq!(result.demand_factor.multiplier, dec!(1.25));
        assert_eq!(result.seasonal_factor.multiplier, dec!(1.2));
        assert!(!result.season_auto_detected);
    }

    #[test]
    fn discount_reported_when_price_drops() {
        let result = engine()
            .calculate_dynamic_price(dec!(100), dec!(0.72), dec!(4), Some(Season::Low))
            .unwrap();

        assert_eq!(result.suggested_price, dec!(54.56));
        assert_eq!(result.price_difference, dec!(-45.44));
        assert_eq!(result.percentage_change, dec!(-45.44));
        assert_eq!(result.final_discount_percentage, dec!(45.44));
        assert_eq!(result.freshness_factor.category, "Good");
        assert_eq!(result.freshness_factor.percentage_change, dec!(-15.0));
    }

    #[test]
    fn neutral_inputs_keep_base_price() {
        let result = engine()
            .calculate_dynamic_price(dec!(42.50), Decimal::ONE, dec!(5), Some(Season::Normal))
            .unwrap();
        assert_eq!(result.suggested_price, dec!(42.50));
        assert_eq!(result.percentage_change, Decimal::ZERO);
    }

    #[test]
    fn rejects_non_positive_base_price() {
        let err = engine()
            .calculate_dynamic_price(Decimal::ZERO, dec!(0.5), dec!(5), None)
            .unwrap_err();
        assert_eq!(err.field(), InputField::BasePrice);

        let err = engine()
            .calculate_dynamic_price(dec!(-10), dec!(0.5), dec!(5), None)
            .unwrap_err();
        assert_eq!(err.field(), InputField::BasePrice);
    }

    #[test]
    fn rejects_out_of_range_freshness() {
        for score in [dec!(-0.1), dec!(1.1), dec!(1.5)] {
            let err = engine()
                .calculate_dynamic_price(dec!(10), score, dec!(5), None)
                .unwrap_err();
            assert_eq!(err.field(), InputField::FreshnessScore);
        }
    }

    #[test]
    fn rejects_out_of_range_demand() {
        for index in [dec!(0), dec!(0.5), dec!(10.5), dec!(11)] {
            let err = engine()
                .calculate_dynamic_price(dec!(10), dec!(0.5), index, None)
                .unwrap_err();
            assert_eq!(err.field(), InputField::DemandIndex);
        }
    }

    #[test]
    fn fractional_demand_is_priced() {
        let result = engine()
            .calculate_dynamic_price(dec!(100), dec!(0.9), dec!(6.5), Some(Season::Normal))
            .unwrap();
        assert_eq!(result.demand_index, dec!(6.5));
        assert_eq!(result.demand_factor.category, "High");
        assert_eq!(result.demand_factor.multiplier, dec!(1.250));
        assert_eq!(result.suggested_price, dec!(125.00));
    }

    #[test]
    fn base_price_checked_before_other_fields() {
        let err = engine()
            .calculate_dynamic_price(Decimal::ZERO, dec!(2), dec!(20), None)
            .unwrap_err();
        assert_eq!(err.field(), InputField::BasePrice);
    }

    #[test]
    fn rejects_unknown_season_label() {
        let err = engine()
            .calculate_dynamic_price_with_label(dec!(10), dec!(0.5), dec!(5), Some("summer"))
            .unwrap_err();
        assert_eq!(err.field(), InputField::Season);
        assert!(err.constraint().contains("summer"));
    }

    #[test]
    fn season_label_is_case_insensitive() {
        let result = engine()
            .calculate_dynamic_price_with_label(dec!(10), dec!(0.9), dec!(5), Some("Very_High"))
            .unwrap();
        assert_eq!(result.season, Season::VeryHigh);
        assert_eq!(result.suggested_price, dec!(13.00));
    }

    #[test]
    fn missing_season_uses_calendar() {
        let engine = engine();
        let result = engine
            .calculate_dynamic_price(dec!(10), dec!(0.9), dec!(5), None)
            .unwrap();
        assert!(result.season_auto_detected);
        assert_eq!(result.season, engine.current_season());
    }

    #[test]
    fn huge_base_price_is_rejected_not_overflowed() {
        let err = engine()
            .calculate_dynamic_price(Decimal::MAX, Decimal::ONE, dec!(10), Some(Season::VeryHigh))
            .unwrap_err();
        assert_eq!(err.field(), InputField::BasePrice);
    }

    #[test]
    fn convenience_wrapper_matches_engine() {
        let direct = engine()
            .calculate_dynamic_price(dec!(100), dec!(0.85), dec!(7), Some(Season::High))
            .unwrap();
        let wrapped = calculate_price(dec!(100), dec!(0.85), dec!(7), Some(Season::High)).unwrap();
        assert_eq!(direct, wrapped);
    }
}
