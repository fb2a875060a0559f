//! Price range operations around a suggested price.

use super::core::PricingEngine;
use super::results::{PriceRange, PriceRangeResult, PricingError, PricingResult};
use crate::season::Season;
use crate::types::{round_money, InputField, Variance};
use rust_decimal::Decimal;

impl PricingEngine {
    /// Checks a caller supplied variance against the configured bounds.
    /// `None` picks the configured default.
    pub fn variance(&self, variance: Option<Decimal>) -> Result<Variance, PricingError> {
        let value = variance.unwrap_or(self.config.default_variance);
        Variance::new(value, self.config.max_variance).ok_or_else(|| {
            PricingError::invalid(
                InputField::Variance,
                format!(
                    "must be greater than 0 and at most {}",
                    self.config.max_variance.normalize()
                ),
            )
        })
    }

    /// Central price plus a ± variance band.
    pub fn calculate_price_range(
        &self,
        base_price: Decimal,
        freshness_score: Decimal,
        demand_index: Decimal,
        season: Option<Season>,
        variance: Option<Decimal>,
    ) -> Result<PriceRangeResult, PricingError> {
        let inputs = self.validate_inputs(base_price, freshness_score, demand_index, season)?;
        let variance = self.variance(variance)?;
        let full_calculation = self.price(&inputs)?;
        let range = price_range(&full_calculation, variance)?;

        Ok(PriceRangeResult {
            range,
            full_calculation,
        })
    }
}

pub fn price_range(result: &PricingResult, variance: Variance) -> Result<PriceRange, PricingError> {
    let suggested = result.suggested_price;
    let spread = suggested.checked_mul(variance.value()).ok_or_else(|| {
        PricingError::invalid(InputField::BasePrice, "is too large to price")
    })?;
    let minimum_price = round_money(suggested - spread);
    let maximum_price = suggested
        .checked_add(spread)
        .map(round_money)
        .ok_or_else(|| PricingError::invalid(InputField::BasePrice, "is too large to price"))?;

    Ok(PriceRange {
        minimum_price,
        suggested_price: suggested,
        maximum_price,
        variance_percentage: round_money(variance.as_percentage()),
        insights: vec![
            format!("Competitive price: ${:.2}", minimum_price),
            format!("Suggested price: ${:.2}", suggested),
            format!("Premium price: ${:.2}", maximum_price),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn range_around_suggested_price() {
        let engine = PricingEngine::default();
        let result = engine
            .calculate_price_range(dec!(75), dec!(0.65), dec!(5), Some(Season::Moderate), Some(dec!(0.1)))
            .unwrap();

        assert_eq!(result.range.suggested_price, dec!(60.56));
        assert_eq!(result.range.minimum_price, dec!(54.50));
        assert_eq!(result.range.maximum_price, dec!(66.62));
        assert_eq!(result.range.variance_percentage, dec!(10));
        assert_eq!(result.full_calculation.suggested_price, dec!(60.56));
        assert_eq!(
            result.range.insights,
            vec![
                "Competitive price: $54.50",
                "Suggested price: $60.56",
                "Premium price: $66.62",
            ]
        );
    }

    #[test]
    fn default_variance_is_five_percent() {
        let engine = PricingEngine::default();
        let result = engine
            .calculate_price_range(dec!(50), dec!(0.95), dec!(8), Some(Season::High), None)
            .unwrap();

        assert_eq!(result.range.minimum_price, dec!(71.25));
        assert_eq!(result.range.maximum_price, dec!(78.75));
        assert_eq!(result.range.variance_percentage, dec!(5));
    }

    #[test]
    fn sub_cent_price_keeps_money_shape() {
        let engine = PricingEngine::default();
        let result = engine
            .calculate_price_range(dec!(0.01), Decimal::ZERO, dec!(1), Some(Season::Low), None)
            .unwrap();
        let range = &result.range;

        assert_eq!(range.suggested_price.to_string(), "0.00");
        assert_eq!(range.minimum_price.to_string(), "0.00");
        assert_eq!(range.maximum_price.to_string(), "0.00");
        assert_eq!(range.variance_percentage.to_string(), "5.00");
    }

    #[test]
    fn variance_must_be_positive() {
        let engine = PricingEngine::default();
        for variance in [Decimal::ZERO, dec!(-0.05)] {
            let err = engine
                .calculate_price_range(dec!(50), dec!(0.9), dec!(5), Some(Season::Normal), Some(variance))
                .unwrap_err();
            assert_eq!(err.field(), InputField::Variance);
        }
    }

    #[test]
    fn variance_capped_by_config() {
        let engine = PricingEngine::default();
        let err = engine
            .calculate_price_range(dec!(50), dec!(0.9), dec!(5), Some(Season::Normal), Some(dec!(0.75)))
            .unwrap_err();
        assert_eq!(err.field(), InputField::Variance);
        assert!(err.constraint().contains("0.5"));

        let wide = PricingEngine::new(EngineConfig {
            max_variance: dec!(0.9),
            ..EngineConfig::default()
        });
        assert!(wide
            .calculate_price_range(dec!(50), dec!(0.9), dec!(5), Some(Season::Normal), Some(dec!(0.75)))
            .is_ok());
    }

    #[test]
    fn price_inputs_validated_before_variance() {
        let engine = PricingEngine::default();
        let err = engine
            .calculate_price_range(dec!(50), dec!(0.9), dec!(11), Some(Season::Normal), Some(Decimal::ZERO))
            .unwrap_err();
        assert_eq!(err.field(), InputField::DemandIndex);
    }
}
