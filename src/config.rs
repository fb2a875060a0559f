// 8.0 config.rs: all tunables in one place. pricing engine + delivery estimator.
// 8.1 regional presets. the multiplier tables themselves are fixed constants
// and are not configurable.

use crate::delivery::DeliveryParams;
use crate::engine::EngineConfig;
use crate::season::SeasonCalendar;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MIN_SPEED_KMH: f64 = 1.0;
// one week of loading is already absurd
pub const MAX_HANDLING_MINUTES: f64 = 10_080.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(default)]
    pub pricing: EngineConfig,
    #[serde(default)]
    pub delivery: DeliveryParams,
}

impl MarketplaceConfig {
    // Seasons flipped for farms south of the equator
    pub fn southern_hemisphere() -> Self {
        let mut config = Self::default();
        config.pricing.season_calendar = SeasonCalendar::southern_hemisphere();
        config
    }

    // Refrigerated long distance trucks: faster on the road, longer loading,
    // and a wider price range allowed for remote markets
    pub fn long_haul() -> Self {
        let mut config = Self::default();
        config.delivery.speed_kmh = 60.0;
        config.delivery.handling_minutes = 60.0;
        config.delivery.long_haul_hours = 24.0;
        config.pricing.max_variance = dec!(0.75);
        config
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pricing = &self.pricing;

        // max variance of 1 or more would allow a zero or negative minimum price
        if pricing.max_variance <= Decimal::ZERO || pricing.max_variance >= Decimal::ONE {
            return Err(ConfigError::InvalidPricing {
                reason: "max_variance must be between 0 and 1 (exclusive)".to_string(),
            });
        }

        if pricing.default_variance <= Decimal::ZERO
            || pricing.default_variance > pricing.max_variance
        {
            return Err(ConfigError::InvalidPricing {
                reason: "default_variance must be positive and at most max_variance".to_string(),
            });
        }

        let delivery = &self.delivery;

        // slower than walking pace turns long routes into durations chrono can't hold
        if !delivery.speed_kmh.is_finite() || delivery.speed_kmh < MIN_SPEED_KMH {
            return Err(ConfigError::InvalidDelivery {
                reason: format!("speed_kmh must be at least {MIN_SPEED_KMH}"),
            });
        }

        if !(0.0..=MAX_HANDLING_MINUTES).contains(&delivery.handling_minutes)
            || !delivery.long_haul_hours.is_finite()
            || delivery.long_haul_hours < 0.0
        {
            return Err(ConfigError::InvalidDelivery {
                reason: format!(
                    "handling_minutes must be in [0, {MAX_HANDLING_MINUTES}], long_haul_hours must not be negative"
                ),
            });
        }

        if delivery.spoilage_rate_per_km < 0.0
            || delivery.uncontrolled_rate_per_km < 0.0
            || !(0.0..=1.0).contains(&delivery.freshness_protection)
        {
            return Err(ConfigError::InvalidDelivery {
                reason: "spoilage rates must not be negative, freshness_protection must be in [0, 1]"
                    .to_string(),
            });
        }

        if !(0.0..=1.0).contains(&delivery.max_spoilage_risk)
            || !(0.0..=1.0).contains(&delivery.viable_risk_limit)
        {
            return Err(ConfigError::InvalidDelivery {
                reason: "risk limits must be fractions between 0 and 1".to_string(),
            });
        }

        Ok(())
    }
}

// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pricing config: {reason}")]
    InvalidPricing { reason: String },

    #[error("Invalid delivery config: {reason}")]
    InvalidDelivery { reason: String },

    #[error("Could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

// Regional presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Northern,
    Southern,
}

impl Region {
    pub fn config(&self) -> MarketplaceConfig {
        match self {
            Region::Northern => MarketplaceConfig::default(),
            Region::Southern => MarketplaceConfig::southern_hemisphere(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::Season;

    #[test]
    fn test_default_config_valid() {
        let config = MarketplaceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.default_variance, dec!(0.05));
        assert_eq!(config.pricing.max_variance, dec!(0.5));
    }

    #[test]
    fn test_presets_valid() {
        assert!(MarketplaceConfig::southern_hemisphere().validate().is_ok());
        assert!(MarketplaceConfig::long_haul().validate().is_ok());
        assert!(Region::Northern.config().validate().is_ok());
        assert!(Region::Southern.config().validate().is_ok());
    }

    #[test]
    fn test_southern_calendar() {
        let config = Region::Southern.config();
        assert_eq!(config.pricing.season_calendar.season_for_month(1), Season::High);
    }

    #[test]
    fn test_invalid_variance() {
        let mut config = MarketplaceConfig::default();
        config.pricing.max_variance = dec!(1.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPricing { .. })));

        let mut config = MarketplaceConfig::default();
        config.pricing.default_variance = dec!(0.6);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPricing { .. })));
    }

    #[test]
    fn test_invalid_delivery() {
        let mut config = MarketplaceConfig::default();
        config.delivery.speed_kmh = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDelivery { .. })));

        let mut config = MarketplaceConfig::default();
        config.delivery.handling_minutes = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDelivery { .. })));

        let mut config = MarketplaceConfig::default();
        config.delivery.viable_risk_limit = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDelivery { .. })));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MarketplaceConfig::from_json_str(r#"{"delivery": {
            "speed_kmh": 40.0, "handling_minutes": 15.0, "spoilage_rate_per_km": 0.001,
            "freshness_protection": 0.02, "uncontrolled_rate_per_km": 0.0005,
            "max_spoilage_risk": 0.95, "viable_risk_limit": 0.3, "long_haul_hours": 12.0
        }}"#)
        .unwrap();
        assert_eq!(config.delivery.speed_kmh, 40.0);
        assert_eq!(config.pricing.max_variance, dec!(0.5));
    }

    #[test]
    fn test_crawling_speed_rejected_on_load() {
        let err = MarketplaceConfig::from_json_str(r#"{"delivery": {
            "speed_kmh": 1e-300, "handling_minutes": 30.0, "spoilage_rate_per_km": 0.001,
            "freshness_protection": 0.02, "uncontrolled_rate_per_km": 0.0005,
            "max_spoilage_risk": 0.95, "viable_risk_limit": 0.3, "long_haul_hours": 12.0
        }}"#)
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelivery { .. }));

        let mut config = MarketplaceConfig::default();
        config.delivery.speed_kmh = MIN_SPEED_KMH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            MarketplaceConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MarketplaceConfig::from_json_str(r#"{"pricing": {"default_variance": "0.9", "max_variance": "0.5", "season_calendar": {"months": ["low","low","moderate","moderate","moderate","high","high","high","normal","normal","normal","low"]}}}"#),
            Err(ConfigError::InvalidPricing { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = MarketplaceConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_config_serialization() {
        let config = MarketplaceConfig::long_haul();
        let json = serde_json::to_string(&config).unwrap();
        let back = MarketplaceConfig::from_json_str(&json).unwrap();
        assert_eq!(back.pricing, config.pricing);
        assert_eq!(back.delivery.speed_kmh, 60.0);
    }
}
