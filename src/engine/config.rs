//! Pricing engine configuration options.

use crate::season::SeasonCalendar;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Range width used when the caller does not pass one.
    pub default_variance: Decimal,
    /// Largest accepted range width. Keeps the minimum price positive.
    pub max_variance: Decimal,
    /// Month → season mapping used when no season is supplied.
    pub season_calendar: SeasonCalendar,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_variance: dec!(0.05),
            max_variance: dec!(0.5),
            season_calendar: SeasonCalendar::northern_hemisphere(),
        }
    }
}
