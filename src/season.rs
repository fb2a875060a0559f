// 4.0: seasonal supply/demand labels and their fixed multipliers.
// 4.1 SeasonCalendar maps calendar months to a season when the caller gives none.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Low,
    Moderate,
    Normal,
    High,
    VeryHigh,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Low,
        Season::Moderate,
        Season::Normal,
        Season::High,
        Season::VeryHigh,
    ];

    pub fn multiplier(&self) -> Decimal {
        match self {
            Season::Low => dec!(0.7),
            Season::Moderate => dec!(0.95),
            Season::Normal => dec!(1.0),
            Season::High => dec!(1.2),
            Season::VeryHigh => dec!(1.3),
        }
    }

    // wire name: "very_high"
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Low => "low",
            Season::Moderate => "moderate",
            Season::Normal => "normal",
            Season::High => "high",
            Season::VeryHigh => "very_high",
        }
    }

    // display name: "Very High"
    pub fn label(&self) -> &'static str {
        match self {
            Season::Low => "Low",
            Season::Moderate => "Moderate",
            Season::Normal => "Normal",
            Season::High => "High",
            Season::VeryHigh => "Very High",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Season::Low => "Off-season supply abundant",
            Season::Moderate => "Shoulder season with moderate supply",
            Season::Normal => "Normal supply and demand",
            Season::High => "Peak season with higher demand",
            Season::VeryHigh => "Very high demand season",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized season {0:?}, expected one of low, moderate, normal, high, very_high")]
pub struct UnknownSeason(pub String);

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Season::ALL
            .iter()
            .copied()
            .find(|season| season.as_str() == normalized)
            .ok_or_else(|| UnknownSeason(s.to_string()))
    }
}

// 4.1: one season per calendar month, index 0 = January
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    pub months: [Season; 12],
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self::northern_hemisphere()
    }
}

impl SeasonCalendar {
    // winter is the off season, summer is peak, autumn harvest is normal
    pub fn northern_hemisphere() -> Self {
        use Season::*;
        Self {
            months: [
                Low, Low, // Jan, Feb
                Moderate, Moderate, Moderate, // Mar to May
                High, High, High, // Jun to Aug
                Normal, Normal, Normal, // Sep to Nov
                Low, // Dec
            ],
        }
    }

    // same pattern shifted six months
    pub fn southern_hemisphere() -> Self {
        let mut months = Self::northern_hemisphere().months;
        months.rotate_left(6);
        Self { months }
    }

    // month is 1-based like chrono. out of range months fall back to normal.
    pub fn season_for_month(&self, month: u32) -> Season {
        month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
            .copied()
            .unwrap_or(Season::Normal)
    }

    pub fn current_season(&self) -> Season {
        self.season_for_month(chrono::Local::now().month())
    }
}
