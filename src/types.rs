// 1.0: primitives every calculation goes through. prices, scores, indices, variance.
// each is a newtype so a freshness score can't be passed where a price belongs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// Money values are reported with cents precision.
pub const MONEY_DP: u32 = 2;
// Demand multipliers are reported with three decimals.
pub const MULTIPLIER_DP: u32 = 3;

pub const MIN_DEMAND_INDEX: u8 = 1;
pub const MAX_DEMAND_INDEX: u8 = 10;

// 1.1: price in the marketplace currency. must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: product condition in [0, 1]. 1.0 = just harvested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FreshnessScore(Decimal);

impl FreshnessScore {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if (Decimal::ZERO..=Decimal::ONE).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for FreshnessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.3: relative market demand on a 1..=10 scale. whole numbers are the usual
// input but fractional readings (6.5) from order analytics are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DemandIndex(Decimal);

impl DemandIndex {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if (Decimal::from(MIN_DEMAND_INDEX)..=Decimal::from(MAX_DEMAND_INDEX)).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for DemandIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.4: width of a price range as a fraction of the suggested price. 0.05 = ±5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variance(Decimal);

impl Variance {
    pub const DEFAULT: Variance = Variance(dec!(0.05));

    #[must_use]
    pub fn new(value: Decimal, max: Decimal) -> Option<Self> {
        if value > Decimal::ZERO && value <= max {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * dec!(100)
    }
}

impl Default for Variance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// 1.5: names of the validated inputs. errors point at one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    BasePrice,
    FreshnessScore,
    DemandIndex,
    Season,
    Variance,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::BasePrice => "base_price",
            InputField::FreshnessScore => "freshness_score",
            InputField::DemandIndex => "demand_index",
            InputField::Season => "season",
            InputField::Variance => "variance",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// always carries two decimals so 0 prints as 0.00
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(MONEY_DP);
    rounded.rescale(MONEY_DP);
    rounded
}

// multiplier 1.2 → +20.0, multiplier 0.85 → -15.0
pub fn multiplier_change_pct(multiplier: Decimal) -> Decimal {
    ((multiplier - Decimal::ONE) * dec!(100)).round_dp(1)
}
