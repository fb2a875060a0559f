// 3.0: demand index → price multiplier.
// five bands partition [1, 10] as half-open intervals [min_index, max_index + 1),
// the last one closed at 10. the multiplier follows the band's own line through
// its whole-number anchors, so 6, 6.5 and 7 all price differently.
// 3.1 has the lookup and interpolation.

use crate::types::{DemandIndex, MULTIPLIER_DP};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemandLevel {
    VeryLow,
    Low,
    Normal,
    High,
    VeryHigh,
}

impl DemandLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DemandLevel::VeryLow => "Very Low",
            DemandLevel::Low => "Low",
            DemandLevel::Normal => "Normal",
            DemandLevel::High => "High",
            DemandLevel::VeryHigh => "Very High",
        }
    }

    pub fn impact(&self) -> &'static str {
        match self {
            DemandLevel::VeryLow => "Price reduction due to low demand",
            DemandLevel::Low => "Slight price reduction",
            DemandLevel::Normal => "No significant adjustment",
            DemandLevel::High => "Moderate price increase",
            DemandLevel::VeryHigh => "Significant price increase",
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandBand {
    pub min_index: u8,
    pub max_index: u8,
    pub min_multiplier: Decimal,
    pub max_multiplier: Decimal,
    pub level: DemandLevel,
}

// min_index/max_index are the whole-number anchors of each band. bands are
// contiguous with no overlap. the top band starts below where the high band
// ends: 7 → 1.333, 8 → 1.25.
pub const DEMAND_BANDS: [DemandBand; 5] = [
    DemandBand {
        min_index: 1,
        max_index: 1,
        min_multiplier: dec!(0.5),
        max_multiplier: dec!(0.5),
        level: DemandLevel::VeryLow,
    },
    DemandBand {
        min_index: 2,
        max_index: 3,
        min_multiplier: dec!(0.667),
        max_multiplier: dec!(0.833),
        level: DemandLevel::Low,
    },
    DemandBand {
        min_index: 4,
        max_index: 5,
        min_multiplier: dec!(0.917),
        max_multiplier: dec!(1.0),
        level: DemandLevel::Normal,
    },
    DemandBand {
        min_index: 6,
        max_index: 7,
        min_multiplier: dec!(1.167),
        max_multiplier: dec!(1.333),
        level: DemandLevel::High,
    },
    DemandBand {
        min_index: 8,
        max_index: 10,
        min_multiplier: dec!(1.25),
        max_multiplier: dec!(1.5),
        level: DemandLevel::VeryHigh,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandFactor {
    pub index: DemandIndex,
    pub level: DemandLevel,
    pub multiplier: Decimal,
}

// 3.1: every DemandIndex is >= 1 so some band floor is always reached
pub fn demand_band(index: DemandIndex) -> &'static DemandBand {
    let value = index.value();
    DEMAND_BANDS
        .iter()
        .rev()
        .find(|band| value >= Decimal::from(band.min_index))
        .unwrap_or(&DEMAND_BANDS[0])
}

impl DemandBand {
    // per unit of index. a single-anchor band is flat.
    fn slope(&self) -> Decimal {
        if self.max_index == self.min_index {
            return Decimal::ZERO;
        }
        (self.max_multiplier - self.min_multiplier) / Decimal::from(self.max_index - self.min_index)
    }

    pub fn interpolate(&self, index: DemandIndex) -> Decimal {
        let offset = index.value() - Decimal::from(self.min_index);
        let multiplier = self.min_multiplier + self.slope() * offset;
        multiplier.round_dp(MULTIPLIER_DP)
    }
}

pub fn demand_factor(index: DemandIndex) -> DemandFactor {
    let band = demand_band(index);
    DemandFactor {
        index,
        level: band.level,
        multiplier: band.interpolate(index),
    }
}
