// 5.0: pricing engine. validates inputs, combines freshness, demand and
// seasonal multipliers into a suggested price with an auditable breakdown.
// pure: no I/O, no shared mutable state. the only clock read is the
// current month when no season is given.

mod config;
mod core;
mod explain;
mod range;
mod results;

pub use config::EngineConfig;
pub use self::core::{calculate_price, parse_season, PricingEngine, PricingInputs};
pub use explain::{calculation_formula, explanation_lines};
pub use range::price_range;
pub use results::{FactorBreakdown, PriceRange, PriceRangeResult, PricingError, PricingResult};
