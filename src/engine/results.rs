// 5.0.2: result types and errors for pricing operations.

use crate::season::Season;
use crate::types::InputField;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One factor's contribution to the suggested price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage_change: Decimal,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub suggested_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_difference: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage_change: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_discount_percentage: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub freshness_score: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub demand_index: Decimal,
    pub season: Season,
    pub season_auto_detected: bool,

    pub freshness_factor: FactorBreakdown,
    pub demand_factor: FactorBreakdown,
    pub seasonal_factor: FactorBreakdown,

    pub explanation: String,
    pub calculation_formula: String,
}

/// Competitive / suggested / premium band around a suggested price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(with = "rust_decimal::serde::float")]
    pub minimum_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub suggested_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub maximum_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub variance_percentage: Decimal,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeResult {
    #[serde(flatten)]
    pub range: PriceRange,
    pub full_calculation: PricingResult,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid {field}: {constraint}")]
    InvalidInput {
        field: InputField,
        constraint: String,
    },
}

impl PricingError {
    pub fn invalid(field: InputField, constraint: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field,
            constraint: constraint.into(),
        }
    }

    pub fn field(&self) -> InputField {
        match self {
            PricingError::InvalidInput { field, .. } => *field,
        }
    }

    pub fn constraint(&self) -> &str {
        match self {
            PricingError::InvalidInput { constraint, .. } => constraint,
        }
    }
}
