//! Typed request/response schema for the pricing endpoint.
//!
//! A request is deserialized into [`PricingRequest`] and checked with
//! `validator`: every field is checked at once and all violations come back
//! together as [`ValidationErrors`], the body a form-style API answers a 400
//! with. Only a fully valid request reaches the engine.

use crate::engine::{
    parse_season, price_range, EngineConfig, PriceRange, PricingEngine, PricingError,
    PricingInputs, PricingResult,
};
use crate::season::Season;
use crate::types::{DemandIndex, FreshnessScore, InputField, Price, Variance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{info, warn};
use validator::{Validate, ValidateArgs, ValidationError};

pub use validator::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(context = EngineConfig)]
pub struct PricingRequest {
    #[validate(custom(function = "validate_base_price"))]
    pub base_price: Decimal,
    #[validate(custom(function = "validate_freshness_score"))]
    pub freshness_score: Decimal,
    #[validate(custom(function = "validate_demand_index"))]
    pub demand_index: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_season"))]
    pub season: Option<String>,
    #[serde(default)]
    pub include_range: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_variance", use_context))]
    pub variance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResponse {
    #[serde(flatten)]
    pub result: PricingResult,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_range: Option<PriceRange>,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// A request that passed validation. Holds the typed inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub inputs: PricingInputs,
    pub variance: Option<Variance>,
}

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_base_price(value: &Decimal) -> Result<(), ValidationError> {
    match Price::new(*value) {
        Some(_) => Ok(()),
        None => Err(field_error("positive", "must be greater than 0")),
    }
}

fn validate_freshness_score(value: &Decimal) -> Result<(), ValidationError> {
    match FreshnessScore::new(*value) {
        Some(_) => Ok(()),
        None => Err(field_error("range", "must be between 0 and 1")),
    }
}

fn validate_demand_index(value: &Decimal) -> Result<(), ValidationError> {
    match DemandIndex::new(*value) {
        Some(_) => Ok(()),
        None => Err(field_error("range", "must be between 1 and 10")),
    }
}

fn validate_season(label: &str) -> Result<(), ValidationError> {
    label
        .parse::<Season>()
        .map(|_| ())
        .map_err(|e| field_error("unknown_season", e.to_string()))
}

fn validate_variance(value: &Decimal, config: &EngineConfig) -> Result<(), ValidationError> {
    match Variance::new(*value, config.max_variance) {
        Some(_) => Ok(()),
        None => Err(field_error(
            "range",
            format!(
                "must be greater than 0 and at most {}",
                config.max_variance.normalize()
            ),
        )),
    }
}

impl From<PricingError> for ValidationErrors {
    fn from(err: PricingError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            err.field().as_str(),
            field_error("invalid", err.constraint().to_string()),
        );
        errors
    }
}

const NUMERIC_FIELDS: [InputField; 4] = [
    InputField::BasePrice,
    InputField::FreshnessScore,
    InputField::DemandIndex,
    InputField::Variance,
];

// 1e40 is valid JSON but no Decimal holds it. that is the field's fault, not
// the body's, so it is reported per field.
fn unrepresentable_numbers(body: &str) -> Option<ValidationErrors> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let mut errors = ValidationErrors::new();
    for field in NUMERIC_FIELDS {
        let Some(raw) = value.get(field.as_str()) else {
            continue;
        };
        if raw.is_number() && serde_json::from_value::<Decimal>(raw.clone()).is_err() {
            errors.add(field.as_str(), field_error("range", "is out of range"));
        }
    }
    if errors.errors().is_empty() {
        None
    } else {
        Some(errors)
    }
}

impl PricingRequest {
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        serde_json::from_str(body).map_err(|err| match unrepresentable_numbers(body) {
            Some(errors) => {
                warn!(fields = %errors, "pricing request rejected");
                RequestError::Invalid(errors)
            }
            None => RequestError::Malformed(err),
        })
    }

    /// Checks every field and collects all violations. The season is resolved
    /// from the engine's calendar when absent or null.
    pub fn validate(&self, engine: &PricingEngine) -> Result<ValidatedRequest, ValidationErrors> {
        if let Err(errors) = self.validate_with_args(engine.config()) {
            warn!(fields = %errors, "pricing request rejected");
            return Err(errors);
        }

        let season = self.season.as_deref().map(parse_season).transpose()?;
        let inputs = engine.validate_inputs(
            self.base_price,
            self.freshness_score,
            self.demand_index,
            season,
        )?;
        let variance = if self.include_range || self.variance.is_some() {
            Some(engine.variance(self.variance)?)
        } else {
            None
        };

        Ok(ValidatedRequest { inputs, variance })
    }
}

/// Validates, prices and, when asked, attaches the price range.
pub fn handle_pricing_request(
    engine: &PricingEngine,
    request: &PricingRequest,
) -> Result<PricingResponse, ValidationErrors> {
    let validated = request.validate(engine)?;
    let result = engine.price(&validated.inputs)?;

    let price_range = match (request.include_range, validated.variance) {
        (true, Some(variance)) => Some(price_range(&result, variance)?),
        _ => None,
    };

    info!(
        suggested_price = %result.suggested_price,
        include_range = request.include_range,
        "pricing request served"
    );

    Ok(PricingResponse {
        result,
        price_range,
    })
}

/// Raw JSON in, JSON out. Errors carry either the parse failure or the
/// per-field validation body.
pub fn handle_json(engine: &PricingEngine, body: &str) -> Result<String, RequestError> {
    let request = PricingRequest::from_json(body)?;
    let response = handle_pricing_request(engine, &request)?;
    Ok(serde_json::to_string_pretty(&response)?)
}
