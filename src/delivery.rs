// 7.0 delivery.rs: farm → customer logistics estimates.
// distance by haversine, time from a flat average speed plus handling,
// spoilage risk from distance, freshness, cold chain and product sensitivity.
// 7.1 single route, 7.2 route planning, 7.3 multi-stop batches.

use crate::types::FreshnessScore;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_TO_MILES: f64 = 0.621371;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryParams {
    pub speed_kmh: f64,
    // loading and sorting before the truck leaves
    pub handling_minutes: f64,
    // spoilage fraction per km travelled
    pub spoilage_rate_per_km: f64,
    // how much a perfect freshness score slows spoilage
    pub freshness_protection: f64,
    // extra spoilage per km without temperature control
    pub uncontrolled_rate_per_km: f64,
    pub max_spoilage_risk: f64,
    // deliveries at or above this risk are not viable
    pub viable_risk_limit: f64,
    // routes longer than this get a scheduling recommendation
    pub long_haul_hours: f64,
}

impl Default for DeliveryParams {
    fn default() -> Self {
        Self {
            speed_kmh: 25.0,
            handling_minutes: 30.0,
            spoilage_rate_per_km: 0.001,
            freshness_protection: 0.02,
            uncontrolled_rate_per_km: 0.0005,
            max_spoilage_risk: 0.95,
            viable_risk_limit: 0.30,
            long_haul_hours: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Could not parse coordinates {0:?}, expected \"lat,lon\"")]
    MalformedCoordinates(String),

    #[error("Unknown product type {0:?}")]
    UnknownProductType(String),

    #[error("Batch delivery needs at least 2 stops, got {0}")]
    TooFewStops(usize),

    #[error("Delivery time for {distance_km:.1} km is out of range, check speed_kmh")]
    DurationOutOfRange { distance_km: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DeliveryError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DeliveryError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DeliveryError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl FromStr for Coordinates {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DeliveryError::MalformedCoordinates(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        Coordinates::new(lat, lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

// great circle distance, never negative
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    (EARTH_RADIUS_KM * c).max(0.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Vegetables,
    Fruits,
    Dairy,
    Meats,
    Herbs,
    Berries,
}

impl ProductType {
    // relative perishability. fruits travel better than vegetables, meat worst.
    pub fn spoilage_factor(&self) -> f64 {
        match self {
            ProductType::Vegetables => 1.0,
            ProductType::Fruits => 0.9,
            ProductType::Dairy => 1.3,
            ProductType::Meats => 1.5,
            ProductType::Herbs => 1.4,
            ProductType::Berries => 1.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Vegetables => "vegetables",
            ProductType::Fruits => "fruits",
            ProductType::Dairy => "dairy",
            ProductType::Meats => "meats",
            ProductType::Herbs => "herbs",
            ProductType::Berries => "berries",
        }
    }
}

impl FromStr for ProductType {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vegetables" => Ok(ProductType::Vegetables),
            "fruits" => Ok(ProductType::Fruits),
            "dairy" => Ok(ProductType::Dairy),
            "meats" => Ok(ProductType::Meats),
            "herbs" => Ok(ProductType::Herbs),
            "berries" => Ok(ProductType::Berries),
            _ => Err(DeliveryError::UnknownProductType(s.to_string())),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpoilageCategory {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl SpoilageCategory {
    pub fn from_risk(risk: f64) -> Self {
        if risk < 0.10 {
            SpoilageCategory::VeryLow
        } else if risk < 0.20 {
            SpoilageCategory::Low
        } else if risk < 0.30 {
            SpoilageCategory::Moderate
        } else if risk < 0.50 {
            SpoilageCategory::High
        } else {
            SpoilageCategory::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpoilageCategory::VeryLow => "Very Low Risk",
            SpoilageCategory::Low => "Low Risk",
            SpoilageCategory::Moderate => "Moderate Risk",
            SpoilageCategory::High => "High Risk",
            SpoilageCategory::VeryHigh => "Very High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryRecommendation {
    NotRecommended,
    Risky,
    Acceptable,
    Schedule,
    Good,
}

impl DeliveryRecommendation {
    pub fn evaluate(risk: f64, hours: f64, params: &DeliveryParams) -> Self {
        if risk > 0.50 {
            DeliveryRecommendation::NotRecommended
        } else if risk > params.viable_risk_limit {
            DeliveryRecommendation::Risky
        } else if risk > 0.20 {
            DeliveryRecommendation::Acceptable
        } else if hours > params.long_haul_hours {
            DeliveryRecommendation::Schedule
        } else {
            DeliveryRecommendation::Good
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DeliveryRecommendation::NotRecommended => "Not recommended - too high spoilage risk",
            DeliveryRecommendation::Risky => {
                "Risky - requires urgent delivery and/or temperature control"
            }
            DeliveryRecommendation::Acceptable => "Acceptable - consider temperature control",
            DeliveryRecommendation::Schedule => {
                "Viable - schedule delivery for optimal freshness"
            }
            DeliveryRecommendation::Good => "Good - safe for standard delivery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub from: Coordinates,
    pub to: Coordinates,
    pub freshness: FreshnessScore,
    pub temperature_controlled: bool,
    pub product: ProductType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub distance_km: f64,
    pub distance_miles: f64,
    pub estimated_minutes: i64,
    pub estimated_hours: f64,
    pub spoilage_risk_percentage: f64,
    pub spoilage_category: SpoilageCategory,
    pub recommendation: DeliveryRecommendation,
    pub is_viable: bool,
    pub temperature_controlled: bool,
    pub product: ProductType,
    pub from: Coordinates,
    pub to: Coordinates,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// 7.1: handling time plus driving time at the average speed
pub fn delivery_duration(
    distance_km: f64,
    params: &DeliveryParams,
) -> Result<chrono::Duration, DeliveryError> {
    let minutes = params.handling_minutes + distance_km / params.speed_kmh * 60.0;
    let seconds = (minutes * 60.0).round();
    if !seconds.is_finite() {
        return Err(DeliveryError::DurationOutOfRange { distance_km });
    }
    // the cast saturates, try_seconds rejects anything past chrono's bounds
    chrono::Duration::try_seconds(seconds as i64)
        .ok_or(DeliveryError::DurationOutOfRange { distance_km })
}

pub fn spoilage_risk(
    distance_km: f64,
    freshness: FreshnessScore,
    temperature_controlled: bool,
    product: ProductType,
    params: &DeliveryParams,
) -> f64 {
    let score = freshness.value().to_f64().unwrap_or(0.0);
    let mut risk =
        distance_km * params.spoilage_rate_per_km * (1.0 - score * params.freshness_protection);
    if !temperature_controlled {
        risk += distance_km * params.uncontrolled_rate_per_km;
    }
    risk *= product.spoilage_factor();
    risk.clamp(0.0, params.max_spoilage_risk)
}

fn estimate_distance(
    distance_km: f64,
    shipment: &Shipment,
    params: &DeliveryParams,
) -> Result<DeliveryEstimate, DeliveryError> {
    let duration = delivery_duration(distance_km, params)?;
    let hours = duration.num_seconds() as f64 / 3600.0;
    let risk = spoilage_risk(
        distance_km,
        shipment.freshness,
        shipment.temperature_controlled,
        shipment.product,
        params,
    );

    Ok(DeliveryEstimate {
        distance_km: round_to(distance_km, 2),
        distance_miles: round_to(distance_km * KM_TO_MILES, 2),
        estimated_minutes: duration.num_minutes(),
        estimated_hours: round_to(hours, 1),
        spoilage_risk_percentage: round_to(risk * 100.0, 2),
        spoilage_category: SpoilageCategory::from_risk(risk),
        recommendation: DeliveryRecommendation::evaluate(risk, hours, params),
        is_viable: risk < params.viable_risk_limit,
        temperature_controlled: shipment.temperature_controlled,
        product: shipment.product,
        from: shipment.from,
        to: shipment.to,
    })
}

pub fn estimate_delivery(
    shipment: &Shipment,
    params: &DeliveryParams,
) -> Result<DeliveryEstimate, DeliveryError> {
    let distance = haversine_km(shipment.from, shipment.to);
    let estimate = estimate_distance(distance, shipment, params)?;
    debug!(
        distance_km = estimate.distance_km,
        spoilage_pct = estimate.spoilage_risk_percentage,
        product = %shipment.product,
        "delivery estimated"
    );
    Ok(estimate)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub route_id: usize,
    #[serde(flatten)]
    pub estimate: DeliveryEstimate,
}

// 7.2: estimate every route, closest first. route ids are 1-based input positions.
pub fn plan_routes(
    shipments: &[Shipment],
    params: &DeliveryParams,
) -> Result<Vec<RouteEstimate>, DeliveryError> {
    let mut routes = shipments
        .iter()
        .enumerate()
        .map(|(i, shipment)| {
            Ok(RouteEstimate {
                route_id: i + 1,
                estimate: estimate_delivery(shipment, params)?,
            })
        })
        .collect::<Result<Vec<_>, DeliveryError>>()?;
    routes.sort_by(|a, b| a.estimate.distance_km.total_cmp(&b.estimate.distance_km));
    Ok(routes)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEstimate {
    pub total_distance_km: f64,
    pub total_delivery_hours: f64,
    pub num_stops: usize,
    pub spoilage_risk_percentage: f64,
    pub recommendation: DeliveryRecommendation,
}

// 7.3: one vehicle visiting the stops in order, cold chain, vegetables
pub fn estimate_batch(
    stops: &[Coordinates],
    freshness: FreshnessScore,
    params: &DeliveryParams,
) -> Result<BatchEstimate, DeliveryError> {
    if stops.len() < 2 {
        return Err(DeliveryError::TooFewStops(stops.len()));
    }

    let total_distance: f64 = stops
        .windows(2)
        .map(|leg| haversine_km(leg[0], leg[1]))
        .sum();
    let duration = delivery_duration(total_distance, params)?;
    let hours = duration.num_seconds() as f64 / 3600.0;
    let risk = spoilage_risk(total_distance, freshness, true, ProductType::Vegetables, params);

    Ok(BatchEstimate {
        total_distance_km: round_to(total_distance, 2),
        total_delivery_hours: round_to(hours, 1),
        num_stops: stops.len(),
        spoilage_risk_percentage: round_to(risk * 100.0, 2),
        recommendation: DeliveryRecommendation::evaluate(risk, hours, params),
    })
}
