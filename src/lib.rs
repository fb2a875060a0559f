// farm-pricing: dynamic pricing core for a farm-to-consumer marketplace.
// suggested price = base × freshness × demand × season, with an auditable breakdown.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Price, FreshnessScore, DemandIndex, Variance
//   2.x  freshness.rs: freshness tiers, shelf-life assessment
//   3.x  demand.rs: demand bands and interpolation
//   4.x  season.rs: season multipliers, month → season calendar
//   5.x  engine/: pricing engine: validation, price, range, explanation
//   6.x  request.rs: JSON request schema, per-field validation, response
//   7.x  delivery.rs: haversine distance, delivery time, spoilage risk
//   8.x  config.rs: engine + delivery settings, regional presets

// pricing modules
pub mod demand;
pub mod engine;
pub mod freshness;
pub mod season;
pub mod types;

// boundary and logistics modules
pub mod config;
pub mod delivery;
pub mod request;

// re exports for convenience
pub use demand::*;
pub use engine::*;
pub use freshness::*;
pub use season::*;
pub use types::*;
pub use config::{ConfigError, MarketplaceConfig, Region};
pub use delivery::{
    estimate_batch, estimate_delivery, haversine_km, plan_routes, BatchEstimate, Coordinates,
    DeliveryError, DeliveryEstimate, DeliveryParams, DeliveryRecommendation, ProductType,
    RouteEstimate, Shipment, SpoilageCategory,
};
pub use request::{
    handle_json, handle_pricing_request, PricingRequest, PricingResponse, RequestError,
    ValidationErrors,
};
