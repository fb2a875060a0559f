//! Farm marketplace pricing CLI.
//!
//! Prices produce with freshness, demand and seasonal multipliers, serves
//! JSON pricing requests, and estimates delivery time and spoilage risk.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use farm_pricing::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "farm-pricing")]
#[command(about = "Dynamic pricing and delivery estimates for farm produce")]
struct Cli {
    /// JSON config file. Overrides --region.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hemisphere used to auto-detect the season
    #[arg(short, long, global = true, value_enum, default_value_t = RegionArg::Northern)]
    region: RegionArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RegionArg {
    Northern,
    Southern,
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Northern => Region::Northern,
            RegionArg::Southern => Region::Southern,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single product
    Price {
        #[arg(short, long)]
        base_price: Decimal,

        /// Freshness score between 0 and 1
        #[arg(short, long)]
        freshness: Decimal,

        /// Demand index between 1 and 10
        #[arg(short, long)]
        demand: Decimal,

        /// low, moderate, normal, high or very_high. Defaults to the current month.
        #[arg(short, long)]
        season: Option<String>,

        /// Also show the price range
        #[arg(long)]
        range: bool,

        /// Range variance as a fraction (default 0.05)
        #[arg(long)]
        variance: Option<Decimal>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve a JSON pricing request from a file, or stdin with "-"
    Request { input: String },

    /// Estimate delivery time and spoilage risk between two points
    Delivery {
        /// Farm location as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinates,

        /// Customer location as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinates,

        #[arg(short, long, default_value = "0.8")]
        freshness: Decimal,

        /// Shipment travels without temperature control
        #[arg(long)]
        no_cold_chain: bool,

        #[arg(short, long, default_value = "vegetables")]
        product: ProductType,
    },

    /// Assess a freshness score
    Freshness { score: Decimal },

    /// Run the reference pricing scenarios
    Demo,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries results, logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<MarketplaceConfig> {
    match &cli.config {
        Some(path) => MarketplaceConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(Region::from(cli.region).config()),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let engine = PricingEngine::new(config.pricing.clone());

    match cli.command {
        Commands::Price {
            base_price,
            freshness,
            demand,
            season,
            range,
            variance,
            json,
        } => {
            let result = engine.calculate_dynamic_price_with_label(
                base_price,
                freshness,
                demand,
                season.as_deref(),
            )?;

            let band = if range || variance.is_some() {
                Some(price_range(&result, engine.variance(variance)?)?)
            } else {
                None
            };

            if json {
                let response = PricingResponse {
                    result,
                    price_range: band,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_result(&result);
                if let Some(range) = &band {
                    print_range(range);
                }
            }
        }

        Commands::Request { input } => {
            let body = read_input(&input)?;
            match handle_json(&engine, &body) {
                Ok(response) => println!("{}", response),
                Err(RequestError::Invalid(errors)) => {
                    // same body shape an HTTP 400 would carry
                    println!("{}", serde_json::to_string_pretty(&errors)?);
                    return Err(anyhow!("request rejected: {}", errors));
                }
                Err(err) => return Err(err.into()),
            }
        }

        Commands::Delivery {
            from,
            to,
            freshness,
            no_cold_chain,
            product,
        } => {
            let freshness = FreshnessScore::new(freshness)
                .ok_or_else(|| anyhow!("freshness must be between 0 and 1, got {}", freshness))?;
            let shipment = Shipment {
                from,
                to,
                freshness,
                temperature_controlled: !no_cold_chain,
                product,
            };
            let estimate = estimate_delivery(&shipment, &config.delivery)?;
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }

        Commands::Freshness { score } => {
            let score = FreshnessScore::new(score)
                .ok_or_else(|| anyhow!("freshness score must be between 0 and 1, got {}", score))?;
            let tier = freshness_tier(score);
            let assessment = assess_freshness(score);
            println!("Freshness {}: {}", assessment.freshness_score, tier.category.label());
            println!("  Price multiplier: {}", tier.multiplier);
            println!("  Discount: {}%", tier.discount_pct);
            println!("  Estimated shelf life: {} days", assessment.estimated_remaining_days);
        }

        Commands::Demo => run_demo(&engine)?,
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("reading request from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading request from {}", input))
    }
}

fn print_result(result: &PricingResult) {
    println!(
        "  Base ${:.2} → suggested ${:.2} ({}%)",
        result.base_price, result.suggested_price, result.percentage_change
    );
    for factor in [
        &result.freshness_factor,
        &result.demand_factor,
        &result.seasonal_factor,
    ] {
        println!(
            "    {:<10} x{} {}",
            factor.category, factor.multiplier, factor.impact
        );
    }
    println!("  {}", result.calculation_formula);
    for line in result.explanation.lines() {
        println!("    {}", line);
    }
}

fn print_range(range: &PriceRange) {
    println!(
        "  Range ±{}%: ${:.2} .. ${:.2}",
        range.variance_percentage, range.minimum_price, range.maximum_price
    );
}

fn run_demo(engine: &PricingEngine) -> Result<()> {
    println!("Farm Marketplace Dynamic Pricing");
    println!("suggested = base × freshness × demand × season\n");

    scenario_peak_demand(engine)?;
    scenario_fresh_but_capped(engine)?;
    scenario_fading_produce(engine)?;
    scenario_off_season(engine)?;
    scenario_price_range(engine)?;
    scenario_rejected_inputs(engine);

    println!("\nAll scenarios completed.");
    Ok(())
}

/// Excellent produce, strong demand, summer.
fn scenario_peak_demand(engine: &PricingEngine) -> Result<()> {
    println!("Scenario 1: Peak Season, High Demand\n");
    let result =
        engine.calculate_dynamic_price(dec!(100), dec!(0.85), dec!(7), Some(Season::High))?;
    print_result(&result);
    println!();
    Ok(())
}

/// Very high demand sits at the band floor, so 8 earns less than 7.
fn scenario_fresh_but_capped(engine: &PricingEngine) -> Result<()> {
    println!("Scenario 2: Very High Demand Band\n");
    let result =
        engine.calculate_dynamic_price(dec!(50), dec!(0.95), dec!(8), Some(Season::High))?;
    print_result(&result);
    println!();
    Ok(())
}

fn scenario_fading_produce(engine: &PricingEngine) -> Result<()> {
    println!("Scenario 3: Fair Freshness, Low Demand\n");
    let result =
        engine.calculate_dynamic_price(dec!(50), dec!(0.55), dec!(3), Some(Season::High))?;
    print_result(&result);
    println!("  Final discount: {}%\n", result.final_discount_percentage);
    Ok(())
}

fn scenario_off_season(engine: &PricingEngine) -> Result<()> {
    println!("Scenario 4: Off Season\n");
    let result =
        engine.calculate_dynamic_price(dec!(100), dec!(0.72), dec!(4), Some(Season::Low))?;
    print_result(&result);
    println!();
    Ok(())
}

fn scenario_price_range(engine: &PricingEngine) -> Result<()> {
    println!("Scenario 5: Price Range at 10% Variance\n");
    let result = engine.calculate_price_range(
        dec!(75),
        dec!(0.65),
        dec!(5),
        Some(Season::Moderate),
        Some(dec!(0.1)),
    )?;
    print_result(&result.full_calculation);
    print_range(&result.range);
    for insight in &result.range.insights {
        println!("    {}", insight);
    }
    println!();
    Ok(())
}

fn scenario_rejected_inputs(engine: &PricingEngine) {
    println!("Scenario 6: Rejected Inputs\n");
    let cases = [
        (dec!(0), dec!(0.8), dec!(5)),
        (dec!(50), dec!(1.5), dec!(5)),
        (dec!(50), dec!(0.8), dec!(11)),
    ];
    for (base, freshness, demand) in cases {
        match engine.calculate_dynamic_price(base, freshness, demand, Some(Season::Normal)) {
            Ok(result) => println!("  unexpected price ${}", result.suggested_price),
            Err(err) => {
                info!(field = %err.field(), "input rejected as expected");
                println!("  {}", err);
            }
        }
    }
}
