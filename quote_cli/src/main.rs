//! # Packquote CLI
//!
//! Interactive demo: prompts for a pouch, prints its quote and a
//! multi-quantity comparison, then the JSON a client would receive.
//!
//! Set `PACKQUOTE_CONFIG` to a JSON file to override rates.

use std::io::{self, BufRead, Write};
use std::path::Path;

use quote_core::comparison::{MultiQuantityEngine, MultiQuantityRequest, QuantityOutcome};
use quote_core::config::{load_config, PricingConfig};
use quote_core::materials::{MaterialId, ThicknessTier};
use quote_core::pricing::{PricingEngine, QuoteRequest, QuoteResult};
use quote_core::product::{BagType, ProductSpec, QuantityPlan};

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    prompt_line(prompt).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn load_settings() -> PricingConfig {
    match std::env::var("PACKQUOTE_CONFIG") {
        Ok(path) => match load_config(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "falling back to default rates");
                PricingConfig::default()
            }
        },
        Err(_) => PricingConfig::default(),
    }
}

#[tokio::main]
async fn main() {
    quote_core::logging::init();

    println!("Packquote CLI - Flexible Packaging Quote");
    println!("========================================");
    println!();

    let bag_type = prompt_line("Bag type (flat_3_side, stand_up, gusset, box, center_seal) [stand_up]: ")
        .and_then(|s| match BagType::from_str_flexible(&s) {
            Ok(bag) => Some(bag),
            Err(e) => {
                eprintln!("  {} - using stand_up", e);
                None
            }
        })
        .unwrap_or(BagType::StandUp);
    let material = prompt_line("Material (pet_al, pet_vmpet, pet_ldpe, pet_ny_al, pet_transparent, kraft_pe, pet_cpp) [pet_al]: ")
        .and_then(|s| MaterialId::from_str_flexible(&s).ok())
        .unwrap_or(MaterialId::PetAl);
    let thickness = prompt_line("Thickness (light, medium, standard, heavy, ultra) [standard]: ")
        .and_then(|s| ThicknessTier::from_str_flexible(&s).ok())
        .unwrap_or_default();

    let width = prompt_f64("Width (mm) [100]: ", 100.0);
    let height = prompt_f64("Height (mm) [150]: ", 150.0);
    let depth = prompt_f64("Gusset depth (mm) [30]: ", 30.0);
    let quantity = prompt_u32("Quantity [10000]: ", 10_000);
    let options: Vec<String> = prompt_line("Options, comma separated (e.g. zipper-yes,matte) []: ")
        .map(|s| s.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect())
        .unwrap_or_default();

    let spec = ProductSpec::pouch(bag_type, width, height, material)
        .with_depth(depth)
        .with_thickness(thickness);
    let request = QuoteRequest::new(spec.clone(), QuantityPlan::single(quantity)).with_options(&options);

    let config = load_settings();
    let engine = PricingEngine::new(config.clone());
    let quote = engine.calculate_quote(&request);

    println!();
    print_quote(&request, &quote);

    match engine.economics(&request) {
        Ok(report) => {
            if let Some(suggestion) = report.economic_quantity {
                println!("Economic quantity:");
                println!("  {}", suggestion.reason);
                println!();
            }
            for option in report.parallel_options.iter().filter(|o| o.is_recommended) {
                println!("Parallel production: {}", option.reason);
            }
        }
        Err(e) => eprintln!("Economics unavailable: {}", e),
    }

    let quantities = comparison_quantities(quantity);
    let comparison_engine = MultiQuantityEngine::new(config);
    let multi = MultiQuantityRequest::new(spec, quantities).with_options(&options);

    match comparison_engine.calculate_multi_quantity(&multi).await {
        Ok(result) => {
            println!("═══════════════════════════════════════");
            println!("  QUANTITY COMPARISON");
            println!("═══════════════════════════════════════");
            println!("  {:>8}  {:>10}  {:>12}  {}", "Qty", "Unit JPY", "Total JPY", "Lot");
            for calc in &result.calculations {
                match &calc.outcome {
                    QuantityOutcome::Quote(q) => {
                        let tier = quote_core::comparison::PriceBreakTier::for_quantity(calc.quantity);
                        println!(
                            "  {:>8}  {:>10.2}  {:>12.0}  {}",
                            calc.quantity,
                            q.unit_price,
                            q.total_price,
                            tier.display_name()
                        );
                    }
                    QuantityOutcome::Failed { reason } => {
                        println!("  {:>8}  failed: {}", calc.quantity, reason);
                    }
                }
            }
            if let Some(comparison) = &result.comparison {
                println!();
                println!(
                    "  Best value: {} units ({}% below the highest unit price)",
                    comparison.best_value.quantity, comparison.best_value.percentage
                );
                println!("  Price trend: {}", comparison.trends.price_trend);
            }
            for rec in &result.recommendations {
                println!("  {}: {} units (confidence {:.0}%)", rec.title, rec.quantity, rec.confidence * 100.0);
            }
            println!("═══════════════════════════════════════");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&quote) {
        println!("{}", json);
    }
}

fn print_quote(request: &QuoteRequest, quote: &QuoteResult) {
    let b = &quote.breakdown;
    println!("═══════════════════════════════════════");
    println!("  QUOTE");
    println!("═══════════════════════════════════════");
    println!();
    println!("Product:");
    println!(
        "  {} {:.0}x{:.0} mm, {}",
        request.spec.bag_type.display_name(),
        request.spec.width_mm,
        request.spec.height_mm,
        quote.film_usage.film_structure
    );
    println!(
        "  {}-up on {} mm roll (film width {:.0} mm)",
        quote.film_usage.columns, quote.material_width, quote.film_usage.calculated_film_width
    );
    println!(
        "  Film: {:.0} m secured + {:.0} m loss = {:.0} m, {:.1} kg",
        quote.film_usage.secured_m, quote.film_usage.loss_m, quote.film_usage.total_m, quote.film_usage.weight_kg
    );
    println!();
    println!("Breakdown (JPY):");
    println!("  Material:        {:>10.0}", b.material);
    println!("  Printing:        {:>10.0}", b.printing);
    println!("  Lamination:      {:>10.0}", b.lamination);
    println!("  Slitting:        {:>10.0}", b.slitter);
    println!("  Converting:      {:>10.0}", b.pouch_processing);
    println!("  Options:         {:>10.0}", b.post_processing);
    println!("  Margin:          {:>10.0}", b.manufacturing_margin);
    println!("  Duty:            {:>10.0}", b.duty);
    println!("  Delivery:        {:>10.0}", b.delivery);
    println!("  Sales markup:    {:>10.0}", b.sales_markup);
    println!("  ─────────────────────────────");
    println!("  Total:           {:>10.0}", quote.total_price);
    println!();
    println!(
        "  {} units at {:.2} JPY, lead time {} days, valid until {}",
        quote.quantity, quote.unit_price, quote.lead_time_days, quote.valid_until
    );
    if quote.degraded {
        println!("  [DEGRADED] priced from repaired input");
    }
    for warning in &quote.warnings {
        println!("  warning: {}", warning);
    }
    println!();
}

/// A spread of quantities around the requested one
fn comparison_quantities(quantity: u32) -> Vec<u32> {
    let base = quantity.max(1);
    let mut quantities: Vec<u32> = [base / 10, base / 2, base, base.saturating_mul(2), base.saturating_mul(5)]
        .into_iter()
        .filter(|&q| q > 0)
        .collect();
    quantities.dedup();
    quantities
}
