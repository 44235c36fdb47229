//! # Production Economics
//!
//! Advice that sits next to a quote rather than inside it:
//!
//! - **Economic quantity**: how many pouches the minimum film run yields, and
//!   whether the customer should round their order up to it.
//! - **Parallel production**: narrow products (roll film, center seal, box
//!   and gusset bags) can run several lanes side by side. Lane 2 is charged
//!   at 60%, each further lane at 30% of the film, print and lamination cost;
//!   slitting and delivery are charged in full.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::economics::parallel_discount_multiplier;
//!
//! assert_eq!(parallel_discount_multiplier(1), 1.0);
//! assert_eq!(parallel_discount_multiplier(2), 1.6);
//! assert!((parallel_discount_multiplier(4) - 2.2).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::film_cost::{self, FilmCostInput};
use crate::calculations::layout::{calculate_pouch_film_width, printable_width, NARROW_ROLL_MM, WIDE_ROLL_MM};
use crate::calculations::sku_cost::pitch_mm;
use crate::config::PricingConfig;
use crate::errors::{PricingError, PricingResult};
use crate::materials::FilmStructure;
use crate::product::{BagType, ProductSpec};
use crate::units::{round_to, Krw};

/// Utilization at which a parallel option is always recommended (%)
pub const RECOMMENDED_UTILIZATION_PCT: f64 = 75.0;

// ============================================================================
// Parallel discount
// ============================================================================

/// Price factor for `count` lanes relative to one lane.
pub fn parallel_discount_multiplier(count: u32) -> f64 {
    match count {
        0 | 1 => 1.0,
        n => 1.6 + 0.3 * (n - 2) as f64,
    }
}

pub fn calculate_parallel_discount(base: Krw, count: u32) -> Krw {
    base * parallel_discount_multiplier(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallelDiscountDetail {
    /// `count` lanes at full price
    pub original_price: Krw,
    pub discounted_price: Krw,
    pub discount_amount: Krw,
    /// Percentage, one decimal
    pub discount_rate_pct: f64,
    pub discount_multiplier: f64,
    pub first_lane: Krw,
    pub additional_lanes: Krw,
    pub additional_lane_count: u32,
}

pub fn parallel_discount_detail(base: Krw, count: u32) -> ParallelDiscountDetail {
    let count = count.max(1);
    let original_price = base * count as f64;
    let discounted_price = calculate_parallel_discount(base, count);
    let discount_amount = original_price - discounted_price;
    let discount_rate_pct = if original_price.0 > 0.0 {
        round_to(discount_amount.0 / original_price.0 * 100.0, 1)
    } else {
        0.0
    };

    ParallelDiscountDetail {
        original_price,
        discounted_price,
        discount_amount,
        discount_rate_pct,
        discount_multiplier: parallel_discount_multiplier(count),
        first_lane: base,
        additional_lanes: discounted_price - base,
        additional_lane_count: count - 1,
    }
}

// ============================================================================
// Parallel production options
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelProductionOption {
    pub option_number: usize,
    pub lanes: u32,
    pub material_width: u32,
    pub film_width_utilization_pct: f64,
    /// JPY per lane after the parallel discount
    pub estimated_lane_cost: f64,
    /// Versus running a single lane on the same roll
    pub savings_rate_pct: f64,
    pub is_recommended: bool,
    pub reason: String,
}

/// Lane combinations for products narrow enough to share a roll.
///
/// `film_length_m` is the ordered length per lane (roll film metres, or the
/// secured length of a pouch run); the fixed loss is added once.
pub fn parallel_production_options(
    spec: &ProductSpec,
    film_length_m: f64,
    config: &PricingConfig,
) -> PricingResult<Vec<ParallelProductionOption>> {
    if !matches!(
        spec.bag_type,
        BagType::RollFilm | BagType::CenterSeal | BagType::Gusset | BagType::Box
    ) {
        return Ok(Vec::new());
    }

    let film_width = calculate_pouch_film_width(spec.bag_type, spec, 1)
        .ok_or_else(|| PricingError::internal("single-lane film width unavailable"))?;
    if !(film_width > 0.0) {
        return Err(PricingError::invalid_input(
            "width_mm",
            spec.width_mm.to_string(),
            "Film width must be positive",
        ));
    }

    let structure = FilmStructure::resolve(spec.material_id, spec.thickness);
    let run_length = film_length_m + config.loss_m;
    let mut options = Vec::new();

    for roll in [NARROW_ROLL_MM, WIDE_ROLL_MM] {
        let effective = printable_width(roll);
        let max_lanes = (effective as f64 / film_width).floor() as u32;
        if max_lanes < 2 {
            continue;
        }

        let film = film_cost::calculate(&FilmCostInput::new(structure.layers.clone(), effective, run_length), config)?;
        let discountable = film.material_cost + film.printing_cost + film.lamination_cost;
        let fixed = film.slitter_cost + film.delivery_cost;
        let single_lane = (discountable + fixed).to_jpy(config.exchange_rate).0;

        for lanes in 2..=max_lanes {
            let total = calculate_parallel_discount(discountable, lanes) + fixed;
            let per_lane = total.to_jpy(config.exchange_rate).0 / lanes as f64;
            let utilization = lanes as f64 * film_width / roll as f64 * 100.0;
            let savings = if single_lane > 0.0 {
                (single_lane - per_lane) / single_lane * 100.0
            } else {
                0.0
            };

            options.push(ParallelProductionOption {
                option_number: 0,
                lanes,
                material_width: roll,
                film_width_utilization_pct: round_to(utilization, 1),
                estimated_lane_cost: round_to(per_lane, 0),
                savings_rate_pct: round_to(savings, 1),
                is_recommended: false,
                reason: format!("{} lanes on a {} mm roll ({:.0}% of width used)", lanes, roll, utilization),
            });
        }
    }

    options.sort_by(|a, b| b.film_width_utilization_pct.total_cmp(&a.film_width_utilization_pct));
    let best = options.first().map(|o| o.film_width_utilization_pct);
    for (index, option) in options.iter_mut().enumerate() {
        option.option_number = index + 1;
        if option.film_width_utilization_pct >= RECOMMENDED_UTILIZATION_PCT
            || Some(option.film_width_utilization_pct) == best
        {
            option.is_recommended = true;
            option.reason = format!(
                "Recommended: {} lanes use {:.0}% of the {} mm roll, {:.0}% cheaper per lane",
                option.lanes, option.film_width_utilization_pct, option.material_width, option.savings_rate_pct
            );
        }
    }

    Ok(options)
}

// ============================================================================
// Economic quantity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicAdvice {
    /// Waste ≤ 10%: round the order up
    UseEconomicQuantity,
    /// Waste 10-30%: offer both quantities
    OfferBoth,
    /// Waste > 30%, or the order already fills the minimum run
    KeepOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicQuantitySuggestion {
    pub order_quantity: u32,
    pub pouches_per_metre: f64,
    /// Floor plus loss (m)
    pub minimum_film_usage_m: f64,
    /// Pouches the floor length yields
    pub economic_quantity: u32,
    pub unit_price_at_order: f64,
    pub unit_price_at_economic: f64,
    pub savings_rate_pct: f64,
    pub waste_rate_pct: f64,
    pub advice: EconomicAdvice,
    pub recommended_quantity: u32,
    pub reason: String,
}

/// Suggest rounding a small order up to what the minimum run produces anyway.
///
/// `order_total_jpy` is the quoted total for `order_quantity`; since a
/// below-floor order pays for the whole minimum run, the same total spread
/// over the economic quantity gives its unit price.
pub fn suggest_economic_quantity(
    spec: &ProductSpec,
    order_quantity: u32,
    columns: u8,
    order_total_jpy: f64,
    config: &PricingConfig,
) -> PricingResult<EconomicQuantitySuggestion> {
    if order_quantity == 0 {
        return Err(PricingError::invalid_input("order_quantity", "0", "Quantity must be positive"));
    }
    let pitch = pitch_mm(spec);
    if !(pitch > 0.0) {
        return Err(PricingError::invalid_input("pitch_mm", pitch.to_string(), "Pitch must be positive"));
    }

    let pouches_per_metre = if spec.bag_type == BagType::RollFilm {
        1.0
    } else {
        1000.0 / pitch * columns.max(1) as f64
    };
    let economic_quantity = (config.single_sku_floor_m * pouches_per_metre).floor() as u32;
    let unit_price_at_order = order_total_jpy / order_quantity as f64;
    let unit_price_at_economic = if economic_quantity > 0 {
        order_total_jpy / economic_quantity as f64
    } else {
        unit_price_at_order
    };

    let waste = economic_quantity as f64 - order_quantity as f64;
    let waste_rate_pct = if economic_quantity > 0 {
        waste / economic_quantity as f64 * 100.0
    } else {
        0.0
    };

    let (advice, recommended_quantity, reason) = if waste <= 0.0 {
        (
            EconomicAdvice::KeepOrder,
            order_quantity,
            format!("{} already fills the minimum run", order_quantity),
        )
    } else if waste_rate_pct <= 10.0 {
        (
            EconomicAdvice::UseEconomicQuantity,
            economic_quantity,
            format!(
                "Round up {} → {} for the same film ({:.1}% extra)",
                order_quantity, economic_quantity, waste_rate_pct
            ),
        )
    } else if waste_rate_pct <= 30.0 {
        (
            EconomicAdvice::OfferBoth,
            order_quantity,
            format!(
                "Either {} as ordered or {} to use the full run ({:.1}% extra)",
                order_quantity, economic_quantity, waste_rate_pct
            ),
        )
    } else {
        (
            EconomicAdvice::KeepOrder,
            order_quantity,
            format!(
                "Keep {}; the full run would add {:.1}% unneeded units",
                order_quantity, waste_rate_pct
            ),
        )
    };

    let savings_rate_pct = if unit_price_at_order > 0.0 {
        (unit_price_at_order - unit_price_at_economic) / unit_price_at_order * 100.0
    } else {
        0.0
    };

    Ok(EconomicQuantitySuggestion {
        order_quantity,
        pouches_per_metre,
        minimum_film_usage_m: config.single_sku_floor_m + config.loss_m,
        economic_quantity,
        unit_price_at_order: round_to(unit_price_at_order, 2),
        unit_price_at_economic: round_to(unit_price_at_economic, 2),
        savings_rate_pct: round_to(savings_rate_pct.max(0.0), 1),
        waste_rate_pct: round_to(waste_rate_pct.max(0.0), 1),
        advice,
        recommended_quantity,
        reason,
    })
}
