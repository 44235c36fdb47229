//! Single-quote orchestration: sanitise the request, cost it, and expose the
//! result in yen.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::economics::{
    parallel_production_options, suggest_economic_quantity, EconomicQuantitySuggestion, ParallelProductionOption,
};
use crate::calculations::roll::{validate_roll_film_params, RollPlan};
use crate::calculations::sku_cost::{calculate_sku_cost, KrwBreakdown, SkuCostInput, SkuCostResult};
use crate::config::{PricingConfig, DEFAULT_CONFIG};
use crate::errors::PricingResult;
use crate::post_processing::PostProcessingSelection;
use crate::pricing::QuoteRequest;
use crate::product::{BagType, DeliveryLocation, ProductSpec, QuantityPlan, Urgency};
use crate::units::{round_to, Krw};

/// Smallest dimension used when a request carries an unusable one (mm)
pub const MIN_DIMENSION_MM: f64 = 10.0;
/// Highest accepted customer markup
pub const MAX_MARKUP_RATE: f64 = 5.0;

// ============================================================================
// Result types
// ============================================================================

/// Cost lines in whole yen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material: f64,
    pub printing: f64,
    pub lamination: f64,
    pub slitter: f64,
    pub pouch_processing: f64,
    pub post_processing: f64,
    pub manufacturing_margin: f64,
    pub duty: f64,
    pub delivery: f64,
    pub sales_markup: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Convert a KRW chain, rounding each line half-up on its own.
    pub fn from_krw(krw: &KrwBreakdown, exchange_rate: f64) -> Self {
        let yen = |amount: Krw| amount.to_jpy(exchange_rate).rounded();
        CostBreakdown {
            material: yen(krw.material),
            printing: yen(krw.printing),
            lamination: yen(krw.lamination),
            slitter: yen(krw.slitter),
            pouch_processing: yen(krw.pouch_processing),
            post_processing: yen(krw.post_processing),
            manufacturing_margin: yen(krw.manufacturing_margin),
            duty: yen(krw.duty),
            delivery: yen(krw.delivery),
            sales_markup: yen(krw.sales_markup),
            total: yen(krw.total),
        }
    }

    /// Sum of the individual lines (may differ from `total` by rounding)
    pub fn sum_of_lines(&self) -> f64 {
        self.material
            + self.printing
            + self.lamination
            + self.slitter
            + self.pouch_processing
            + self.post_processing
            + self.manufacturing_margin
            + self.duty
            + self.delivery
            + self.sales_markup
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuFilmUsage {
    pub quantity: u32,
    pub theoretical_m: f64,
    pub secured_m: f64,
    pub loss_m: f64,
    pub total_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmUsage {
    pub columns: u8,
    pub calculated_film_width: f64,
    pub printable_width: u32,
    pub film_structure: String,
    pub theoretical_m: f64,
    pub secured_m: f64,
    pub loss_m: f64,
    pub total_m: f64,
    pub weight_kg: f64,
    pub delivery_boxes: u32,
    pub skus: Vec<SkuFilmUsage>,
}

impl FilmUsage {
    fn from_cost(cost: &SkuCostResult) -> Self {
        FilmUsage {
            columns: cost.layout.columns,
            calculated_film_width: cost.layout.calculated_film_width,
            printable_width: cost.layout.printable_width,
            film_structure: cost.structure.describe(),
            theoretical_m: cost.skus.iter().map(|s| s.theoretical_m).sum(),
            secured_m: cost.summary.total_secured_m,
            loss_m: cost.summary.loss_m,
            total_m: cost.summary.total_m,
            weight_kg: round_to(cost.summary.total_weight_kg, 2),
            delivery_boxes: cost.summary.delivery_boxes,
            skus: cost
                .skus
                .iter()
                .map(|s| SkuFilmUsage {
                    quantity: s.quantity,
                    theoretical_m: s.theoretical_m,
                    secured_m: s.secured_m,
                    loss_m: s.loss_m,
                    total_m: s.total_m,
                })
                .collect(),
        }
    }
}

/// A finished quote. Plain data, safe to hand to export collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Total quantity priced (units, or metres for roll film)
    pub quantity: u64,
    /// JPY per unit, to 0.01
    pub unit_price: f64,
    /// Whole JPY
    pub total_price: f64,
    pub breakdown: CostBreakdown,
    pub lead_time_days: u32,
    pub material_width: u32,
    pub film_usage: FilmUsage,
    /// Sales markup actually applied
    pub markup_rate: f64,
    pub currency: String,
    pub valid_until: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_plan: Option<RollPlan>,
    /// Set when inputs had to be repaired before pricing
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Quantity-independent cost of a product, in whole yen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharedCosts {
    /// Minimum slitting plus minimum converting charge
    pub setup_fee: f64,
    /// 20% of the minimum converting charge
    pub tooling_costs: f64,
    /// Laminate material of the minimum run
    pub material_base_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicsReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_quantity: Option<EconomicQuantitySuggestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parallel_options: Vec<ParallelProductionOption>,
}

// ============================================================================
// Engine
// ============================================================================

/// Prices single requests. Cheap to clone; the configuration is shared.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: Arc<PricingConfig>,
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::new(DEFAULT_CONFIG.clone())
    }
}

/// A request after repair, plus what was repaired.
struct Sanitized {
    spec: ProductSpec,
    quantity: QuantityPlan,
    selection: PostProcessingSelection,
    markup_rate: f64,
    degraded: bool,
    warnings: Vec<String>,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        PricingEngine {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price a request. Never fails: bad input yields a `degraded` quote.
    pub fn calculate_quote(&self, request: &QuoteRequest) -> QuoteResult {
        match self.try_calculate_quote(request) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "quote calculation failed, returning empty degraded quote");
                self.empty_quote(request, err.to_string())
            }
        }
    }

    /// Price a request, surfacing internal failures as errors.
    ///
    /// Geometry problems are still repaired rather than reported.
    pub fn try_calculate_quote(&self, request: &QuoteRequest) -> PricingResult<QuoteResult> {
        let config = &*self.config;
        let Sanitized {
            spec,
            quantity,
            selection,
            markup_rate,
            mut degraded,
            mut warnings,
        } = self.sanitize(request);

        let input = SkuCostInput::new(spec.clone(), quantity.clone(), markup_rate).with_post_processing(selection.clone());
        let cost = calculate_sku_cost(&input, config)?;
        warnings.extend(cost.layout.warnings.iter().cloned());

        let roll_plan = match (spec.bag_type, request.roll_count) {
            (BagType::RollFilm, Some(rolls)) => {
                let ordered = quantity.total_quantity().min(u32::MAX as u64) as u32;
                match validate_roll_film_params(ordered, rolls, spec.width_mm, &cost.structure.layers) {
                    Ok(plan) => {
                        warnings.extend(plan.warnings.iter().cloned());
                        Some(plan)
                    }
                    Err(err) => {
                        degraded = true;
                        warnings.push(err.to_string());
                        None
                    }
                }
            }
            (_, Some(_)) => {
                warnings.push("roll_count only applies to roll film and was ignored".to_string());
                None
            }
            _ => None,
        };

        let total_quantity = quantity.total_quantity();
        let breakdown = CostBreakdown::from_krw(&cost.breakdown, config.exchange_rate);
        let total_price = breakdown.total;
        let unit_price = if total_quantity > 0 {
            round_to(total_price / total_quantity as f64, 2)
        } else {
            0.0
        };

        let quoted_on = request.quoted_on.unwrap_or_else(|| Utc::now().date_naive());
        let valid_until = quoted_on
            .checked_add_days(Days::new(config.quote_valid_days.max(0) as u64))
            .unwrap_or(quoted_on);

        if degraded {
            tracing::warn!(warnings = ?warnings, "quote priced from repaired input");
        }

        Ok(QuoteResult {
            quantity: total_quantity,
            unit_price,
            total_price,
            breakdown,
            lead_time_days: lead_time_days(total_quantity, request.delivery.urgency, &selection),
            material_width: cost.layout.material_width,
            film_usage: FilmUsage::from_cost(&cost),
            markup_rate,
            currency: "JPY".to_string(),
            valid_until,
            roll_plan,
            degraded,
            warnings,
        })
    }

    /// Quantity-independent costs of the request's product, from a one-unit run.
    pub fn shared_costs(&self, request: &QuoteRequest) -> PricingResult<SharedCosts> {
        let config = &*self.config;
        let sanitized = self.sanitize(&request.for_quantity(1));
        let input = SkuCostInput::new(sanitized.spec, sanitized.quantity, sanitized.markup_rate)
            .with_post_processing(sanitized.selection);
        let cost = calculate_sku_cost(&input, config)?;

        let yen = |amount: Krw| amount.to_jpy(config.exchange_rate).rounded();
        let processing = cost.breakdown.pouch_processing;
        Ok(SharedCosts {
            setup_fee: yen(cost.breakdown.slitter + processing),
            tooling_costs: yen(processing * 0.2),
            material_base_cost: yen(cost.breakdown.material),
        })
    }

    /// Economic quantity and parallel-lane advice for a single-quantity request.
    pub fn economics(&self, request: &QuoteRequest) -> PricingResult<EconomicsReport> {
        let config = &*self.config;
        let quote = self.try_calculate_quote(request)?;
        let sanitized = self.sanitize(request);
        let quantity = sanitized.quantity.total_quantity().min(u32::MAX as u64) as u32;

        let economic_quantity = if sanitized.quantity.sku_count() == 1 {
            Some(suggest_economic_quantity(
                &sanitized.spec,
                quantity,
                quote.film_usage.columns,
                quote.total_price,
                config,
            )?)
        } else {
            None
        };
        let parallel_options = parallel_production_options(&sanitized.spec, quote.film_usage.secured_m, config)?;

        Ok(EconomicsReport {
            economic_quantity,
            parallel_options,
        })
    }

    // === Internals ===

    fn sanitize(&self, request: &QuoteRequest) -> Sanitized {
        let mut spec = request.spec.clone();
        let mut warnings = Vec::new();

        let problems = spec.geometry_problems();
        let degraded_geometry = !problems.is_empty();
        warnings.extend(problems);

        let repair = |value: f64| if value.is_finite() && value > 0.0 { value } else { MIN_DIMENSION_MM };
        spec.width_mm = repair(spec.width_mm);
        if spec.bag_type != BagType::RollFilm {
            spec.height_mm = repair(spec.height_mm);
        }
        if !spec.depth_mm.is_finite() || spec.depth_mm < 0.0 {
            spec.depth_mm = 0.0;
        }
        if let Some(side) = spec.side_width_mm {
            if !side.is_finite() || side < 0.0 {
                spec.side_width_mm = None;
            }
        }
        if let Some(pitch) = spec.pitch_mm {
            if !pitch.is_finite() || pitch <= 0.0 {
                spec.pitch_mm = None;
            }
        }
        if matches!(spec.bag_type, BagType::StandUp | BagType::Gusset | BagType::Box) && spec.gusset_mm() <= 0.0 {
            spec.depth_mm = MIN_DIMENSION_MM;
        }

        let mut zero_quantity = false;
        let repaired: Vec<u32> = request
            .quantity
            .quantities()
            .into_iter()
            .map(|q| {
                if q == 0 {
                    zero_quantity = true;
                    1
                } else {
                    q
                }
            })
            .collect();
        let quantity = if zero_quantity {
            warnings.push("Zero quantity priced as a single unit".to_string());
            match request.quantity {
                QuantityPlan::Single { .. } => QuantityPlan::single(1),
                QuantityPlan::Skus(_) => QuantityPlan::skus(repaired).unwrap_or_else(|_| request.quantity.clone()),
            }
        } else {
            request.quantity.clone()
        };

        let (selection, unknown) = PostProcessingSelection::from_ids(request.post_processing_options.as_slice());
        for id in unknown {
            warnings.push(format!("Unknown post-processing option '{}' ignored", id));
        }

        let default_markup = match request.delivery.location {
            DeliveryLocation::Domestic => self.config.domestic_markup,
            DeliveryLocation::International => self.config.international_markup,
        };
        let markup_rate = match request.markup_rate {
            Some(rate) if rate.is_finite() && (0.0..=MAX_MARKUP_RATE).contains(&rate) => rate,
            Some(rate) => {
                warnings.push(format!(
                    "Markup rate {} outside 0..={} ignored; default {} applied",
                    rate, MAX_MARKUP_RATE, default_markup
                ));
                default_markup
            }
            None => default_markup,
        };

        Sanitized {
            spec,
            quantity,
            selection,
            markup_rate,
            degraded: degraded_geometry || zero_quantity,
            warnings,
        }
    }

    fn empty_quote(&self, request: &QuoteRequest, reason: String) -> QuoteResult {
        let quoted_on = request.quoted_on.unwrap_or_else(|| Utc::now().date_naive());
        QuoteResult {
            quantity: request.quantity.total_quantity(),
            unit_price: 0.0,
            total_price: 0.0,
            breakdown: CostBreakdown::default(),
            lead_time_days: 0,
            material_width: 0,
            film_usage: FilmUsage {
                columns: 0,
                calculated_film_width: 0.0,
                printable_width: 0,
                film_structure: String::new(),
                theoretical_m: 0.0,
                secured_m: 0.0,
                loss_m: 0.0,
                total_m: 0.0,
                weight_kg: 0.0,
                delivery_boxes: 0,
                skus: Vec::new(),
            },
            markup_rate: request.markup_rate.unwrap_or(self.config.domestic_markup),
            currency: "JPY".to_string(),
            valid_until: quoted_on,
            roll_plan: None,
            degraded: true,
            warnings: vec![reason],
        }
    }
}

/// Production lead time in days.
pub fn lead_time_days(total_quantity: u64, urgency: Urgency, selection: &PostProcessingSelection) -> u32 {
    let mut days = match urgency {
        Urgency::Standard => 14,
        Urgency::Express => 7,
    };
    if total_quantity >= 10_000 {
        days += 7;
    } else if total_quantity >= 5_000 {
        days += 3;
    }
    if selection.combined_multiplier() > 1.0 {
        days += 2;
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialId;
    use crate::product::DeliveryTerms;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn flat_a() -> QuoteRequest {
        QuoteRequest::new(
            ProductSpec::pouch(BagType::FlatThreeSide, 100.0, 160.0, MaterialId::PetAl),
            QuantityPlan::single(10_000),
        )
        .quoted_on(date())
    }

    fn stand_up_b() -> QuoteRequest {
        QuoteRequest::new(
            ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0),
            QuantityPlan::single(10_000),
        )
        .quoted_on(date())
    }

    #[test]
    fn test_reference_flat_pouch() {
        let quote = PricingEngine::default().calculate_quote(&flat_a());
        assert!(!quote.degraded);
        assert_eq!(quote.currency, "JPY");
        // Reference: ≈37.7 JPY per unit, ≈376,940 JPY total, ±20%
        assert!((quote.unit_price - 37.7).abs() <= 37.7 * 0.20, "unit {}", quote.unit_price);
        assert!((quote.total_price - 376_940.0).abs() <= 376_940.0 * 0.20, "total {}", quote.total_price);
        assert_eq!(quote.film_usage.calculated_film_width, 711.0);
    }

    #[test]
    fn test_reference_stand_up_pouch() {
        let quote = PricingEngine::default().calculate_quote(&stand_up_b());
        assert_eq!(quote.film_usage.columns, 2);
        assert_eq!(quote.film_usage.calculated_film_width, 700.0);
        assert_eq!(quote.material_width, 760);
        assert!((quote.unit_price - 32.4).abs() <= 1.5, "unit {}", quote.unit_price);
        assert_eq!(quote.film_usage.total_m, 900.0);
    }

    #[test]
    fn test_breakdown_rounding() {
        let quote = PricingEngine::default().calculate_quote(&stand_up_b());
        let b = quote.breakdown;
        for line in [b.material, b.printing, b.lamination, b.duty, b.delivery, b.total] {
            assert_eq!(line, line.round());
        }
        // Independently rounded lines stay within a few yen of the total
        assert!((b.sum_of_lines() - b.total).abs() <= 6.0);
        assert_eq!(quote.total_price, b.total);
    }

    #[test]
    fn test_markup_override_takes_precedence() {
        let engine = PricingEngine::default();
        let default = engine.calculate_quote(&stand_up_b());
        let custom = engine.calculate_quote(&stand_up_b().with_markup_rate(0.35));
        assert_eq!(default.markup_rate, 0.20);
        assert_eq!(custom.markup_rate, 0.35);
        // Import cost identical, so the totals scale by 1.35 / 1.20
        let ratio = custom.total_price / default.total_price;
        assert!((ratio - 1.35 / 1.20).abs() < 1e-4);
        // Manufacturing margin untouched by the override
        assert_eq!(custom.breakdown.manufacturing_margin, default.breakdown.manufacturing_margin);

        let international = engine.calculate_quote(&stand_up_b().with_delivery(DeliveryTerms {
            location: DeliveryLocation::International,
            urgency: Urgency::Standard,
        }));
        assert_eq!(international.markup_rate, 0.50);

        let silly = engine.calculate_quote(&stand_up_b().with_markup_rate(-1.0));
        assert_eq!(silly.markup_rate, 0.20);
        assert!(!silly.warnings.is_empty());
    }

    #[test]
    fn test_post_processing_changes_price() {
        let engine = PricingEngine::default();
        let plain = engine.calculate_quote(&stand_up_b());
        let zipper = engine.calculate_quote(&stand_up_b().with_options(&["zipper-yes"]));
        let matte = engine.calculate_quote(&stand_up_b().with_options(&["matte"]));
        assert!(zipper.total_price > plain.total_price);
        assert!(matte.total_price > plain.total_price);
        assert!(zipper.breakdown.post_processing > 0.0);
        assert_eq!(matte.breakdown.post_processing, 0.0);
        assert_eq!(zipper.lead_time_days, plain.lead_time_days + 2);
    }

    #[test]
    fn test_unknown_option_is_a_warning() {
        let quote = PricingEngine::default().calculate_quote(&stand_up_b().with_options(&["gold-foil"]));
        assert!(!quote.degraded);
        assert!(quote.warnings.iter().any(|w| w.contains("gold-foil")));
    }

    #[test]
    fn test_degenerate_geometry_degrades() {
        let mut request = flat_a();
        request.spec.width_mm = 0.0;
        request.spec.height_mm = -50.0;
        let quote = PricingEngine::default().calculate_quote(&request);
        assert!(quote.degraded);
        assert!(quote.total_price > 0.0);
        assert!(quote.warnings.len() >= 2);

        let mut nan = flat_a();
        nan.spec.width_mm = f64::NAN;
        assert!(PricingEngine::default().calculate_quote(&nan).degraded);

        let mut flat_stand_up = stand_up_b();
        flat_stand_up.spec.depth_mm = 0.0;
        let quote = PricingEngine::default().calculate_quote(&flat_stand_up);
        assert!(quote.degraded);
        assert!(quote.total_price > 0.0);

        let zero = flat_a().for_quantity(0);
        let quote = PricingEngine::default().calculate_quote(&zero);
        assert!(quote.degraded);
        assert_eq!(quote.quantity, 1);
    }

    #[test]
    fn test_lead_time() {
        let none = PostProcessingSelection::default();
        assert_eq!(lead_time_days(1_000, Urgency::Standard, &none), 14);
        assert_eq!(lead_time_days(5_000, Urgency::Standard, &none), 17);
        assert_eq!(lead_time_days(10_000, Urgency::Express, &none), 14);
        let (valve, _) = PostProcessingSelection::from_ids(&["valve-yes"]);
        assert_eq!(lead_time_days(1_000, Urgency::Express, &valve), 9);
        let (gloss, _) = PostProcessingSelection::from_ids(&["glossy", "zipper-no"]);
        assert_eq!(lead_time_days(1_000, Urgency::Express, &gloss), 7);
    }

    #[test]
    fn test_valid_until() {
        let quote = PricingEngine::default().calculate_quote(&flat_a());
        assert_eq!(quote.valid_until, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
    }

    #[test]
    fn test_unit_price_falls_with_quantity() {
        let engine = PricingEngine::default();
        let small = engine.calculate_quote(&stand_up_b().for_quantity(100));
        let large = engine.calculate_quote(&stand_up_b().for_quantity(5_000));
        assert!(small.unit_price > large.unit_price);
    }

    #[test]
    fn test_multi_sku_quote() {
        let mut request = stand_up_b();
        request.quantity = QuantityPlan::skus(vec![3_000, 3_000, 4_000]).unwrap();
        let quote = PricingEngine::default().calculate_quote(&request);
        assert_eq!(quote.quantity, 10_000);
        assert_eq!(quote.film_usage.skus.len(), 3);
        assert_eq!(quote.film_usage.loss_m, 400.0);
        // Three separate runs cost more than one combined run
        let single = PricingEngine::default().calculate_quote(&stand_up_b());
        assert!(quote.total_price > single.total_price);
    }

    #[test]
    fn test_roll_film_quote() {
        let request = QuoteRequest::new(
            ProductSpec::roll_film(300.0, MaterialId::PetTransparent),
            QuantityPlan::single(2_000),
        )
        .with_roll_count(4)
        .quoted_on(date());
        let quote = PricingEngine::default().calculate_quote(&request);
        assert!(!quote.degraded);
        assert_eq!(quote.breakdown.pouch_processing, 0.0);
        assert_eq!(quote.material_width, 590);
        assert_eq!(quote.film_usage.total_m, 2_400.0);
        let plan = quote.roll_plan.expect("roll plan");
        assert_eq!(plan.roll_lengths_m, vec![500, 500, 500, 500]);

        let too_many = request.clone().with_roll_count(60);
        let quote = PricingEngine::default().calculate_quote(&too_many);
        assert!(quote.degraded);
        assert!(quote.roll_plan.is_none());
        assert!(quote.total_price > 0.0);
    }

    #[test]
    fn test_shared_costs() {
        let shared = PricingEngine::default().shared_costs(&stand_up_b()).unwrap();
        // (30,000 + 250,000) KRW * 0.12
        assert_eq!(shared.setup_fee, 33_600.0);
        assert_eq!(shared.tooling_costs, 6_000.0);
        assert!(shared.material_base_cost > 0.0);
    }

    #[test]
    fn test_economics_report() {
        let engine = PricingEngine::default();
        let report = engine.economics(&stand_up_b().for_quantity(9_500)).unwrap();
        let suggestion = report.economic_quantity.unwrap();
        assert_eq!(suggestion.economic_quantity, 10_000);
        assert!(report.parallel_options.is_empty());

        let roll = QuoteRequest::new(ProductSpec::roll_film(200.0, MaterialId::PetAl), QuantityPlan::single(1_000));
        let report = engine.economics(&roll).unwrap();
        assert!(!report.parallel_options.is_empty());
    }

    #[test]
    fn test_quote_serializes() {
        let quote = PricingEngine::default().calculate_quote(&stand_up_b());
        let json = serde_json::to_string(&quote).unwrap();
        let back: QuoteResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote);
    }
}
