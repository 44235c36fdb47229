//! # SKU / Pouch Cost Calculation
//!
//! Turns a product and its SKU quantities into film usage and a KRW cost
//! chain per SKU.
//!
//! ## Film Usage
//!
//! ```text
//! theoretical_m = quantity / ((1000 / pitch_mm) × columns)
//! secured_m     = floor                      if theoretical_m ≤ floor
//!               = ⌈theoretical_m / 50⌉ × 50   otherwise
//! total_m       = secured_m + 400 / sku_count
//! ```
//!
//! The floor is 500 m for a single-SKU order and 300 m per SKU when several
//! SKUs share a run. The 400 m loss is charged once per run.
//!
//! ## Cost Chain (per SKU, KRW)
//!
//! 1. base = (film + pouch processing) × post-processing multiplier
//! 2. manufacturer price = base × (1 + margin)
//! 3. duty = manufacturer price × duty rate
//! 4. import cost = manufacturer price + duty + delivery
//! 5. total = import cost × (1 + sales markup)
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::sku_cost::{calculate_sku_cost, SkuCostInput};
//! use quote_core::config::PricingConfig;
//! use quote_core::materials::MaterialId;
//! use quote_core::product::{BagType, ProductSpec, QuantityPlan};
//!
//! let spec = ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0);
//! let input = SkuCostInput::new(spec, QuantityPlan::single(10_000), 0.20);
//! let result = calculate_sku_cost(&input, &PricingConfig::default()).unwrap();
//! assert_eq!(result.summary.total_m, 900.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::film_cost::{self, FilmCostInput, FilmCostResult};
use crate::calculations::layout::{
    determine_material_width, determine_material_width_for_pouch, oversize_warning, printable_width,
    MaterialWidthSelection,
};
use crate::config::PricingConfig;
use crate::errors::{PricingError, PricingResult};
use crate::materials::FilmStructure;
use crate::post_processing::PostProcessingSelection;
use crate::product::{BagType, ProductSpec, QuantityPlan};
use crate::units::Krw;

/// Input to the SKU calculator. `sales_markup` is already resolved
/// (customer override or the delivery default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuCostInput {
    pub spec: ProductSpec,
    pub quantities: QuantityPlan,
    #[serde(default)]
    pub post_processing: PostProcessingSelection,
    pub sales_markup: f64,
}

impl SkuCostInput {
    pub fn new(spec: ProductSpec, quantities: QuantityPlan, sales_markup: f64) -> Self {
        SkuCostInput {
            spec,
            quantities,
            post_processing: PostProcessingSelection::default(),
            sales_markup,
        }
    }

    pub fn with_post_processing(mut self, post_processing: PostProcessingSelection) -> Self {
        self.post_processing = post_processing;
        self
    }

    pub fn validate(&self) -> PricingResult<()> {
        if let Some(problem) = self.spec.geometry_problems().into_iter().next() {
            return Err(PricingError::invalid_input("spec", self.spec.bag_type.code(), problem));
        }
        if !self.sales_markup.is_finite() || self.sales_markup < 0.0 {
            return Err(PricingError::invalid_input(
                "sales_markup",
                self.sales_markup.to_string(),
                "Markup must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// KRW cost chain for one SKU (or the sum over all SKUs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KrwBreakdown {
    pub material: Krw,
    pub printing: Krw,
    pub lamination: Krw,
    pub slitter: Krw,
    pub pouch_processing: Krw,
    /// Cost added by multiplier options on top of film + processing
    pub post_processing: Krw,
    pub manufacturing_margin: Krw,
    pub duty: Krw,
    pub delivery: Krw,
    pub sales_markup: Krw,
    pub total: Krw,
}

impl KrwBreakdown {
    /// Film + processing + post-processing, before margin
    pub fn base_cost(&self) -> Krw {
        self.material + self.printing + self.lamination + self.slitter + self.pouch_processing + self.post_processing
    }

    fn accumulate(&mut self, other: &KrwBreakdown) {
        self.material += other.material;
        self.printing += other.printing;
        self.lamination += other.lamination;
        self.slitter += other.slitter;
        self.pouch_processing += other.pouch_processing;
        self.post_processing += other.post_processing;
        self.manufacturing_margin += other.manufacturing_margin;
        self.duty += other.duty;
        self.delivery += other.delivery;
        self.sales_markup += other.sales_markup;
        self.total += other.total;
    }
}

/// One SKU line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuCostLine {
    pub sku_index: usize,
    pub quantity: u32,
    pub theoretical_m: f64,
    pub secured_m: f64,
    pub loss_m: f64,
    pub total_m: f64,
    pub film: FilmCostResult,
    pub breakdown: KrwBreakdown,
}

/// Run-level film usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmUsageSummary {
    pub total_secured_m: f64,
    pub loss_m: f64,
    pub total_m: f64,
    pub total_weight_kg: f64,
    pub delivery_boxes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuCostResult {
    pub layout: MaterialWidthSelection,
    pub structure: FilmStructure,
    pub skus: Vec<SkuCostLine>,
    pub summary: FilmUsageSummary,
    /// Sum of every SKU's chain
    pub breakdown: KrwBreakdown,
}

// === Film usage rules ===

/// Print repeat along the web (mm)
pub fn pitch_mm(spec: &ProductSpec) -> f64 {
    match spec.bag_type {
        BagType::Box | BagType::Gusset => spec.gusset_mm() + spec.width_mm,
        BagType::RollFilm => spec.pitch_mm.unwrap_or(spec.width_mm),
        _ => spec.width_mm,
    }
}

/// Film metres strictly needed for a quantity. Roll film quantities are metres.
pub fn theoretical_meters(spec: &ProductSpec, quantity: u32, columns: u8) -> f64 {
    if spec.bag_type == BagType::RollFilm {
        return quantity as f64;
    }
    let pouches_per_metre = (1000.0 / pitch_mm(spec)) * columns.max(1) as f64;
    quantity as f64 / pouches_per_metre
}

/// Secured length for one SKU: the floor, or the need rounded up to the step.
pub fn secured_meters(theoretical_m: f64, sku_count: usize, config: &PricingConfig) -> f64 {
    let floor = if sku_count <= 1 {
        config.single_sku_floor_m
    } else {
        config.multi_sku_floor_m
    };
    if theoretical_m <= floor {
        floor
    } else {
        (theoretical_m / config.length_step_m).ceil() * config.length_step_m
    }
}

/// Pouch converting charge (KRW). Roll film has none.
pub fn pouch_processing_cost(bag_type: BagType, width_mm: f64, quantity: u32) -> Krw {
    match bag_type.processing_rate() {
        Some((coefficient, minimum)) => {
            let width_cm = width_mm / 10.0;
            Krw((width_cm * coefficient * quantity as f64).max(minimum))
        }
        None => Krw(0.0),
    }
}

/// Layout for any bag type. Roll film is printed one lane at its own width.
pub fn resolve_layout(spec: &ProductSpec) -> MaterialWidthSelection {
    if spec.bag_type == BagType::RollFilm {
        let material_width = determine_material_width(spec.width_mm);
        MaterialWidthSelection {
            material_width,
            printable_width: printable_width(material_width),
            columns: 1,
            calculated_film_width: spec.width_mm,
            warnings: oversize_warning(spec.width_mm).into_iter().collect(),
        }
    } else {
        determine_material_width_for_pouch(spec)
    }
}

// === Calculation ===

/// Cost every SKU of an order.
pub fn calculate_sku_cost(input: &SkuCostInput, config: &PricingConfig) -> PricingResult<SkuCostResult> {
    input.validate()?;

    let spec = &input.spec;
    let layout = resolve_layout(spec);
    let structure = FilmStructure::resolve(spec.material_id, spec.thickness);
    let quantities = input.quantities.quantities();
    let sku_count = quantities.len();
    let loss_share = config.loss_m / sku_count as f64;
    let multiplier = input.post_processing.combined_multiplier();
    let finish_rate = input.post_processing.finish_rate_per_m2(config);

    let mut skus = Vec::with_capacity(sku_count);
    for (sku_index, &quantity) in quantities.iter().enumerate() {
        let theoretical_m = theoretical_meters(spec, quantity, layout.columns);
        let secured_m = secured_meters(theoretical_m, sku_count, config);
        let total_m = secured_m + loss_share;

        let film_input = FilmCostInput::new(structure.layers.clone(), layout.material_width, total_m)
            .with_finish_rate(finish_rate);
        let film = film_cost::calculate(&film_input, config)?;
        let processing = pouch_processing_cost(spec.bag_type, spec.width_mm, quantity);

        let breakdown = cost_chain(&film, processing, multiplier, input.sales_markup, config);

        skus.push(SkuCostLine {
            sku_index,
            quantity,
            theoretical_m,
            secured_m,
            loss_m: loss_share,
            total_m,
            film,
            breakdown,
        });
    }

    let mut breakdown = KrwBreakdown::default();
    for line in &skus {
        breakdown.accumulate(&line.breakdown);
    }

    let total_secured_m: f64 = skus.iter().map(|s| s.secured_m).sum();
    let summary = FilmUsageSummary {
        total_secured_m,
        loss_m: config.loss_m,
        total_m: total_secured_m + config.loss_m,
        total_weight_kg: skus.iter().map(|s| s.film.total_weight_kg).sum(),
        delivery_boxes: skus.iter().map(|s| s.film.delivery_boxes).sum(),
    };

    tracing::debug!(
        bag_type = spec.bag_type.code(),
        sku_count,
        total_m = summary.total_m,
        total_krw = breakdown.total.0,
        "costed production run"
    );

    Ok(SkuCostResult {
        layout,
        structure,
        skus,
        summary,
        breakdown,
    })
}

fn cost_chain(
    film: &FilmCostResult,
    pouch_processing: Krw,
    multiplier: f64,
    sales_markup: f64,
    config: &PricingConfig,
) -> KrwBreakdown {
    let before_options = film.film_cost + pouch_processing;
    let base = before_options * multiplier;

    let manufacturer_price = base * (1.0 + config.manufacturing_margin);
    let duty = manufacturer_price * config.duty_rate;
    let import_cost = manufacturer_price + duty + film.delivery_cost;
    let markup = import_cost * sales_markup;

    KrwBreakdown {
        material: film.material_cost,
        printing: film.printing_cost,
        lamination: film.lamination_cost,
        slitter: film.slitter_cost,
        pouch_processing,
        post_processing: base - before_options,
        manufacturing_margin: manufacturer_price - base,
        duty,
        delivery: film.delivery_cost,
        sales_markup: markup,
        total: import_cost + markup,
    }
}
