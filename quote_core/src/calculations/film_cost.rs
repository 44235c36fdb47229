//! # Film Cost Calculation
//!
//! Converts a length of printed laminate on a stock roll into KRW costs. All
//! area-based charges use the full stock roll width, since the trim is bought
//! and processed along with the printed web.
//!
//! ## Cost Lines (KRW)
//!
//! - **Material**: Σ thickness_mm × width_m × length_m × density × unit price
//! - **Printing**: length_m × print rate, plus a finish surcharge per m²
//! - **Lamination**: width_m × length_m × rate × (layers − 1)
//! - **Slitting**: max(minimum, length_m × rate)
//! - **Delivery**: ⌈weight / box capacity⌉ × box rate (kept separate from the
//!   film total because it is added after margin and duty)
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::film_cost::{calculate, FilmCostInput};
//! use quote_core::config::PricingConfig;
//! use quote_core::materials::{FilmStructure, MaterialId, ThicknessTier};
//!
//! let structure = FilmStructure::resolve(MaterialId::PetAl, ThicknessTier::Standard);
//! let input = FilmCostInput::new(structure.layers, 760, 900.0);
//! let result = calculate(&input, &PricingConfig::default()).unwrap();
//! assert_eq!(result.lamination_count, 3);
//! assert_eq!(result.delivery_boxes, 4);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::errors::{PricingError, PricingResult};
use crate::materials::{FilmLayer, FilmMaterial};
use crate::units::Krw;

/// A length of laminate to be costed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmCostInput {
    pub layers: Vec<FilmLayer>,
    /// Stock roll width (mm)
    pub material_width_mm: u32,
    /// Film length including loss (m)
    pub length_m: f64,
    /// Finish surcharge per m² (0 for the default gloss)
    #[serde(default)]
    pub finish_rate_per_m2: f64,
}

impl FilmCostInput {
    pub fn new(layers: Vec<FilmLayer>, material_width_mm: u32, length_m: f64) -> Self {
        FilmCostInput {
            layers,
            material_width_mm,
            length_m,
            finish_rate_per_m2: 0.0,
        }
    }

    pub fn with_finish_rate(mut self, rate_per_m2: f64) -> Self {
        self.finish_rate_per_m2 = rate_per_m2;
        self
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.layers.is_empty() {
            return Err(PricingError::invalid_input("layers", "[]", "At least one layer is required"));
        }
        if self.material_width_mm == 0 {
            return Err(PricingError::invalid_input("material_width_mm", "0", "Width must be positive"));
        }
        if !self.length_m.is_finite() || self.length_m <= 0.0 {
            return Err(PricingError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Length must be positive",
            ));
        }
        if let Some(layer) = self.layers.iter().find(|l| !(l.thickness_um > 0.0)) {
            return Err(PricingError::invalid_input(
                "thickness_um",
                layer.thickness_um.to_string(),
                format!("{} layer thickness must be positive", layer.material),
            ));
        }
        Ok(())
    }

    fn width_m(&self) -> f64 {
        self.material_width_mm as f64 / 1000.0
    }
}

/// Cost of one laminate layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerCost {
    pub material: FilmMaterial,
    pub thickness_um: f64,
    pub weight_kg: f64,
    pub unit_price_krw_per_kg: f64,
    pub cost: Krw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmCostResult {
    pub layer_costs: Vec<LayerCost>,
    pub material_cost: Krw,

    pub printing_basic: Krw,
    pub printing_finish: Krw,
    pub printing_cost: Krw,

    /// Number of laminated interfaces
    pub lamination_count: usize,
    pub lamination_cost: Krw,

    /// Length-based slitting charge before the minimum applies
    pub slitter_calculated: Krw,
    pub slitter_cost: Krw,

    pub total_weight_kg: f64,
    pub delivery_boxes: u32,
    pub delivery_cost: Krw,

    /// Material + printing + lamination + slitting (delivery excluded)
    pub film_cost: Krw,
}

/// Cost a length of laminate.
pub fn calculate(input: &FilmCostInput, config: &PricingConfig) -> PricingResult<FilmCostResult> {
    input.validate()?;

    let width_m = input.width_m();
    let length_m = input.length_m;

    // === Materials ===
    let layer_costs: Vec<LayerCost> = input
        .layers
        .iter()
        .map(|layer| {
            let weight_kg = layer.thickness_mm() * width_m * length_m * layer.material.density_g_cm3();
            let unit_price = config.unit_price(layer.material);
            LayerCost {
                material: layer.material,
                thickness_um: layer.thickness_um,
                weight_kg,
                unit_price_krw_per_kg: unit_price,
                cost: Krw(weight_kg * unit_price),
            }
        })
        .collect();
    let material_cost: Krw = layer_costs.iter().map(|l| l.cost).sum();
    let total_weight_kg: f64 = layer_costs.iter().map(|l| l.weight_kg).sum();

    // === Printing ===
    let printing_basic = Krw(length_m * config.printing_rate_per_m);
    let printing_finish = Krw(width_m * input.finish_rate_per_m2 * length_m);
    let printing_cost = printing_basic + printing_finish;

    // === Lamination ===
    let lamination_count = input.layers.len().saturating_sub(1);
    let lamination_cost = Krw(width_m * length_m * config.lamination_rate_per_m2 * lamination_count as f64);

    // === Slitting ===
    let slitter_calculated = Krw(length_m * config.slitter_rate_per_m);
    let slitter_cost = Krw(slitter_calculated.0.max(config.slitter_minimum));

    // === Delivery ===
    let delivery_boxes = (total_weight_kg / config.delivery_box_capacity_kg).ceil().max(0.0) as u32;
    let delivery_cost = Krw(delivery_boxes as f64 * config.delivery_rate_per_box);

    let film_cost = material_cost + printing_cost + lamination_cost + slitter_cost;

    Ok(FilmCostResult {
        layer_costs,
        material_cost,
        printing_basic,
        printing_finish,
        printing_cost,
        lamination_count,
        lamination_cost,
        slitter_calculated,
        slitter_cost,
        total_weight_kg,
        delivery_boxes,
        delivery_cost,
        film_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{FilmStructure, MaterialId, ThicknessTier};

    fn pet_al_input(length_m: f64) -> FilmCostInput {
        let structure = FilmStructure::resolve(MaterialId::PetAl, ThicknessTier::Standard);
        FilmCostInput::new(structure.layers, 760, length_m)
    }

    #[test]
    fn test_material_cost_per_layer() {
        let result = calculate(&pet_al_input(900.0), &PricingConfig::default()).unwrap();

        // PET12: 0.012 * 0.76 * 900 * 1.40 = 11.4912 kg @ 2800
        let pet = &result.layer_costs[0];
        assert!((pet.weight_kg - 11.4912).abs() < 1e-6);
        assert!((pet.cost.0 - 11.4912 * 2800.0).abs() < 1e-3);

        // AL7: 0.007 * 0.76 * 900 * 2.71 = 12.97548 kg @ 7800
        let al = &result.layer_costs[1];
        assert!((al.cost.0 - 12.97548 * 7800.0).abs() < 1e-3);

        assert!((result.total_weight_kg - 92.59308).abs() < 1e-4);
    }

    #[test]
    fn test_processing_lines() {
        let result = calculate(&pet_al_input(900.0), &PricingConfig::default()).unwrap();
        assert!((result.printing_cost.0 - 427_500.0).abs() < 1e-6);
        assert_eq!(result.printing_finish, Krw(0.0));
        // 0.76 * 900 * 75 * 3
        assert!((result.lamination_cost.0 - 153_900.0).abs() < 1e-6);
        // 9,000 calculated, minimum 30,000
        assert!((result.slitter_calculated.0 - 9_000.0).abs() < 1e-9);
        assert_eq!(result.slitter_cost, Krw(30_000.0));
        assert_eq!(result.delivery_boxes, 4);
        assert!((result.delivery_cost.0 - 511_920.0).abs() < 1e-6);
    }

    #[test]
    fn test_matte_surcharge() {
        let input = pet_al_input(1000.0).with_finish_rate(20.0);
        let result = calculate(&input, &PricingConfig::default()).unwrap();
        // 0.76 * 20 * 1000
        assert!((result.printing_finish.0 - 15_200.0).abs() < 1e-6);
    }

    #[test]
    fn test_long_runs_exceed_slitter_minimum() {
        let result = calculate(&pet_al_input(5000.0), &PricingConfig::default()).unwrap();
        assert!((result.slitter_cost.0 - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_input() {
        assert!(calculate(&pet_al_input(0.0), &PricingConfig::default()).is_err());
        let empty = FilmCostInput::new(vec![], 590, 100.0);
        assert_eq!(
            calculate(&empty, &PricingConfig::default()).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
    }
}
