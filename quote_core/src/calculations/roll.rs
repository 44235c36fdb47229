//! # Roll Geometry & Weight Constraints
//!
//! Film weight and length math for finished rolls. A roll may weigh at most
//! 29 kg including its 500 g core, which leaves a 28.5 kg film budget.
//!
//! Weight of one layer over a length of film:
//!
//! ```text
//! grams = thickness_mm × width_m × length_m × density_g_cm3 × 1000
//! ```
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::roll::{calculate_max_roll_length, validate_roll_film_params};
//! use quote_core::materials::{FilmStructure, MaterialId, ThicknessTier};
//!
//! let structure = FilmStructure::resolve(MaterialId::PetAl, ThicknessTier::Standard);
//! let max_len = calculate_max_roll_length(300.0, &structure.layers);
//!
//! let plan = validate_roll_film_params(1501, 3, 300.0, &structure.layers).unwrap();
//! assert_eq!(plan.roll_lengths_m, vec![501, 500, 500]);
//! assert!(plan.roll_lengths_m[0] <= max_len);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};
use crate::materials::FilmLayer;

/// Paper core per roll (g)
pub const CORE_WEIGHT_G: f64 = 500.0;
/// Hard cap for a finished roll (g)
pub const MAX_ROLL_WEIGHT_G: f64 = 29_000.0;
/// Film weight allowed on one roll (g)
pub const FILM_WEIGHT_BUDGET_G: f64 = MAX_ROLL_WEIGHT_G - CORE_WEIGHT_G;
/// Rolls heavier than this get a handling warning (g)
pub const SOFT_ROLL_WEIGHT_G: f64 = 25_000.0;
/// Shortest roll the slitter produces (m)
pub const MIN_ROLL_LENGTH_M: u32 = 50;
/// Most rolls per order line
pub const MAX_ROLL_COUNT: u32 = 50;

/// Which roll rule a request broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollViolation {
    /// Roll count outside 1..=50
    RollCount,
    /// A roll would be shorter than 50 m
    MinLength,
    /// A roll would exceed the weight cap
    MaxLength,
    /// Width or layers make the weight undefined
    Geometry,
}

/// Weight of one roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollWeight {
    pub film_weight_g: f64,
    pub core_weight_g: f64,
    pub total_weight_g: f64,
}

/// Accepted roll split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollPlan {
    pub roll_lengths_m: Vec<u32>,
    pub roll_weights: Vec<RollWeight>,
    pub max_roll_length_m: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Split `total` metres across `count` rolls, lengths differing by at most 1.
///
/// The remainder goes one metre at a time to the first rolls.
pub fn distribute_length_evenly(total: u32, count: u32) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let base = total / count;
    let remainder = total % count;
    (0..count).map(|i| if i < remainder { base + 1 } else { base }).collect()
}

/// Thickness-weighted mean density of a laminate (g/cm³)
pub fn calculate_average_density(layers: &[FilmLayer]) -> f64 {
    let total_thickness: f64 = layers.iter().map(|l| l.thickness_um).sum();
    if total_thickness <= 0.0 {
        return 0.0;
    }
    layers
        .iter()
        .map(|l| l.thickness_um * l.material.density_g_cm3())
        .sum::<f64>()
        / total_thickness
}

/// Film weight of one metre of laminate at this width (g)
pub fn weight_per_metre_g(width_mm: f64, layers: &[FilmLayer]) -> f64 {
    let width_m = width_mm / 1000.0;
    layers
        .iter()
        .map(|l| l.thickness_mm() * width_m * l.material.density_g_cm3() * 1000.0)
        .sum()
}

pub fn calculate_roll_weight(width_mm: f64, length_m: f64, layers: &[FilmLayer]) -> RollWeight {
    let film_weight_g = weight_per_metre_g(width_mm, layers) * length_m;
    RollWeight {
        film_weight_g,
        core_weight_g: CORE_WEIGHT_G,
        total_weight_g: film_weight_g + CORE_WEIGHT_G,
    }
}

/// Longest roll (whole metres) whose film stays within the 28.5 kg budget.
///
/// Returns 0 when the weight per metre is not a positive number.
pub fn calculate_max_roll_length(width_mm: f64, layers: &[FilmLayer]) -> u32 {
    let per_metre = weight_per_metre_g(width_mm, layers);
    if !per_metre.is_finite() || per_metre <= 0.0 {
        return 0;
    }
    let max = (FILM_WEIGHT_BUDGET_G / per_metre).floor();
    if max >= u32::MAX as f64 {
        u32::MAX
    } else {
        max as u32
    }
}

/// Check and split a roll film order.
pub fn validate_roll_film_params(
    total_length_m: u32,
    roll_count: u32,
    width_mm: f64,
    layers: &[FilmLayer],
) -> PricingResult<RollPlan> {
    if roll_count == 0 || roll_count > MAX_ROLL_COUNT {
        return Err(PricingError::roll_constraint(
            RollViolation::RollCount,
            format!("Roll count must be between 1 and {} (got {})", MAX_ROLL_COUNT, roll_count),
        ));
    }

    let max_roll_length_m = calculate_max_roll_length(width_mm, layers);
    if max_roll_length_m == 0 {
        return Err(PricingError::roll_constraint(
            RollViolation::Geometry,
            format!("Cannot compute roll weight for width {} mm", width_mm),
        ));
    }

    let roll_lengths_m = distribute_length_evenly(total_length_m, roll_count);
    let shortest = roll_lengths_m.iter().copied().min().unwrap_or(0);
    let longest = roll_lengths_m.iter().copied().max().unwrap_or(0);

    if shortest < MIN_ROLL_LENGTH_M {
        return Err(PricingError::roll_constraint(
            RollViolation::MinLength,
            format!(
                "Each roll needs at least {} m; {} m over {} rolls gives {} m",
                MIN_ROLL_LENGTH_M, total_length_m, roll_count, shortest
            ),
        ));
    }

    if longest > max_roll_length_m {
        let min_rolls = total_length_m.div_ceil(max_roll_length_m);
        return Err(PricingError::roll_constraint(
            RollViolation::MaxLength,
            format!(
                "Rolls of {} m exceed the {} m limit for a {:.0} kg roll at {} mm; use at least {} rolls",
                longest,
                max_roll_length_m,
                MAX_ROLL_WEIGHT_G / 1000.0,
                width_mm,
                min_rolls
            ),
        ));
    }

    let roll_weights: Vec<RollWeight> = roll_lengths_m
        .iter()
        .map(|&len| calculate_roll_weight(width_mm, len as f64, layers))
        .collect();

    let mut warnings = Vec::new();
    if let Some(heaviest) = roll_weights.iter().map(|w| w.total_weight_g).reduce(f64::max) {
        if heaviest > SOFT_ROLL_WEIGHT_G {
            warnings.push(format!(
                "Heaviest roll weighs {:.1} kg, above the {:.0} kg handling guideline",
                heaviest / 1000.0,
                SOFT_ROLL_WEIGHT_G / 1000.0
            ));
        }
    }

    Ok(RollPlan {
        roll_lengths_m,
        roll_weights,
        max_roll_length_m,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{FilmStructure, MaterialId, ThicknessTier};

    fn pet_al() -> Vec<FilmLayer> {
        FilmStructure::resolve(MaterialId::PetAl, ThicknessTier::Standard).layers
    }

    #[test]
    fn test_distribute_length_evenly() {
        assert_eq!(distribute_length_evenly(10, 3), vec![4, 3, 3]);
        assert_eq!(distribute_length_evenly(9, 3), vec![3, 3, 3]);
        assert!(distribute_length_evenly(10, 0).is_empty());

        for (total, count) in [(1000, 7), (50, 50), (12345, 11), (3, 3)] {
            let parts = distribute_length_evenly(total, count);
            assert_eq!(parts.iter().sum::<u32>(), total);
            let max = *parts.iter().max().unwrap();
            let min = *parts.iter().min().unwrap();
            assert!(max - min <= 1, "{} / {}", total, count);
        }
    }

    #[test]
    fn test_average_density() {
        // (12*1.4 + 7*2.71 + 12*1.4 + 90*0.92) / 121
        let expected = (16.8 + 18.97 + 16.8 + 82.8) / 121.0;
        assert!((calculate_average_density(&pet_al()) - expected).abs() < 1e-9);
        assert_eq!(calculate_average_density(&[]), 0.0);
    }

    #[test]
    fn test_roll_weight() {
        // 1 m of 1000 mm PET12: 0.012 * 1 * 1 * 1.4 * 1000 = 16.8 g
        let layers = [FilmLayer::new(crate::materials::FilmMaterial::Pet, 12.0)];
        let w = calculate_roll_weight(1000.0, 1.0, &layers);
        assert!((w.film_weight_g - 16.8).abs() < 1e-9);
        assert_eq!(w.total_weight_g, w.film_weight_g + CORE_WEIGHT_G);
    }

    #[test]
    fn test_max_roll_length_within_budget() {
        let layers = pet_al();
        for width in [100.0, 300.0, 590.0, 760.0] {
            let max = calculate_max_roll_length(width, &layers);
            assert!(max > 0);
            let per_metre = weight_per_metre_g(width, &layers);
            assert!(max as f64 * per_metre <= FILM_WEIGHT_BUDGET_G);
            assert!((max + 1) as f64 * per_metre > FILM_WEIGHT_BUDGET_G);
        }
        assert_eq!(calculate_max_roll_length(0.0, &layers), 0);
    }

    #[test]
    fn test_validate_rejects_bad_counts_and_lengths() {
        let layers = pet_al();
        let err = validate_roll_film_params(1000, 0, 300.0, &layers).unwrap_err();
        assert!(matches!(err, PricingError::RollConstraint { violation: RollViolation::RollCount, .. }));

        let err = validate_roll_film_params(1000, 51, 300.0, &layers).unwrap_err();
        assert!(matches!(err, PricingError::RollConstraint { violation: RollViolation::RollCount, .. }));

        let err = validate_roll_film_params(120, 3, 300.0, &layers).unwrap_err();
        assert!(matches!(err, PricingError::RollConstraint { violation: RollViolation::MinLength, .. }));

        let err = validate_roll_film_params(100_000, 1, 760.0, &layers).unwrap_err();
        match err {
            PricingError::RollConstraint { violation, reason } => {
                assert_eq!(violation, RollViolation::MaxLength);
                assert!(reason.contains("use at least"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_validate_warns_on_heavy_rolls() {
        let layers = pet_al();
        let max = calculate_max_roll_length(760.0, &layers);
        let plan = validate_roll_film_params(max, 1, 760.0, &layers).unwrap();
        assert_eq!(plan.roll_lengths_m, vec![max]);
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.roll_weights[0].total_weight_g <= MAX_ROLL_WEIGHT_G);

        let light = validate_roll_film_params(500, 2, 300.0, &layers).unwrap();
        assert!(light.warnings.is_empty());
    }
}
