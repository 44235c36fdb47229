//! # Product Specification
//!
//! What the customer wants made: bag type, geometry, laminate, quantity
//! pattern and delivery terms. These are plain serde types; the calculators
//! never mutate them.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "bag_type": "stand_up",
//!   "width_mm": 100.0,
//!   "height_mm": 150.0,
//!   "depth_mm": 30.0,
//!   "material_id": "pet_al",
//!   "thickness": "standard"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};
use crate::materials::{MaterialId, ThicknessTier};

/// Largest SKU set one production run accepts
pub const MAX_SKUS: usize = 100;

// ============================================================================
// Bag Type
// ============================================================================

/// Pouch construction (or plain roll film).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagType {
    /// Three-side sealed flat pouch
    #[serde(rename = "flat_3_side", alias = "three_side", alias = "flat")]
    FlatThreeSide,
    /// Stand-up pouch with bottom gusset
    #[serde(alias = "standing")]
    StandUp,
    /// Side-gusset (M-seal) bag
    #[serde(alias = "m_shape", alias = "side_gusset")]
    Gusset,
    /// Flat-bottom box pouch
    #[serde(alias = "box_pouch")]
    Box,
    /// Back-seal (T-seal) pillow bag
    #[serde(alias = "t_shape", alias = "back_seal")]
    CenterSeal,
    /// Printed film delivered on rolls, quantity in metres
    #[serde(alias = "roll")]
    RollFilm,
}

impl BagType {
    pub const ALL: [BagType; 6] = [
        BagType::FlatThreeSide,
        BagType::StandUp,
        BagType::Gusset,
        BagType::Box,
        BagType::CenterSeal,
        BagType::RollFilm,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BagType::FlatThreeSide => "flat_3_side",
            BagType::StandUp => "stand_up",
            BagType::Gusset => "gusset",
            BagType::Box => "box",
            BagType::CenterSeal => "center_seal",
            BagType::RollFilm => "roll_film",
        }
    }

    /// Parse from string (flexible matching)
    pub fn from_str_flexible(s: &str) -> PricingResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "flat_3_side" | "three_side" | "flat" | "3_side" => Ok(BagType::FlatThreeSide),
            "stand_up" | "standing" | "standup" => Ok(BagType::StandUp),
            "gusset" | "m_shape" | "side_gusset" => Ok(BagType::Gusset),
            "box" | "box_pouch" => Ok(BagType::Box),
            "center_seal" | "t_shape" | "back_seal" => Ok(BagType::CenterSeal),
            "roll_film" | "roll" => Ok(BagType::RollFilm),
            _ => Err(PricingError::invalid_input(
                "bag_type",
                s,
                "Valid bag types: flat_3_side, stand_up, gusset, box, center_seal, roll_film",
            )),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BagType::FlatThreeSide => "Flat 3-side seal pouch",
            BagType::StandUp => "Stand-up pouch",
            BagType::Gusset => "Side gusset bag",
            BagType::Box => "Box pouch",
            BagType::CenterSeal => "Center seal bag",
            BagType::RollFilm => "Roll film",
        }
    }

    /// Whether two lanes can be printed side by side
    pub fn supports_two_up(&self) -> bool {
        matches!(self, BagType::FlatThreeSide | BagType::StandUp)
    }

    /// Pouch converting rate: (KRW per cm of width per pouch, minimum charge)
    pub fn processing_rate(&self) -> Option<(f64, f64)> {
        match self {
            BagType::FlatThreeSide => Some((0.4, 200_000.0)),
            BagType::StandUp => Some((1.2, 250_000.0)),
            BagType::Gusset | BagType::Box | BagType::CenterSeal => Some((1.2, 440_000.0)),
            BagType::RollFilm => None,
        }
    }
}

impl std::fmt::Display for BagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Product Spec
// ============================================================================

/// Physical specification of the product. All lengths in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub bag_type: BagType,
    pub width_mm: f64,
    /// Pouch height (unused for roll film)
    #[serde(default)]
    pub height_mm: f64,
    /// Bottom or side gusset depth
    #[serde(default)]
    pub depth_mm: f64,
    /// Side panel width, used as the gusset when `depth_mm` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_width_mm: Option<f64>,
    pub material_id: MaterialId,
    #[serde(default)]
    pub thickness: ThicknessTier,
    /// Print repeat length, roll film only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_mm: Option<f64>,
}

impl ProductSpec {
    /// Pouch spec with no gusset
    pub fn pouch(bag_type: BagType, width_mm: f64, height_mm: f64, material_id: MaterialId) -> Self {
        ProductSpec {
            bag_type,
            width_mm,
            height_mm,
            depth_mm: 0.0,
            side_width_mm: None,
            material_id,
            thickness: ThicknessTier::default(),
            pitch_mm: None,
        }
    }

    /// Roll film spec; quantities for it are metres
    pub fn roll_film(width_mm: f64, material_id: MaterialId) -> Self {
        ProductSpec::pouch(BagType::RollFilm, width_mm, 0.0, material_id)
    }

    pub fn with_depth(mut self, depth_mm: f64) -> Self {
        self.depth_mm = depth_mm;
        self
    }

    pub fn with_thickness(mut self, thickness: ThicknessTier) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_pitch(mut self, pitch_mm: f64) -> Self {
        self.pitch_mm = Some(pitch_mm);
        self
    }

    /// Effective gusset (G) dimension
    pub fn gusset_mm(&self) -> f64 {
        if self.depth_mm > 0.0 {
            self.depth_mm
        } else {
            self.side_width_mm.unwrap_or(0.0).max(0.0)
        }
    }

    /// Check the geometry without failing: returns a list of problems.
    ///
    /// The pricing engine uses this to decide whether a quote is degraded.
    pub fn geometry_problems(&self) -> Vec<String> {
        fn check(problems: &mut Vec<String>, field: &str, value: f64) {
            if !value.is_finite() || value <= 0.0 {
                problems.push(format!("{} must be a positive number (got {})", field, value));
            }
        }

        let mut problems = Vec::new();
        check(&mut problems, "width_mm", self.width_mm);
        if self.bag_type != BagType::RollFilm {
            check(&mut problems, "height_mm", self.height_mm);
        }
        if let Some(pitch) = self.pitch_mm {
            check(&mut problems, "pitch_mm", pitch);
        }
        if matches!(self.bag_type, BagType::StandUp | BagType::Gusset | BagType::Box) && self.gusset_mm() <= 0.0 {
            problems.push(format!("{} needs a gusset depth", self.bag_type.code()));
        }
        if !self.depth_mm.is_finite() || self.depth_mm < 0.0 {
            problems.push(format!("depth_mm must not be negative (got {})", self.depth_mm));
        }
        problems
    }
}

// ============================================================================
// Quantity Plan
// ============================================================================

/// SKU quantities sharing one production run.
///
/// Fields are private so `sku_count == sku_quantities.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SkuSetFields")]
pub struct SkuSet {
    sku_count: usize,
    sku_quantities: Vec<u32>,
}

#[derive(Deserialize)]
struct SkuSetFields {
    sku_count: usize,
    sku_quantities: Vec<u32>,
}

impl TryFrom<SkuSetFields> for SkuSet {
    type Error = PricingError;

    fn try_from(fields: SkuSetFields) -> PricingResult<Self> {
        if fields.sku_count != fields.sku_quantities.len() {
            return Err(PricingError::invalid_request(format!(
                "sku_count is {} but {} quantities were given",
                fields.sku_count,
                fields.sku_quantities.len()
            )));
        }
        SkuSet::new(fields.sku_quantities)
    }
}

impl SkuSet {
    pub fn new(sku_quantities: Vec<u32>) -> PricingResult<Self> {
        if sku_quantities.is_empty() || sku_quantities.len() > MAX_SKUS {
            return Err(PricingError::invalid_request(format!(
                "an SKU set needs 1 to {} quantities, got {}",
                MAX_SKUS,
                sku_quantities.len()
            )));
        }
        Ok(SkuSet {
            sku_count: sku_quantities.len(),
            sku_quantities,
        })
    }

    pub fn sku_count(&self) -> usize {
        self.sku_count
    }

    pub fn quantities(&self) -> &[u32] {
        &self.sku_quantities
    }
}

/// How many units are ordered, and split how.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QuantityPlan {
    Single { quantity: u32 },
    Skus(SkuSet),
}

impl QuantityPlan {
    pub fn single(quantity: u32) -> Self {
        QuantityPlan::Single { quantity }
    }

    pub fn skus(quantities: Vec<u32>) -> PricingResult<Self> {
        Ok(QuantityPlan::Skus(SkuSet::new(quantities)?))
    }

    /// Per-SKU quantities (a single quantity is one SKU)
    pub fn quantities(&self) -> Vec<u32> {
        match self {
            QuantityPlan::Single { quantity } => vec![*quantity],
            QuantityPlan::Skus(set) => set.quantities().to_vec(),
        }
    }

    pub fn sku_count(&self) -> usize {
        match self {
            QuantityPlan::Single { .. } => 1,
            QuantityPlan::Skus(set) => set.sku_count(),
        }
    }

    pub fn total_quantity(&self) -> u64 {
        self.quantities().iter().map(|&q| u64::from(q)).sum()
    }
}

// ============================================================================
// Delivery Terms
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryLocation {
    #[default]
    Domestic,
    International,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Standard,
    Express,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeliveryTerms {
    #[serde(default)]
    pub location: DeliveryLocation,
    #[serde(default)]
    pub urgency: Urgency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_type_aliases() {
        let t: BagType = serde_json::from_str("\"t_shape\"").unwrap();
        assert_eq!(t, BagType::CenterSeal);
        let flat: BagType = serde_json::from_str("\"flat_3_side\"").unwrap();
        assert_eq!(flat, BagType::FlatThreeSide);
        assert_eq!(serde_json::to_string(&BagType::FlatThreeSide).unwrap(), "\"flat_3_side\"");
        assert_eq!(BagType::from_str_flexible("Stand Up").unwrap(), BagType::StandUp);
        assert!(BagType::from_str_flexible("envelope").is_err());
    }

    #[test]
    fn test_sku_set_invariant() {
        let plan = QuantityPlan::skus(vec![1000, 2000, 500]).unwrap();
        assert_eq!(plan.sku_count(), 3);
        assert_eq!(plan.total_quantity(), 3500);

        assert!(QuantityPlan::skus(vec![]).is_err());
        assert!(QuantityPlan::skus(vec![1; MAX_SKUS + 1]).is_err());
    }

    #[test]
    fn test_sku_set_deserialization_checks_count() {
        let ok = r#"{ "mode": "skus", "sku_count": 2, "sku_quantities": [100, 200] }"#;
        let plan: QuantityPlan = serde_json::from_str(ok).unwrap();
        assert_eq!(plan.quantities(), vec![100, 200]);

        let mismatch = r#"{ "mode": "skus", "sku_count": 3, "sku_quantities": [100, 200] }"#;
        assert!(serde_json::from_str::<QuantityPlan>(mismatch).is_err());

        let single: QuantityPlan = serde_json::from_str(r#"{ "mode": "single", "quantity": 5000 }"#).unwrap();
        assert_eq!(single, QuantityPlan::single(5000));
    }

    #[test]
    fn test_geometry_problems() {
        let good = ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0);
        assert!(good.geometry_problems().is_empty());

        let bad = ProductSpec::pouch(BagType::FlatThreeSide, 0.0, f64::NAN, MaterialId::PetAl);
        assert_eq!(bad.geometry_problems().len(), 2);

        let no_gusset = ProductSpec::pouch(BagType::Box, 100.0, 150.0, MaterialId::PetAl);
        assert_eq!(no_gusset.geometry_problems().len(), 1);

        let roll = ProductSpec::roll_film(300.0, MaterialId::PetTransparent);
        assert!(roll.geometry_problems().is_empty());
    }

    #[test]
    fn test_gusset_falls_back_to_side_width() {
        let mut spec = ProductSpec::pouch(BagType::Gusset, 80.0, 200.0, MaterialId::PetVmpet);
        spec.side_width_mm = Some(40.0);
        assert_eq!(spec.gusset_mm(), 40.0);
        assert_eq!(spec.with_depth(25.0).gusset_mm(), 25.0);
    }
}
