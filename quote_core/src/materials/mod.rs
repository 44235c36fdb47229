//! # Film Materials
//!
//! Base film materials with their densities and default purchase prices, plus
//! the laminate structures built from them.
//!
//! ## Material Types
//!
//! - **Base films**: PET, NY, VMPET, KRAFT (printable or barrier layers)
//! - **Barrier**: AL foil
//! - **Sealants**: LLDPE, LDPE, CPP, PE (inner heat-seal layer)
//!
//! ## Example
//!
//! ```rust
//! use quote_core::materials::{FilmStructure, MaterialId, ThicknessTier};
//!
//! let structure = FilmStructure::resolve(MaterialId::PetAl, ThicknessTier::Standard);
//! assert_eq!(structure.describe(), "PET12/AL7/PET12/LLDPE90");
//! ```

pub mod structure;

pub use structure::{FilmLayer, FilmStructure, MaterialId, ThicknessTier};

use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};

/// A single film material that can appear as a laminate layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilmMaterial {
    Pet,
    Al,
    Lldpe,
    Ldpe,
    Ny,
    Vmpet,
    Cpp,
    Kraft,
    Pe,
}

impl FilmMaterial {
    pub const ALL: [FilmMaterial; 9] = [
        FilmMaterial::Pet,
        FilmMaterial::Al,
        FilmMaterial::Lldpe,
        FilmMaterial::Ldpe,
        FilmMaterial::Ny,
        FilmMaterial::Vmpet,
        FilmMaterial::Cpp,
        FilmMaterial::Kraft,
        FilmMaterial::Pe,
    ];

    /// Short code as printed in structure descriptions
    pub fn code(&self) -> &'static str {
        match self {
            FilmMaterial::Pet => "PET",
            FilmMaterial::Al => "AL",
            FilmMaterial::Lldpe => "LLDPE",
            FilmMaterial::Ldpe => "LDPE",
            FilmMaterial::Ny => "NY",
            FilmMaterial::Vmpet => "VMPET",
            FilmMaterial::Cpp => "CPP",
            FilmMaterial::Kraft => "KRAFT",
            FilmMaterial::Pe => "PE",
        }
    }

    /// Parse from string (flexible matching)
    pub fn from_str_flexible(s: &str) -> PricingResult<Self> {
        match s.trim().to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "PET" => Ok(FilmMaterial::Pet),
            "AL" | "ALU" | "ALUMINIUM" | "ALUMINUM" => Ok(FilmMaterial::Al),
            "LLDPE" => Ok(FilmMaterial::Lldpe),
            "LDPE" => Ok(FilmMaterial::Ldpe),
            "NY" | "NYLON" | "ONY" => Ok(FilmMaterial::Ny),
            "VMPET" => Ok(FilmMaterial::Vmpet),
            "CPP" => Ok(FilmMaterial::Cpp),
            "KRAFT" | "PAPER" => Ok(FilmMaterial::Kraft),
            "PE" => Ok(FilmMaterial::Pe),
            _ => Err(PricingError::invalid_input(
                "film_material",
                s,
                "Unknown film material. Valid: PET, AL, LLDPE, LDPE, NY, VMPET, CPP, KRAFT, PE",
            )),
        }
    }

    /// Density in g/cm³
    pub fn density_g_cm3(&self) -> f64 {
        match self {
            FilmMaterial::Pet => 1.40,
            FilmMaterial::Al => 2.71,
            FilmMaterial::Lldpe => 0.92,
            FilmMaterial::Ldpe => 0.92,
            FilmMaterial::Ny => 1.16,
            FilmMaterial::Vmpet => 1.40,
            FilmMaterial::Cpp => 0.91,
            FilmMaterial::Kraft => 0.80,
            FilmMaterial::Pe => 0.92,
        }
    }

    /// Default purchase price in KRW/kg (see `PricingConfig::unit_price` for overrides)
    pub fn default_unit_price_krw_per_kg(&self) -> f64 {
        match self {
            FilmMaterial::Pet => 2800.0,
            FilmMaterial::Al => 7800.0,
            FilmMaterial::Lldpe => 2800.0,
            FilmMaterial::Ldpe => 2800.0,
            FilmMaterial::Ny => 5400.0,
            FilmMaterial::Vmpet => 3600.0,
            FilmMaterial::Cpp => 2900.0,
            FilmMaterial::Kraft => 1800.0,
            FilmMaterial::Pe => 2600.0,
        }
    }

    /// Whether this material serves as the heat-seal layer
    pub fn is_sealant(&self) -> bool {
        matches!(
            self,
            FilmMaterial::Lldpe | FilmMaterial::Ldpe | FilmMaterial::Cpp | FilmMaterial::Pe
        )
    }
}

impl std::fmt::Display for FilmMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
