//! Laminate structures keyed by catalogue material id and thickness tier.

use serde::{Deserialize, Serialize};

use super::FilmMaterial;
use crate::errors::{PricingError, PricingResult};

/// Catalogue laminate structure offered to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialId {
    /// PET/AL/PET/LLDPE - full aluminium barrier
    PetAl,
    /// PET/VMPET/PET/LLDPE - metallised barrier
    PetVmpet,
    /// PET/LDPE/LLDPE
    PetLdpe,
    /// PET/NY/AL/LLDPE - puncture-resistant barrier
    PetNyAl,
    /// PET/LLDPE - clear window pouches
    PetTransparent,
    /// KRAFT/PE - paper look
    KraftPe,
    /// PET/CPP - retort-capable clear film
    PetCpp,
}

impl MaterialId {
    pub const ALL: [MaterialId; 7] = [
        MaterialId::PetAl,
        MaterialId::PetVmpet,
        MaterialId::PetLdpe,
        MaterialId::PetNyAl,
        MaterialId::PetTransparent,
        MaterialId::KraftPe,
        MaterialId::PetCpp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MaterialId::PetAl => "pet_al",
            MaterialId::PetVmpet => "pet_vmpet",
            MaterialId::PetLdpe => "pet_ldpe",
            MaterialId::PetNyAl => "pet_ny_al",
            MaterialId::PetTransparent => "pet_transparent",
            MaterialId::KraftPe => "kraft_pe",
            MaterialId::PetCpp => "pet_cpp",
        }
    }

    /// Parse from string (flexible matching)
    pub fn from_str_flexible(s: &str) -> PricingResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-', '/'], "_").as_str() {
            "pet_al" | "pet_al_pet_lldpe" => Ok(MaterialId::PetAl),
            "pet_vmpet" | "pet_vmpet_pet_lldpe" => Ok(MaterialId::PetVmpet),
            "pet_ldpe" => Ok(MaterialId::PetLdpe),
            "pet_ny_al" | "pet_ny_al_lldpe" => Ok(MaterialId::PetNyAl),
            "pet_transparent" | "pet_lldpe" | "transparent" => Ok(MaterialId::PetTransparent),
            "kraft_pe" | "kraft" => Ok(MaterialId::KraftPe),
            "pet_cpp" => Ok(MaterialId::PetCpp),
            _ => Err(PricingError::invalid_input(
                "material_id",
                s,
                "Unknown material id. Valid: pet_al, pet_vmpet, pet_ldpe, pet_ny_al, pet_transparent, kraft_pe, pet_cpp",
            )),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialId::PetAl => "PET/AL (aluminium barrier)",
            MaterialId::PetVmpet => "PET/VMPET (metallised)",
            MaterialId::PetLdpe => "PET/LDPE",
            MaterialId::PetNyAl => "PET/NY/AL (puncture resistant)",
            MaterialId::PetTransparent => "PET/LLDPE (transparent)",
            MaterialId::KraftPe => "Kraft/PE",
            MaterialId::PetCpp => "PET/CPP",
        }
    }

    /// Fixed layers followed by the sealant material
    fn recipe(&self) -> (&'static [(FilmMaterial, f64)], FilmMaterial) {
        match self {
            MaterialId::PetAl => (
                &[(FilmMaterial::Pet, 12.0), (FilmMaterial::Al, 7.0), (FilmMaterial::Pet, 12.0)],
                FilmMaterial::Lldpe,
            ),
            MaterialId::PetVmpet => (
                &[(FilmMaterial::Pet, 12.0), (FilmMaterial::Vmpet, 12.0), (FilmMaterial::Pet, 12.0)],
                FilmMaterial::Lldpe,
            ),
            MaterialId::PetLdpe => (
                &[(FilmMaterial::Pet, 12.0), (FilmMaterial::Ldpe, 7.0)],
                FilmMaterial::Lldpe,
            ),
            MaterialId::PetNyAl => (
                &[(FilmMaterial::Pet, 12.0), (FilmMaterial::Ny, 15.0), (FilmMaterial::Al, 7.0)],
                FilmMaterial::Lldpe,
            ),
            MaterialId::PetTransparent => (&[(FilmMaterial::Pet, 12.0)], FilmMaterial::Lldpe),
            MaterialId::KraftPe => (&[(FilmMaterial::Kraft, 80.0)], FilmMaterial::Pe),
            MaterialId::PetCpp => (&[(FilmMaterial::Pet, 12.0)], FilmMaterial::Cpp),
        }
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Sealant thickness selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThicknessTier {
    Light,
    Medium,
    #[default]
    Standard,
    Heavy,
    Ultra,
}

impl ThicknessTier {
    pub const ALL: [ThicknessTier; 5] = [
        ThicknessTier::Light,
        ThicknessTier::Medium,
        ThicknessTier::Standard,
        ThicknessTier::Heavy,
        ThicknessTier::Ultra,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ThicknessTier::Light => "light",
            ThicknessTier::Medium => "medium",
            ThicknessTier::Standard => "standard",
            ThicknessTier::Heavy => "heavy",
            ThicknessTier::Ultra => "ultra",
        }
    }

    pub fn from_str_flexible(s: &str) -> PricingResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" | "thin" => Ok(ThicknessTier::Light),
            "medium" => Ok(ThicknessTier::Medium),
            "standard" | "normal" | "default" => Ok(ThicknessTier::Standard),
            "heavy" | "thick" => Ok(ThicknessTier::Heavy),
            "ultra" => Ok(ThicknessTier::Ultra),
            _ => Err(PricingError::invalid_input(
                "thickness",
                s,
                "Valid tiers: light, medium, standard, heavy, ultra",
            )),
        }
    }

    /// Sealant layer thickness in μm for the given sealant material
    pub fn sealant_um(&self, sealant: FilmMaterial) -> f64 {
        let polyethylene = [60.0, 80.0, 90.0, 100.0, 110.0];
        let kraft_liner = [30.0, 40.0, 45.0, 50.0, 60.0];
        let table = match sealant {
            FilmMaterial::Pe => kraft_liner,
            _ => polyethylene,
        };
        table[*self as usize]
    }
}

/// One layer of a laminate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilmLayer {
    pub material: FilmMaterial,
    pub thickness_um: f64,
}

impl FilmLayer {
    pub fn new(material: FilmMaterial, thickness_um: f64) -> Self {
        FilmLayer { material, thickness_um }
    }

    pub fn thickness_mm(&self) -> f64 {
        self.thickness_um / 1000.0
    }
}

/// Resolved laminate: ordered layers from print side to seal side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmStructure {
    pub material_id: MaterialId,
    pub thickness: ThicknessTier,
    pub layers: Vec<FilmLayer>,
}

impl FilmStructure {
    /// Build the layer list for a catalogue material at a thickness tier.
    pub fn resolve(material_id: MaterialId, thickness: ThicknessTier) -> Self {
        let (fixed, sealant) = material_id.recipe();
        let mut layers: Vec<FilmLayer> = fixed
            .iter()
            .map(|&(material, um)| FilmLayer::new(material, um))
            .collect();
        layers.push(FilmLayer::new(sealant, thickness.sealant_um(sealant)));

        FilmStructure {
            material_id,
            thickness,
            layers,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total laminate thickness in μm
    pub fn total_thickness_um(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness_um).sum()
    }

    /// e.g. "PET12/AL7/PET12/LLDPE90"
    pub fn describe(&self) -> String {
        self.layers
            .iter()
            .map(|l| format!("{}{}", l.material.code(), l.thickness_um))
            .collect::<Vec<_>>()
            .join("/")
    }
}
