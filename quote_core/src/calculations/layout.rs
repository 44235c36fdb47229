//! # Material Width & Layout Selection
//!
//! Picks the print layout (1-up or 2-up lanes) and the stock roll width for a
//! product. Two stock widths exist, 590 mm and 760 mm, each with 20 mm of
//! edge trim, so their printable widths are 570 mm and 740 mm.
//!
//! ## Film Width Formulas (mm)
//!
//! | Bag type             | 1-up              | 2-up                  |
//! |----------------------|-------------------|-----------------------|
//! | Flat 3-side          | H×2 + 41          | H×4 + 71              |
//! | Stand-up             | H×2 + G + 35      | H×4 + G×2 + 40        |
//! | Center seal          | W×2 + 22          | -                     |
//! | Box / side gusset    | (G + W)×2 + 32    | -                     |
//! | Roll film            | W                 | -                     |
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::layout::determine_material_width_for_pouch;
//! use quote_core::materials::MaterialId;
//! use quote_core::product::{BagType, ProductSpec};
//!
//! let spec = ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0);
//! let selection = determine_material_width_for_pouch(&spec);
//! assert_eq!(selection.columns, 2);
//! assert_eq!(selection.calculated_film_width, 700.0);
//! assert_eq!(selection.material_width, 760);
//! ```

use serde::{Deserialize, Serialize};

use crate::product::{BagType, ProductSpec};

/// Narrow stock roll (mm)
pub const NARROW_ROLL_MM: u32 = 590;
/// Wide stock roll (mm)
pub const WIDE_ROLL_MM: u32 = 760;
/// Unprintable trim on each roll
pub const EDGE_TRIM_MM: u32 = 20;

/// Printable width of a stock roll
pub fn printable_width(material_width: u32) -> u32 {
    material_width.saturating_sub(EDGE_TRIM_MM)
}

/// Resolved roll width and lane layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialWidthSelection {
    /// Stock roll width, 590 or 760 mm
    pub material_width: u32,
    /// Usable print width of that roll
    pub printable_width: u32,
    /// Lanes across the web, 1 or 2
    pub columns: u8,
    /// Film width the layout needs (mm)
    pub calculated_film_width: f64,
    /// Non-fatal notes (oversize clamp)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Pick the stock roll for a film width.
///
/// Widths above the wide roll's printable width are clamped to the wide roll
/// with a logged warning; callers that surface warnings should use
/// [`oversize_warning`] as well.
pub fn determine_material_width(product_width: f64) -> u32 {
    if product_width <= printable_width(NARROW_ROLL_MM) as f64 {
        NARROW_ROLL_MM
    } else if product_width <= printable_width(WIDE_ROLL_MM) as f64 {
        WIDE_ROLL_MM
    } else {
        tracing::warn!(
            product_width,
            max = printable_width(WIDE_ROLL_MM),
            "film width exceeds the widest printable roll, clamping to {} mm",
            WIDE_ROLL_MM
        );
        WIDE_ROLL_MM
    }
}

/// Warning text for a film width the wide roll cannot hold, if any
pub fn oversize_warning(film_width: f64) -> Option<String> {
    let max = printable_width(WIDE_ROLL_MM) as f64;
    if film_width > max || film_width.is_nan() {
        Some(format!(
            "Required film width {:.0} mm exceeds the {} mm printable width; priced on a {} mm roll",
            film_width, max, WIDE_ROLL_MM
        ))
    } else {
        None
    }
}

/// Film width needed to print `columns` lanes of this product.
///
/// Returns `None` when the bag type cannot be run with that many lanes.
pub fn calculate_pouch_film_width(bag_type: BagType, spec: &ProductSpec, columns: u8) -> Option<f64> {
    let h = spec.height_mm;
    let w = spec.width_mm;
    let g = spec.gusset_mm();

    match (bag_type, columns) {
        (BagType::FlatThreeSide, 1) => Some(h * 2.0 + 41.0),
        (BagType::FlatThreeSide, 2) => Some(h * 4.0 + 71.0),
        (BagType::StandUp, 1) => Some(h * 2.0 + g + 35.0),
        (BagType::StandUp, 2) => Some(h * 4.0 + g * 2.0 + 40.0),
        (BagType::CenterSeal, 1) => Some(w * 2.0 + 22.0),
        (BagType::Box | BagType::Gusset, 1) => Some((g + w) * 2.0 + 32.0),
        (BagType::RollFilm, 1) => Some(w),
        _ => None,
    }
}

/// Choose lanes and roll for a product. 2-up wins whenever it fits.
pub fn determine_material_width_for_pouch(spec: &ProductSpec) -> MaterialWidthSelection {
    let wide_printable = printable_width(WIDE_ROLL_MM) as f64;

    let two_up = if spec.bag_type.supports_two_up() {
        calculate_pouch_film_width(spec.bag_type, spec, 2).filter(|&width| width <= wide_printable)
    } else {
        None
    };

    let (columns, film_width) = match two_up {
        Some(width) => (2, width),
        // Every bag type has a 1-up formula
        None => (1, calculate_pouch_film_width(spec.bag_type, spec, 1).unwrap_or(spec.width_mm)),
    };

    let material_width = determine_material_width(film_width);
    let warnings = oversize_warning(film_width).into_iter().collect();

    tracing::debug!(
        bag_type = spec.bag_type.code(),
        columns,
        film_width,
        material_width,
        "resolved print layout"
    );

    MaterialWidthSelection {
        material_width,
        printable_width: printable_width(material_width),
        columns,
        calculated_film_width: film_width,
        warnings,
    }
}
