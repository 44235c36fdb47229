//! # Cost Calculations
//!
//! The synchronous, pure building blocks of a quote. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate*(input, config) -> PricingResult<*Result>`
//!
//! ## Available Calculations
//!
//! - [`layout`] - Stock roll width and 1-up/2-up lane selection
//! - [`roll`] - Roll weight, length limits and roll splitting
//! - [`film_cost`] - Material, printing, lamination, slitting and delivery costs
//! - [`sku_cost`] - Film usage and the KRW cost chain per SKU
//! - [`economics`] - Economic quantity and parallel-lane advice

pub mod economics;
pub mod film_cost;
pub mod layout;
pub mod roll;
pub mod sku_cost;

// Re-export commonly used types
pub use film_cost::{FilmCostInput, FilmCostResult};
pub use layout::MaterialWidthSelection;
pub use roll::{RollPlan, RollViolation, RollWeight};
pub use sku_cost::{KrwBreakdown, SkuCostInput, SkuCostResult};
