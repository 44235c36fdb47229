//! # quote_core - Flexible Packaging Quote Engine
//!
//! `quote_core` prices printed laminated pouches and roll film: it picks the
//! stock roll and print layout, works out how much film a run consumes, costs
//! material, printing, lamination, slitting and converting in KRW, and turns
//! the import chain into a yen quote. A comparison engine prices one product
//! at many quantities and explains which one is the better buy.
//!
//! ## Design Philosophy
//!
//! - **Pure core**: every calculation is a synchronous function of its input
//!   and a [`PricingConfig`]
//! - **JSON-first**: requests and results implement Serialize/Deserialize
//! - **Degrade, don't fail**: a bad dimension yields a flagged quote, not an error
//! - **Async only at the edge**: batching and caching live in [`comparison`]
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::materials::MaterialId;
//! use quote_core::pricing::{PricingEngine, QuoteRequest};
//! use quote_core::product::{BagType, ProductSpec, QuantityPlan};
//!
//! let request = QuoteRequest::new(
//!     ProductSpec::pouch(BagType::FlatThreeSide, 100.0, 160.0, MaterialId::PetAl),
//!     QuantityPlan::single(10_000),
//! );
//! let quote = PricingEngine::default().calculate_quote(&request);
//!
//! let json = serde_json::to_string_pretty(&quote).unwrap();
//! assert!(json.contains("\"currency\": \"JPY\""));
//! ```
//!
//! ## Modules
//!
//! - [`product`] - Bag types, product dimensions, quantity plans, delivery terms
//! - [`materials`] - Film materials and laminate structures
//! - [`post_processing`] - Zipper, finish, valve and other converting options
//! - [`calculations`] - Layout, roll, film cost, SKU cost and economics
//! - [`pricing`] - Single quote engine
//! - [`comparison`] - Multi-quantity comparison with batching and caches
//! - [`config`] - Rates, constants and cache/batch settings
//! - [`units`] - Currency newtypes and rounding
//! - [`errors`] - Structured error types
//! - [`logging`] - Subscriber setup for binaries and tests

pub mod calculations;
pub mod comparison;
pub mod config;
pub mod errors;
pub mod logging;
pub mod materials;
pub mod post_processing;
pub mod pricing;
pub mod product;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use comparison::{MultiQuantityEngine, MultiQuantityRequest, MultiQuantityResult};
pub use config::{load_config, PricingConfig, DEFAULT_CONFIG};
pub use errors::{PricingError, PricingResult};
pub use pricing::{PricingEngine, QuoteRequest, QuoteResult};
pub use product::{BagType, ProductSpec, QuantityPlan};
