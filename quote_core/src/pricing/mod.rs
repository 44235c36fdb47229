//! # Quote Pricing
//!
//! Turns a [`QuoteRequest`] into a [`QuoteResult`] priced in yen.
//!
//! The engine repairs what it can (non-positive dimensions, zero
//! quantities, unknown options, out-of-range markups) and flags the result
//! `degraded` instead of failing, so a quote screen always has something to
//! show.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::materials::MaterialId;
//! use quote_core::pricing::{PricingEngine, QuoteRequest};
//! use quote_core::product::{BagType, ProductSpec, QuantityPlan};
//!
//! let request = QuoteRequest::new(
//!     ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0),
//!     QuantityPlan::single(10_000),
//! )
//! .with_options(&["zipper-yes"]);
//!
//! let quote = PricingEngine::default().calculate_quote(&request);
//! assert_eq!(quote.currency, "JPY");
//! assert!(quote.unit_price > 0.0);
//! ```

pub mod engine;
pub mod request;

pub use engine::{
    lead_time_days, CostBreakdown, EconomicsReport, FilmUsage, PricingEngine, QuoteResult, SharedCosts, SkuFilmUsage,
};
pub use request::QuoteRequest;
