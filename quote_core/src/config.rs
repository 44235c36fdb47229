//! # Pricing Configuration
//!
//! Every rate, floor and threshold the engine uses lives in [`PricingConfig`].
//! The defaults reproduce the production price sheet; a JSON file can
//! override any subset of fields (missing fields keep their defaults).
//!
//! ## Example
//!
//! ```rust
//! use quote_core::config::PricingConfig;
//!
//! let config: PricingConfig = serde_json::from_str(r#"{ "exchange_rate": 0.11 }"#).unwrap();
//! assert_eq!(config.exchange_rate, 0.11);
//! assert_eq!(config.loss_m, 400.0);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};
use crate::materials::FilmMaterial;

/// Shared default configuration, built on first use.
pub static DEFAULT_CONFIG: Lazy<PricingConfig> = Lazy::new(PricingConfig::default);

/// Global pricing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    // === Currency and margins ===
    /// KRW → JPY conversion factor
    pub exchange_rate: f64,
    /// Import duty as a fraction of the manufacturer price
    pub duty_rate: f64,
    /// Producer margin applied to base cost
    pub manufacturing_margin: f64,
    /// Sales markup for domestic delivery
    pub domestic_markup: f64,
    /// Sales markup for international delivery
    pub international_markup: f64,

    // === Film processing rates (KRW) ===
    /// Printing cost per metre of film (1 m print width)
    pub printing_rate_per_m: f64,
    /// Matte finish surcharge per m² of film
    pub matte_rate_per_m2: f64,
    /// Lamination cost per m² per laminated interface
    pub lamination_rate_per_m2: f64,
    /// Slitting cost per metre
    pub slitter_rate_per_m: f64,
    /// Minimum slitting charge per run
    pub slitter_minimum: f64,

    // === Delivery ===
    /// Cost per shipping box
    pub delivery_rate_per_box: f64,
    /// Film weight one box holds
    pub delivery_box_capacity_kg: f64,

    // === Film length rules (metres) ===
    /// Secured-length floor for a single-SKU order
    pub single_sku_floor_m: f64,
    /// Secured-length floor per SKU when SKUs share a run
    pub multi_sku_floor_m: f64,
    /// Setup/changeover loss per run
    pub loss_m: f64,
    /// Secured lengths above the floor round up to this step
    pub length_step_m: f64,

    /// Per-material unit price overrides (KRW/kg)
    pub unit_price_overrides: BTreeMap<FilmMaterial, f64>,

    /// Days a quote stays valid
    pub quote_valid_days: i64,

    /// Comparison engine cache sizes and lifetimes
    pub cache: CacheSettings,

    /// Comparison engine batching
    pub batch: BatchSettings,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            exchange_rate: 0.12,
            duty_rate: 0.05,
            manufacturing_margin: 0.40,
            domestic_markup: 0.20,
            international_markup: 0.50,
            printing_rate_per_m: 475.0,
            matte_rate_per_m2: 20.0,
            lamination_rate_per_m2: 75.0,
            slitter_rate_per_m: 10.0,
            slitter_minimum: 30_000.0,
            delivery_rate_per_box: 127_980.0,
            delivery_box_capacity_kg: 29.0,
            single_sku_floor_m: 500.0,
            multi_sku_floor_m: 300.0,
            loss_m: 400.0,
            length_step_m: 50.0,
            unit_price_overrides: BTreeMap::new(),
            quote_valid_days: 30,
            cache: CacheSettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl PricingConfig {
    /// Effective unit price for a film material (KRW/kg)
    pub fn unit_price(&self, material: FilmMaterial) -> f64 {
        self.unit_price_overrides
            .get(&material)
            .copied()
            .unwrap_or_else(|| material.default_unit_price_krw_per_kg())
    }

    /// Validate ranges. Loaded configs are always validated.
    pub fn validate(&self) -> PricingResult<()> {
        let positive = [
            ("exchange_rate", self.exchange_rate),
            ("printing_rate_per_m", self.printing_rate_per_m),
            ("delivery_box_capacity_kg", self.delivery_box_capacity_kg),
            ("single_sku_floor_m", self.single_sku_floor_m),
            ("multi_sku_floor_m", self.multi_sku_floor_m),
            ("length_step_m", self.length_step_m),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PricingError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }

        let non_negative = [
            ("duty_rate", self.duty_rate),
            ("manufacturing_margin", self.manufacturing_margin),
            ("domestic_markup", self.domestic_markup),
            ("international_markup", self.international_markup),
            ("matte_rate_per_m2", self.matte_rate_per_m2),
            ("lamination_rate_per_m2", self.lamination_rate_per_m2),
            ("slitter_rate_per_m", self.slitter_rate_per_m),
            ("slitter_minimum", self.slitter_minimum),
            ("delivery_rate_per_box", self.delivery_rate_per_box),
            ("loss_m", self.loss_m),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PricingError::invalid_input(field, value.to_string(), "Must not be negative"));
            }
        }

        for (material, price) in &self.unit_price_overrides {
            if !(price.is_finite() && *price > 0.0) {
                return Err(PricingError::invalid_input(
                    format!("unit_price_overrides.{}", material.code()),
                    price.to_string(),
                    "Unit price must be positive",
                ));
            }
        }

        if self.quote_valid_days < 0 {
            return Err(PricingError::invalid_input(
                "quote_valid_days",
                self.quote_valid_days.to_string(),
                "Must not be negative",
            ));
        }

        self.cache.validate()?;
        self.batch.validate()
    }
}

/// Capacity and TTL for the three comparison caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub shared_cost_capacity: usize,
    pub shared_cost_ttl_secs: u64,
    pub quote_capacity: usize,
    pub quote_ttl_secs: u64,
    pub comparison_capacity: usize,
    pub comparison_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            shared_cost_capacity: 50,
            shared_cost_ttl_secs: 10 * 60,
            quote_capacity: 200,
            quote_ttl_secs: 5 * 60,
            comparison_capacity: 100,
            comparison_ttl_secs: 3 * 60,
        }
    }
}

impl CacheSettings {
    fn validate(&self) -> PricingResult<()> {
        let capacities = [
            ("cache.shared_cost_capacity", self.shared_cost_capacity),
            ("cache.quote_capacity", self.quote_capacity),
            ("cache.comparison_capacity", self.comparison_capacity),
        ];
        for (field, value) in capacities {
            if value == 0 {
                return Err(PricingError::invalid_input(field, "0", "Cache capacity must be at least 1"));
            }
        }
        Ok(())
    }

    pub fn shared_cost_ttl(&self) -> Duration {
        Duration::from_secs(self.shared_cost_ttl_secs)
    }

    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_ttl_secs)
    }

    pub fn comparison_ttl(&self) -> Duration {
        Duration::from_secs(self.comparison_ttl_secs)
    }
}

/// How multi-quantity requests are split and offloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Quantities evaluated together per offloaded batch
    pub batch_size: usize,
    /// Deadline for one offloaded batch before the in-process fallback runs
    pub offload_timeout_ms: u64,
    /// Upper bound on quantities in one comparison request
    pub max_quantities: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            batch_size: 8,
            offload_timeout_ms: 10_000,
            max_quantities: 50,
        }
    }
}

impl BatchSettings {
    fn validate(&self) -> PricingResult<()> {
        if self.batch_size == 0 {
            return Err(PricingError::invalid_input("batch.batch_size", "0", "Batch size must be at least 1"));
        }
        if self.max_quantities == 0 {
            return Err(PricingError::invalid_input(
                "batch.max_quantities",
                "0",
                "At least one quantity must be allowed",
            ));
        }
        Ok(())
    }

    pub fn offload_timeout(&self) -> Duration {
        Duration::from_millis(self.offload_timeout_ms)
    }
}

/// Load and validate a JSON configuration file.
pub fn load_config(path: &Path) -> PricingResult<PricingConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        PricingError::config(format!("failed to read '{}': {}", path.display(), e))
    })?;

    let config: PricingConfig = serde_json::from_str(&content).map_err(|e| {
        PricingError::config(format!("failed to parse '{}': {}", path.display(), e))
    })?;

    config.validate()?;
    tracing::info!(path = %path.display(), "loaded pricing configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PricingConfig::default().validate().is_ok());
        assert_eq!(DEFAULT_CONFIG.exchange_rate, 0.12);
        assert_eq!(DEFAULT_CONFIG.cache.quote_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "manufacturing_margin": 0.3, "batch": { "batch_size": 4 } }"#;
        let config: PricingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.manufacturing_margin, 0.3);
        assert_eq!(config.batch.batch_size, 4);
        assert_eq!(config.batch.offload_timeout_ms, 10_000);
        assert_eq!(config.duty_rate, 0.05);
    }

    #[test]
    fn test_unit_price_override() {
        let mut config = PricingConfig::default();
        assert_eq!(config.unit_price(FilmMaterial::Al), 7800.0);
        config.unit_price_overrides.insert(FilmMaterial::Al, 8200.0);
        assert_eq!(config.unit_price(FilmMaterial::Al), 8200.0);

        let json = serde_json::to_string(&config).unwrap();
        let back: PricingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit_price(FilmMaterial::Al), 8200.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = PricingConfig {
            exchange_rate: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let mut config = PricingConfig::default();
        config.batch.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/pricing.json")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("quote_core_config_{}.json", std::process::id()));
        fs::write(&path, r#"{ "loss_m": 350 }"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.loss_m, 350.0);
        fs::remove_file(&path).ok();
    }
}
