//! # Multi-Quantity Comparison
//!
//! Prices one product at several quantities and compares the results.
//!
//! Each distinct quantity is priced once; results come back in the caller's
//! order, duplicates included. Work is split into batches handed to a
//! [`BatchExecutor`] (the tokio blocking pool by default) with a deadline;
//! a batch that fails or overruns is recomputed in-process. Three TTL caches
//! sit in front of the work: shared costs per product, quotes per quantity,
//! and whole comparisons.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::comparison::{MultiQuantityEngine, MultiQuantityRequest};
//! use quote_core::materials::MaterialId;
//! use quote_core::product::{BagType, ProductSpec};
//!
//! # async fn run() -> quote_core::PricingResult<()> {
//! let engine = MultiQuantityEngine::default();
//! let request = MultiQuantityRequest::new(
//!     ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0),
//!     vec![1_000, 5_000, 10_000],
//! );
//! let result = engine.calculate_multi_quantity(&request).await?;
//! if let Some(comparison) = &result.comparison {
//!     println!("best value: {} units", comparison.best_value.quantity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cache;
pub mod dispatch;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{PricingConfig, DEFAULT_CONFIG};
use crate::errors::{PricingError, PricingResult};
use crate::pricing::{PricingEngine, QuoteRequest, QuoteResult, SharedCosts};
use crate::product::{DeliveryTerms, ProductSpec, QuantityPlan};

pub use analysis::{
    generate_comparison, generate_recommendations, BestValue, PriceBreak, PriceBreakTier, PricePoint, PriceTrend,
    PriceTrends, QuantityComparison, Recommendation, RecommendationKind, ScaleEconomy,
};
pub use cache::{CacheStats, TtlLruCache};
pub use dispatch::{dispatch_batch, BatchExecutor, BatchOutcome, BlockingPoolExecutor};

// ============================================================================
// Request
// ============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiQuantityRequest {
    pub spec: ProductSpec,
    /// Quantities to price, in display order; duplicates allowed
    pub quantities: Vec<u32>,
    #[serde(default)]
    pub post_processing_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_rate: Option<f64>,
    #[serde(default)]
    pub delivery: DeliveryTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_on: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
}

impl MultiQuantityRequest {
    pub fn new(spec: ProductSpec, quantities: Vec<u32>) -> Self {
        MultiQuantityRequest {
            spec,
            quantities,
            post_processing_options: Vec::new(),
            markup_rate: None,
            delivery: DeliveryTerms::default(),
            quoted_on: None,
            include_recommendations: true,
        }
    }

    pub fn with_options<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        self.post_processing_options = ids.iter().map(|id| id.as_ref().to_string()).collect();
        self
    }

    pub fn with_markup_rate(mut self, rate: f64) -> Self {
        self.markup_rate = Some(rate);
        self
    }

    pub fn with_delivery(mut self, delivery: DeliveryTerms) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn quoted_on(mut self, date: NaiveDate) -> Self {
        self.quoted_on = Some(date);
        self
    }

    pub fn without_recommendations(mut self) -> Self {
        self.include_recommendations = false;
        self
    }

    /// Single-quantity quote request for one entry of the list
    pub fn quote_request(&self, quantity: u32) -> QuoteRequest {
        QuoteRequest {
            spec: self.spec.clone(),
            quantity: QuantityPlan::single(quantity),
            post_processing_options: self.post_processing_options.clone(),
            markup_rate: self.markup_rate,
            delivery: self.delivery,
            roll_count: None,
            quoted_on: self.quoted_on,
        }
    }

    /// Structural checks; the only way a comparison run can fail.
    pub fn validate(&self, max_quantities: usize) -> PricingResult<()> {
        if self.quantities.is_empty() {
            return Err(PricingError::invalid_request("At least one quantity is required"));
        }
        if self.quantities.len() > max_quantities {
            return Err(PricingError::invalid_request(format!(
                "At most {} quantities can be compared (got {})",
                max_quantities,
                self.quantities.len()
            )));
        }
        Ok(())
    }

    fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    /// Products that share setup, tooling and base material cost
    fn shared_cost_key(&self) -> String {
        let spec = &self.spec;
        format!(
            "{}_{:?}_{}x{}x{}_{:?}_{:?}",
            spec.bag_type.code(),
            spec.material_id,
            spec.width_mm,
            spec.height_mm,
            spec.depth_mm,
            spec.thickness,
            spec.pitch_mm
        )
    }
}

// ============================================================================
// Result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuantityOutcome {
    Quote(QuoteResult),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityCalculation {
    pub quantity: u32,
    pub outcome: QuantityOutcome,
}

impl QuantityCalculation {
    pub fn quote(&self) -> Option<&QuoteResult> {
        match &self.outcome {
            QuantityOutcome::Quote(quote) => Some(quote),
            QuantityOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: f64,
    pub currency: String,
    pub valid_until: NaiveDate,
    pub from_cache: bool,
    pub distinct_quantities: usize,
    pub cached_quotes: usize,
    pub computed_quotes: usize,
    pub batches: usize,
    pub fallback_batches: usize,
    pub failed_quantities: usize,
    pub executor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_costs: Option<SharedCosts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiQuantityResult {
    /// One entry per requested quantity, in request order
    pub calculations: Vec<QuantityCalculation>,
    /// Absent when no quantity could be priced
    pub comparison: Option<QuantityComparison>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    pub metadata: ComparisonMetadata,
}

impl MultiQuantityResult {
    /// First successful quote for a quantity
    pub fn quote_for(&self, quantity: u32) -> Option<&QuoteResult> {
        self.calculations
            .iter()
            .filter(|c| c.quantity == quantity)
            .find_map(QuantityCalculation::quote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCacheStats {
    pub shared_costs: CacheStats,
    pub quotes: CacheStats,
    pub comparisons: CacheStats,
}

// ============================================================================
// Engine
// ============================================================================

/// Owns its caches; share it behind an `Arc` to share them.
pub struct MultiQuantityEngine {
    pricing: PricingEngine,
    executor: Arc<dyn BatchExecutor>,
    shared_costs: TtlLruCache<SharedCosts>,
    quotes: TtlLruCache<QuoteResult>,
    comparisons: TtlLruCache<MultiQuantityResult>,
}

impl Default for MultiQuantityEngine {
    fn default() -> Self {
        MultiQuantityEngine::new(DEFAULT_CONFIG.clone())
    }
}

impl MultiQuantityEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self::with_executor(config, Arc::new(BlockingPoolExecutor))
    }

    pub fn with_executor(config: PricingConfig, executor: Arc<dyn BatchExecutor>) -> Self {
        let caches = config.cache.clone();
        MultiQuantityEngine {
            pricing: PricingEngine::new(config),
            executor,
            shared_costs: TtlLruCache::new("shared_costs", caches.shared_cost_capacity, caches.shared_cost_ttl()),
            quotes: TtlLruCache::new("quotes", caches.quote_capacity, caches.quote_ttl()),
            comparisons: TtlLruCache::new("comparisons", caches.comparison_capacity, caches.comparison_ttl()),
        }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Price every quantity of `request` and compare them.
    ///
    /// Fails only for a structurally invalid request; individual quantities
    /// that cannot be priced are reported as [`QuantityOutcome::Failed`].
    pub async fn calculate_multi_quantity(&self, request: &MultiQuantityRequest) -> PricingResult<MultiQuantityResult> {
        let started = Instant::now();
        let config = self.pricing.config();
        request.validate(config.batch.max_quantities)?;

        let mut request = request.clone();
        let quoted_on = *request.quoted_on.get_or_insert_with(|| Utc::now().date_naive());

        let request_key = request.cache_key();
        if let Some(mut cached) = self.comparisons.get(&request_key) {
            cached.metadata.from_cache = true;
            cached.metadata.processing_time_ms = elapsed_ms(started);
            tracing::debug!(request_id = %cached.metadata.request_id, "comparison served from cache");
            return Ok(cached);
        }

        let shared_costs = self.shared_costs_for(&request);

        // Distinct quantities in first-seen order
        let mut distinct: Vec<u32> = Vec::new();
        for &quantity in &request.quantities {
            if !distinct.contains(&quantity) {
                distinct.push(quantity);
            }
        }

        let mut outcomes: HashMap<u32, Result<QuoteResult, String>> = HashMap::with_capacity(distinct.len());
        let mut uncached = Vec::new();
        for &quantity in &distinct {
            let quote_request = request.quote_request(quantity);
            match self.quotes.get(&quote_request.cache_key()) {
                Some(quote) => {
                    outcomes.insert(quantity, Ok(quote));
                }
                None => uncached.push(quote_request),
            }
        }
        let cached_quotes = distinct.len() - uncached.len();
        let computed_quotes = uncached.len();

        let mut batches = 0;
        let mut fallback_batches = 0;
        for chunk in uncached.chunks(config.batch.batch_size.max(1)) {
            batches += 1;
            let outcome = dispatch_batch(
                self.executor.as_ref(),
                &self.pricing,
                chunk.to_vec(),
                config.batch.offload_timeout(),
            )
            .await;
            if outcome.fell_back {
                fallback_batches += 1;
            }

            for (quote_request, result) in chunk.iter().zip(outcome.results) {
                let quantity = quote_request.quantity.quantities().first().copied().unwrap_or(0);
                match &result {
                    Ok(quote) => self.quotes.insert(quote_request.cache_key(), quote.clone()),
                    Err(reason) => tracing::warn!(quantity, reason = %reason, "quantity could not be priced"),
                }
                outcomes.insert(quantity, result);
            }
        }

        let calculations: Vec<QuantityCalculation> = request
            .quantities
            .iter()
            .map(|&quantity| {
                let outcome = match outcomes.get(&quantity) {
                    Some(Ok(quote)) => QuantityOutcome::Quote(quote.clone()),
                    Some(Err(reason)) => QuantityOutcome::Failed { reason: reason.clone() },
                    None => QuantityOutcome::Failed {
                        reason: "quantity was not priced".to_string(),
                    },
                };
                QuantityCalculation { quantity, outcome }
            })
            .collect();
        let failed_quantities = calculations.iter().filter(|c| c.quote().is_none()).count();

        let points: Vec<PricePoint> = calculations
            .iter()
            .filter_map(|c| {
                c.quote().map(|quote| PricePoint {
                    quantity: c.quantity,
                    unit_price: quote.unit_price,
                    total_price: quote.total_price,
                })
            })
            .collect();
        let comparison = generate_comparison(&points);
        let recommendations = match (&comparison, request.include_recommendations) {
            (Some(comparison), true) => generate_recommendations(comparison),
            _ => Vec::new(),
        };

        let metadata = ComparisonMetadata {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            processing_time_ms: elapsed_ms(started),
            currency: "JPY".to_string(),
            valid_until: quoted_on
                .checked_add_days(Days::new(config.quote_valid_days.max(0) as u64))
                .unwrap_or(quoted_on),
            from_cache: false,
            distinct_quantities: distinct.len(),
            cached_quotes,
            computed_quotes,
            batches,
            fallback_batches,
            failed_quantities,
            executor: self.executor.name().to_string(),
            shared_costs,
        };

        tracing::info!(
            request_id = %metadata.request_id,
            quantities = request.quantities.len(),
            distinct = metadata.distinct_quantities,
            cached = cached_quotes,
            batches,
            fallback_batches,
            failed = failed_quantities,
            elapsed_ms = metadata.processing_time_ms,
            "multi-quantity comparison complete"
        );

        let result = MultiQuantityResult {
            calculations,
            comparison,
            recommendations,
            metadata,
        };
        // Partial results are not reused; a later run may price the failures
        if failed_quantities == 0 {
            self.comparisons.insert(request_key, result.clone());
        }
        Ok(result)
    }

    fn shared_costs_for(&self, request: &MultiQuantityRequest) -> Option<SharedCosts> {
        let key = request.shared_cost_key();
        if let Some(costs) = self.shared_costs.get(&key) {
            return Some(costs);
        }
        let first = request.quantities.first().copied().unwrap_or(1);
        match self.pricing.shared_costs(&request.quote_request(first)) {
            Ok(costs) => {
                self.shared_costs.insert(key, costs);
                Some(costs)
            }
            Err(err) => {
                tracing::warn!(error = %err, "shared costs unavailable");
                None
            }
        }
    }

    pub fn clear_all_caches(&self) {
        self.shared_costs.clear();
        self.quotes.clear();
        self.comparisons.clear();
        tracing::info!("comparison caches cleared");
    }

    /// Drop expired entries from every cache, returning how many went.
    pub fn purge_expired(&self) -> usize {
        self.shared_costs.purge_expired() + self.quotes.purge_expired() + self.comparisons.purge_expired()
    }

    pub fn cache_stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            shared_costs: self.shared_costs.stats(),
            quotes: self.quotes.stats(),
            comparisons: self.comparisons.stats(),
        }
    }

    /// Warm the caches. Failing requests are logged and skipped; returns
    /// the number that succeeded.
    pub async fn preload(&self, requests: &[MultiQuantityRequest]) -> usize {
        let mut warmed = 0;
        for request in requests {
            match self.calculate_multi_quantity(request).await {
                Ok(_) => warmed += 1,
                Err(err) => tracing::warn!(error = %err, "preload request skipped"),
            }
        }
        warmed
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialId;
    use crate::product::BagType;
    use async_trait::async_trait;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn stand_up(quantities: Vec<u32>) -> MultiQuantityRequest {
        MultiQuantityRequest::new(
            ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0),
            quantities,
        )
        .quoted_on(date())
    }

    struct FailingExecutor;

    #[async_trait]
    impl BatchExecutor for FailingExecutor {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn execute(&self, _: &PricingEngine, _: Vec<QuoteRequest>) -> PricingResult<Vec<QuoteResult>> {
            Err(PricingError::dispatch("no workers"))
        }
    }

    #[tokio::test]
    async fn test_small_quantities_share_the_minimum_run() {
        let engine = MultiQuantityEngine::default();
        let result = engine
            .calculate_multi_quantity(&stand_up(vec![100, 500, 1_000, 5_000]))
            .await
            .unwrap();

        let comparison = result.comparison.as_ref().unwrap();
        assert_eq!(comparison.best_value.quantity, 5_000);
        assert_eq!(comparison.trends.price_trend, PriceTrend::Decreasing);

        // All four fit the 500 m floor, so they cost the same in total
        let totals: Vec<f64> = result.calculations.iter().map(|c| c.quote().unwrap().total_price).collect();
        assert!(totals.windows(2).all(|w| w[0] == w[1]));
        assert!(result.quote_for(100).unwrap().unit_price > result.quote_for(5_000).unwrap().unit_price);
        assert_eq!(result.recommendations.len(), 2);
        assert!(result.metadata.shared_costs.is_some());
    }

    #[tokio::test]
    async fn test_repeat_calls_are_identical() {
        let engine = MultiQuantityEngine::default();
        let request = stand_up(vec![1_000, 10_000]);
        let first = engine.calculate_multi_quantity(&request).await.unwrap();
        let second = engine.calculate_multi_quantity(&request).await.unwrap();

        assert!(!first.metadata.from_cache);
        assert!(second.metadata.from_cache);
        assert_eq!(first.calculations, second.calculations);

        // A fresh engine computes the same prices
        let fresh = MultiQuantityEngine::default().calculate_multi_quantity(&request).await.unwrap();
        assert_eq!(first.calculations, fresh.calculations);
    }

    #[tokio::test]
    async fn test_order_and_duplicates_preserved() {
        let engine = MultiQuantityEngine::default();
        let result = engine
            .calculate_multi_quantity(&stand_up(vec![5_000, 100, 5_000]))
            .await
            .unwrap();
        let quantities: Vec<u32> = result.calculations.iter().map(|c| c.quantity).collect();
        assert_eq!(quantities, vec![5_000, 100, 5_000]);
        assert_eq!(result.metadata.distinct_quantities, 2);
        assert_eq!(result.metadata.computed_quotes, 2);
        assert_eq!(result.calculations[0], result.calculations[2]);
    }

    #[tokio::test]
    async fn test_structural_validation() {
        let engine = MultiQuantityEngine::default();
        let err = engine.calculate_multi_quantity(&stand_up(vec![])).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");

        let too_many: Vec<u32> = (1..=51).map(|q| q * 100).collect();
        assert!(engine.calculate_multi_quantity(&stand_up(too_many)).await.is_err());
    }

    #[tokio::test]
    async fn test_batches_and_quote_cache() {
        let engine = MultiQuantityEngine::default();
        let quantities: Vec<u32> = (1..=20).map(|q| q * 1_000).collect();
        let result = engine.calculate_multi_quantity(&stand_up(quantities)).await.unwrap();
        assert_eq!(result.metadata.batches, 3);
        assert_eq!(result.metadata.fallback_batches, 0);

        // Overlapping list reuses the per-quantity cache
        let overlap = engine
            .calculate_multi_quantity(&stand_up(vec![1_000, 2_000, 777]))
            .await
            .unwrap();
        assert_eq!(overlap.metadata.cached_quotes, 2);
        assert_eq!(overlap.metadata.computed_quotes, 1);
    }

    #[tokio::test]
    async fn test_executor_failure_falls_back() {
        crate::logging::init_test();
        let engine = MultiQuantityEngine::with_executor(PricingConfig::default(), Arc::new(FailingExecutor));
        let result = engine.calculate_multi_quantity(&stand_up(vec![100, 1_000])).await.unwrap();
        assert_eq!(result.metadata.fallback_batches, 1);
        assert_eq!(result.metadata.failed_quantities, 0);
        assert!(result.comparison.is_some());
    }

    #[tokio::test]
    async fn test_unpriceable_quantities_become_markers() {
        let config = PricingConfig {
            length_step_m: 0.0,
            single_sku_floor_m: 0.0,
            ..Default::default()
        };
        let engine = MultiQuantityEngine::new(config);
        let result = engine.calculate_multi_quantity(&stand_up(vec![100, 200])).await.unwrap();
        assert_eq!(result.metadata.failed_quantities, 2);
        assert!(result.comparison.is_none());
        assert!(result.recommendations.is_empty());
        assert!(matches!(result.calculations[0].outcome, QuantityOutcome::Failed { .. }));
        // Failed runs are not cached
        assert_eq!(engine.cache_stats().comparisons.entries, 0);
    }

    #[tokio::test]
    async fn test_cache_maintenance() {
        let engine = MultiQuantityEngine::default();
        let warmed = engine
            .preload(&[stand_up(vec![100, 1_000]), stand_up(vec![]), stand_up(vec![2_000])])
            .await;
        assert_eq!(warmed, 2);

        let stats = engine.cache_stats();
        assert_eq!(stats.comparisons.entries, 2);
        assert_eq!(stats.quotes.entries, 3);
        assert_eq!(stats.shared_costs.entries, 1);

        assert_eq!(engine.purge_expired(), 0);
        engine.clear_all_caches();
        let stats = engine.cache_stats();
        assert_eq!(stats.comparisons.entries + stats.quotes.entries + stats.shared_costs.entries, 0);
    }

    #[tokio::test]
    async fn test_option_and_markup_change_the_key() {
        let engine = MultiQuantityEngine::default();
        let plain = engine.calculate_multi_quantity(&stand_up(vec![1_000])).await.unwrap();
        let zipper = engine
            .calculate_multi_quantity(&stand_up(vec![1_000]).with_options(&["zipper-yes"]))
            .await
            .unwrap();
        let markup = engine
            .calculate_multi_quantity(&stand_up(vec![1_000]).with_markup_rate(0.4).without_recommendations())
            .await
            .unwrap();
        assert!(markup.recommendations.is_empty());
        assert!(!zipper.metadata.from_cache);
        assert!(!markup.metadata.from_cache);
        let price = |r: &MultiQuantityResult| r.quote_for(1_000).unwrap().total_price;
        assert!(price(&zipper) > price(&plain));
        assert!(price(&markup) > price(&plain));
    }

    #[tokio::test]
    async fn test_result_serializes() {
        let result = MultiQuantityEngine::default()
            .calculate_multi_quantity(&stand_up(vec![1_000, 5_000]))
            .await
            .unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"quote\""));
        let back: MultiQuantityResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.calculations, result.calculations);
    }
}
