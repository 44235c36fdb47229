//! Batch execution of per-quantity quotes.
//!
//! A [`BatchExecutor`] prices a batch of requests off the caller's task.
//! [`dispatch_batch`] bounds it with a deadline and recomputes the batch
//! in-process when the executor fails, times out, or returns the wrong
//! number of results.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::time::timeout;

use crate::errors::{PricingError, PricingResult};
use crate::pricing::{PricingEngine, QuoteRequest, QuoteResult};

/// Prices a batch of requests, one result per request, in order.
#[async_trait]
pub trait BatchExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, engine: &PricingEngine, requests: Vec<QuoteRequest>) -> PricingResult<Vec<QuoteResult>>;
}

/// Runs each request on its own tokio blocking task.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingPoolExecutor;

#[async_trait]
impl BatchExecutor for BlockingPoolExecutor {
    fn name(&self) -> &'static str {
        "blocking_pool"
    }

    async fn execute(&self, engine: &PricingEngine, requests: Vec<QuoteRequest>) -> PricingResult<Vec<QuoteResult>> {
        let tasks: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let engine = engine.clone();
                tokio::task::spawn_blocking(move || engine.try_calculate_quote(&request))
            })
            .collect();

        join_all(tasks)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(PricingError::dispatch(format!("blocking task failed: {}", e))),
            })
            .collect()
    }
}

/// Outcome of one batch: one entry per request, in order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<Result<QuoteResult, String>>,
    /// The batch was recomputed in-process
    pub fell_back: bool,
}

/// Run a batch through `executor`, falling back to in-process pricing.
pub async fn dispatch_batch(
    executor: &dyn BatchExecutor,
    engine: &PricingEngine,
    requests: Vec<QuoteRequest>,
    deadline: Duration,
) -> BatchOutcome {
    let expected = requests.len();
    let failure = match timeout(deadline, executor.execute(engine, requests.clone())).await {
        Ok(Ok(results)) if results.len() == expected => {
            return BatchOutcome {
                results: results.into_iter().map(Ok).collect(),
                fell_back: false,
            };
        }
        Ok(Ok(results)) => format!("returned {} results for {} requests", results.len(), expected),
        Ok(Err(err)) => err.to_string(),
        Err(_) => format!("timed out after {} ms", deadline.as_millis()),
    };

    tracing::warn!(
        executor = executor.name(),
        batch_size = expected,
        reason = %failure,
        "batch executor failed, recomputing in-process"
    );

    BatchOutcome {
        results: compute_in_process(engine, &requests),
        fell_back: true,
    }
}

/// Price each request on the current thread, isolating failures per request.
pub fn compute_in_process(engine: &PricingEngine, requests: &[QuoteRequest]) -> Vec<Result<QuoteResult, String>> {
    requests
        .iter()
        .map(|request| match catch_unwind(AssertUnwindSafe(|| engine.try_calculate_quote(request))) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err("quote calculation panicked".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialId;
    use crate::product::{BagType, ProductSpec, QuantityPlan};

    struct FailingExecutor;

    #[async_trait]
    impl BatchExecutor for FailingExecutor {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn execute(&self, _: &PricingEngine, _: Vec<QuoteRequest>) -> PricingResult<Vec<QuoteResult>> {
            Err(PricingError::dispatch("worker pool unavailable"))
        }
    }

    struct SlowExecutor;

    #[async_trait]
    impl BatchExecutor for SlowExecutor {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn execute(&self, engine: &PricingEngine, requests: Vec<QuoteRequest>) -> PricingResult<Vec<QuoteResult>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            BlockingPoolExecutor.execute(engine, requests).await
        }
    }

    struct ShortExecutor;

    #[async_trait]
    impl BatchExecutor for ShortExecutor {
        fn name(&self) -> &'static str {
            "short"
        }

        async fn execute(&self, _: &PricingEngine, _: Vec<QuoteRequest>) -> PricingResult<Vec<QuoteResult>> {
            Ok(Vec::new())
        }
    }

    fn requests(quantities: &[u32]) -> Vec<QuoteRequest> {
        let base = QuoteRequest::new(
            ProductSpec::pouch(BagType::StandUp, 100.0, 150.0, MaterialId::PetAl).with_depth(30.0),
            QuantityPlan::single(1),
        );
        quantities.iter().map(|&q| base.for_quantity(q)).collect()
    }

    #[tokio::test]
    async fn test_blocking_pool_preserves_order() {
        let engine = PricingEngine::default();
        let outcome = dispatch_batch(
            &BlockingPoolExecutor,
            &engine,
            requests(&[5_000, 100, 5_000]),
            Duration::from_secs(10),
        )
        .await;
        assert!(!outcome.fell_back);
        let quantities: Vec<u64> = outcome.results.iter().map(|r| r.as_ref().unwrap().quantity).collect();
        assert_eq!(quantities, vec![5_000, 100, 5_000]);
    }

    #[tokio::test]
    async fn test_failing_executor_falls_back() {
        let engine = PricingEngine::default();
        let outcome = dispatch_batch(&FailingExecutor, &engine, requests(&[100, 500]), Duration::from_secs(10)).await;
        assert!(outcome.fell_back);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results.iter().all(|r| r.is_ok()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_executor_times_out() {
        let engine = PricingEngine::default();
        let outcome = dispatch_batch(&SlowExecutor, &engine, requests(&[1_000]), Duration::from_millis(100)).await;
        assert!(outcome.fell_back);
        assert_eq!(outcome.results[0].as_ref().unwrap().quantity, 1_000);
    }

    #[tokio::test]
    async fn test_result_count_mismatch_falls_back() {
        let engine = PricingEngine::default();
        let outcome = dispatch_batch(&ShortExecutor, &engine, requests(&[100, 200]), Duration::from_secs(1)).await;
        assert!(outcome.fell_back);
        assert_eq!(outcome.results.len(), 2);
    }

    #[test]
    fn test_in_process_failures_are_isolated() {
        // A zero rounding step makes every secured length NaN
        let config = crate::config::PricingConfig {
            length_step_m: 0.0,
            single_sku_floor_m: 0.0,
            ..Default::default()
        };
        let engine = PricingEngine::new(config);
        let results = compute_in_process(&engine, &requests(&[100, 200]));
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_err()));
    }
}
