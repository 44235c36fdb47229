//! Price comparison across quantities and the recommendations built on it.

use serde::{Deserialize, Serialize};

use crate::units::round_half_up;

/// One successfully priced quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

// ============================================================================
// Comparison
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestValue {
    pub quantity: u32,
    /// (highest unit price - best unit price) x quantity, JPY
    pub savings: f64,
    /// Unit price reduction versus the highest unit price, whole percent
    pub percentage: f64,
    pub reason: String,
}

/// Lot size band and its nominal discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBreakTier {
    LargeLot,
    MediumLot,
    StandardLot,
    SmallLot,
    None,
}

impl PriceBreakTier {
    pub fn for_quantity(quantity: u32) -> Self {
        match quantity {
            q if q >= 50_000 => PriceBreakTier::LargeLot,
            q if q >= 20_000 => PriceBreakTier::MediumLot,
            q if q >= 10_000 => PriceBreakTier::StandardLot,
            q if q >= 5_000 => PriceBreakTier::SmallLot,
            _ => PriceBreakTier::None,
        }
    }

    pub fn discount_rate_pct(&self) -> u32 {
        match self {
            PriceBreakTier::LargeLot => 40,
            PriceBreakTier::MediumLot => 30,
            PriceBreakTier::StandardLot => 20,
            PriceBreakTier::SmallLot => 10,
            PriceBreakTier::None => 0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PriceBreakTier::LargeLot => "Large lot",
            PriceBreakTier::MediumLot => "Medium lot",
            PriceBreakTier::StandardLot => "Standard lot",
            PriceBreakTier::SmallLot => "Small lot",
            PriceBreakTier::None => "No price break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreak {
    pub quantity: u32,
    pub tier: PriceBreakTier,
    pub discount_rate_pct: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleEconomy {
    pub quantity: u32,
    pub unit_price: f64,
    /// Saving against paying the smallest quantity's unit price, JPY
    pub total_savings: f64,
    /// Actual cost as a percentage of the baseline cost
    pub efficiency_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Decreasing,
    Stable,
    Increasing,
}

impl std::fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriceTrend::Decreasing => "decreasing",
            PriceTrend::Stable => "stable",
            PriceTrend::Increasing => "increasing",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTrends {
    pub price_trend: PriceTrend,
    pub optimal_quantity: u32,
    /// How much the last step's improvement falls short of the first, percent
    pub diminishing_returns: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityComparison {
    pub best_value: BestValue,
    pub price_breaks: Vec<PriceBreak>,
    pub economies_of_scale: Vec<ScaleEconomy>,
    pub trends: PriceTrends,
}

impl QuantityComparison {
    pub fn economy_for(&self, quantity: u32) -> Option<&ScaleEconomy> {
        self.economies_of_scale.iter().find(|e| e.quantity == quantity)
    }
}

/// Distinct quantities, ascending; the first occurrence of a duplicate wins.
fn ascending_distinct(points: &[PricePoint]) -> Vec<PricePoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.quantity);
    sorted.dedup_by_key(|p| p.quantity);
    sorted
}

/// Compare priced quantities. `points` is in the caller's order and may
/// contain duplicates. Returns `None` when nothing was priced.
pub fn generate_comparison(points: &[PricePoint]) -> Option<QuantityComparison> {
    let sorted = ascending_distinct(points);
    let baseline = *sorted.first()?;

    let best = sorted
        .iter()
        .copied()
        .reduce(|best, p| if p.unit_price < best.unit_price { p } else { best })
        .unwrap_or(baseline);
    let highest = sorted.iter().map(|p| p.unit_price).fold(f64::MIN, f64::max);
    let saving_rate = if highest > 0.0 {
        (highest - best.unit_price) / highest
    } else {
        0.0
    };

    let best_value = BestValue {
        quantity: best.quantity,
        savings: round_half_up((highest - best.unit_price) * best.quantity as f64),
        percentage: round_half_up(saving_rate * 100.0),
        reason: format!("Lowest unit price ({:.2} JPY)", best.unit_price),
    };

    let price_breaks = sorted
        .iter()
        .map(|p| {
            let tier = PriceBreakTier::for_quantity(p.quantity);
            PriceBreak {
                quantity: p.quantity,
                tier,
                discount_rate_pct: tier.discount_rate_pct(),
            }
        })
        .collect();

    let economies_of_scale = sorted
        .iter()
        .map(|p| {
            let actual = p.unit_price * p.quantity as f64;
            let baseline_cost = baseline.unit_price * p.quantity as f64;
            ScaleEconomy {
                quantity: p.quantity,
                unit_price: p.unit_price,
                total_savings: round_half_up(baseline_cost - actual),
                efficiency_pct: if baseline_cost > 0.0 {
                    round_half_up(actual / baseline_cost * 100.0)
                } else {
                    100.0
                },
            }
        })
        .collect();

    let input_prices: Vec<f64> = points.iter().map(|p| p.unit_price).collect();
    let trends = PriceTrends {
        price_trend: analyze_price_trend(&input_prices),
        optimal_quantity: optimal_quantity(&sorted),
        diminishing_returns: diminishing_returns(&sorted),
    };

    Some(QuantityComparison {
        best_value,
        price_breaks,
        economies_of_scale,
        trends,
    })
}

/// First half versus second half of the prices, with a 5% dead band.
pub fn analyze_price_trend(prices: &[f64]) -> PriceTrend {
    if prices.len() < 2 {
        return PriceTrend::Stable;
    }
    let mid = prices.len() / 2;
    let average = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;
    let first = average(&prices[..mid]);
    let second = average(&prices[mid..]);
    if !(first > 0.0) {
        return PriceTrend::Stable;
    }

    let change = (second - first) / first;
    if change < -0.05 {
        PriceTrend::Decreasing
    } else if change > 0.05 {
        PriceTrend::Increasing
    } else {
        PriceTrend::Stable
    }
}

fn optimal_quantity(sorted: &[PricePoint]) -> u32 {
    sorted
        .iter()
        .filter(|p| p.quantity > 0)
        .min_by(|a, b| (a.unit_price / a.quantity as f64).total_cmp(&(b.unit_price / b.quantity as f64)))
        .map(|p| p.quantity)
        .unwrap_or(0)
}

fn diminishing_returns(sorted: &[PricePoint]) -> f64 {
    let n = sorted.len();
    if n < 3 {
        return 0.0;
    }
    let improvement = |from: f64, to: f64| if from > 0.0 { (from - to) / from } else { 0.0 };
    let first = improvement(sorted[0].unit_price, sorted[1].unit_price);
    let last = improvement(sorted[n - 2].unit_price, sorted[n - 1].unit_price);
    if first == 0.0 {
        return 0.0;
    }
    round_half_up((1.0 - last / first) * 100.0)
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    CostOptimized,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub quantity: u32,
    pub reasoning: Vec<String>,
    pub estimated_savings: f64,
    pub confidence: f64,
}

pub fn generate_recommendations(comparison: &QuantityComparison) -> Vec<Recommendation> {
    let best = &comparison.best_value;
    let best_efficiency = comparison
        .economy_for(best.quantity)
        .map(|e| e.efficiency_pct)
        .unwrap_or(100.0);

    let mut recommendations = vec![Recommendation {
        kind: RecommendationKind::CostOptimized,
        title: "Lowest cost".to_string(),
        description: format!("{} units give the lowest unit price", best.quantity),
        quantity: best.quantity,
        reasoning: vec![
            format!("Lowest unit price at {} units", best.quantity),
            format!("Cost efficiency {}% of the smallest quantity", best_efficiency),
            format!("{}% below the highest unit price", best.percentage),
        ],
        estimated_savings: best.savings,
        confidence: 0.95,
    }];

    let quantities: Vec<u32> = comparison.economies_of_scale.iter().map(|e| e.quantity).collect();
    if let Some(&middle) = quantities.get(quantities.len() / 2) {
        let savings = comparison.economy_for(middle).map(|e| e.total_savings).unwrap_or(0.0);
        recommendations.push(Recommendation {
            kind: RecommendationKind::Balanced,
            title: "Balanced".to_string(),
            description: "Middle quantity balancing unit price and stock".to_string(),
            quantity: middle,
            reasoning: vec![
                "Spreads inventory risk across a moderate run".to_string(),
                format!("Saves {} JPY against the smallest quantity's unit price", savings),
                format!("Unit price {:.2} JPY", comparison.economy_for(middle).map(|e| e.unit_price).unwrap_or(0.0)),
            ],
            estimated_savings: savings,
            confidence: 0.80,
        });
    }

    recommendations
}
