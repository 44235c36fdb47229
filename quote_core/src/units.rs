//! # Unit Types
//!
//! Lightweight wrappers for the two currencies the engine handles. Costs are
//! accumulated in Korean won (the production side) and exposed in Japanese
//! yen (the sales side).
//!
//! ## Rounding Policy
//!
//! Every JPY amount that leaves the engine goes through [`round_half_up`]
//! exactly once, at the point it is exposed. Intermediate KRW figures are
//! kept at full precision.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::{Krw, Jpy};
//!
//! let cost = Krw(1_000_000.0);
//! let yen: Jpy = cost.to_jpy(0.12);
//! assert_eq!(yen.rounded(), 120_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

// ============================================================================
// Rounding
// ============================================================================

/// Round half away from zero to the nearest whole unit.
///
/// `f64::round` already rounds halves away from zero; the small epsilon
/// absorbs representation error such as `0.5 - 1e-12` coming out of a
/// multiplication by 0.12.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value + value.signum() * 1e-9).round()
}

/// Round to a fixed number of decimal places with the same policy
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

// ============================================================================
// Currency Units
// ============================================================================

/// Amount in Korean won
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Krw(pub f64);

/// Amount in Japanese yen
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jpy(pub f64);

impl Krw {
    /// Convert at the given KRW→JPY rate, without rounding
    pub fn to_jpy(self, rate: f64) -> Jpy {
        Jpy(self.0 * rate)
    }
}

impl Jpy {
    /// Whole-yen amount under the crate rounding policy
    pub fn rounded(self) -> f64 {
        round_half_up(self.0)
    }
}

impl Add for Krw {
    type Output = Krw;
    fn add(self, rhs: Krw) -> Krw {
        Krw(self.0 + rhs.0)
    }
}

impl AddAssign for Krw {
    fn add_assign(&mut self, rhs: Krw) {
        self.0 += rhs.0;
    }
}

impl Sub for Krw {
    type Output = Krw;
    fn sub(self, rhs: Krw) -> Krw {
        Krw(self.0 - rhs.0)
    }
}

impl Mul<f64> for Krw {
    type Output = Krw;
    fn mul(self, rhs: f64) -> Krw {
        Krw(self.0 * rhs)
    }
}

impl std::iter::Sum for Krw {
    fn sum<I: Iterator<Item = Krw>>(iter: I) -> Krw {
        iter.fold(Krw(0.0), |acc, x| acc + x)
    }
}

impl std::fmt::Display for Krw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₩{:.0}", self.0)
    }
}

impl std::fmt::Display for Jpy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "¥{:.0}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert_eq!(round_half_up(-2.5), -3.0);
        assert_eq!(round_half_up(f64::NAN), 0.0);
        // 12.5 reached through a lossy multiplication
        assert_eq!(round_half_up(104.166_666_666_666_67 * 0.12), 13.0);
    }

    #[test]
    fn test_round_to_cents() {
        assert!((round_to(32.466_6, 2) - 32.47).abs() < 1e-9);
        assert!((round_to(0.005, 2) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_krw_to_jpy() {
        let total: Krw = [Krw(100.0), Krw(250.0)].into_iter().sum();
        assert_eq!(total, Krw(350.0));
        assert!((total.to_jpy(0.12).0 - 42.0).abs() < 1e-9);
        assert!(((Krw(1000.0) * 1.4 - Krw(400.0)).0 - 1000.0).abs() < 1e-9);
    }
}
