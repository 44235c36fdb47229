//! # Error Types
//!
//! Structured error types for quote_core. Most pricing problems are *not*
//! errors: degenerate geometry, oversized widths and unknown option ids all
//! produce a degraded quote with warnings. The variants here cover the cases
//! that a caller genuinely has to handle.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{PricingError, PricingResult};
//!
//! fn validate_rate(rate: f64) -> PricingResult<()> {
//!     if !(0.0..=5.0).contains(&rate) {
//!         return Err(PricingError::invalid_input(
//!             "markup_rate",
//!             rate.to_string(),
//!             "Markup rate must be between 0 and 5",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::roll::RollViolation;

/// Result type alias for quote_core operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Structured error type for pricing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PricingError {
    /// An input value is invalid (out of range, unknown id, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The request shape itself cannot be priced (empty quantity list, too many SKUs)
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Roll film parameters break a length or weight constraint
    #[error("Roll constraint violated ({violation:?}): {reason}")]
    RollConstraint {
        violation: RollViolation,
        reason: String,
    },

    /// Offloaded batch evaluation failed or timed out
    #[error("Batch dispatch failed: {reason}")]
    Dispatch { reason: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PricingError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRequest error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        PricingError::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Create a RollConstraint error
    pub fn roll_constraint(violation: RollViolation, reason: impl Into<String>) -> Self {
        PricingError::RollConstraint {
            violation,
            reason: reason.into(),
        }
    }

    /// Create a Dispatch error
    pub fn dispatch(reason: impl Into<String>) -> Self {
        PricingError::Dispatch {
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        PricingError::Config {
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PricingError::Internal {
            message: message.into(),
        }
    }

    /// Dispatch failures are retried in-process, so they count as recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PricingError::Dispatch { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::InvalidInput { .. } => "INVALID_INPUT",
            PricingError::InvalidRequest { .. } => "INVALID_REQUEST",
            PricingError::RollConstraint { .. } => "ROLL_CONSTRAINT",
            PricingError::Dispatch { .. } => "DISPATCH_FAILED",
            PricingError::Config { .. } => "CONFIG_ERROR",
            PricingError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PricingError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = PricingError::invalid_input("width_mm", "-5", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: PricingError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("\"type\":\"InvalidInput\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PricingError::invalid_request("empty").error_code(), "INVALID_REQUEST");
        assert_eq!(
            PricingError::roll_constraint(RollViolation::RollCount, "too many rolls").error_code(),
            "ROLL_CONSTRAINT"
        );
        assert!(PricingError::dispatch("timeout").is_recoverable());
        assert!(!PricingError::config("bad").is_recoverable());
    }
}
