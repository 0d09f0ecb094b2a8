//! Error types for the cellwars-cells crate.
//!
//! The life cycle itself never fails: traits are clamped and hues wrapped.
//! The only fallible surface is validation of a [`LifeConfig`] supplied by
//! the operator before the simulation starts.
//!
//! [`LifeConfig`]: crate::config::LifeConfig

/// Errors raised while validating cell life parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CellError {
    /// A sampling or clamping range has its bounds reversed.
    #[error("invalid range for {name}: min {min} is greater than max {max}")]
    InvertedRange {
        /// The configuration key.
        name: &'static str,
        /// The configured lower bound.
        min: f64,
        /// The configured upper bound.
        max: f64,
    },

    /// A parameter is NaN or infinite.
    #[error("{name} must be a finite number, got {value}")]
    NonFinite {
        /// The configuration key.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A parameter that must lie in `[0, 1]` does not.
    #[error("{name} must be within [0, 1], got {value}")]
    FractionOutOfRange {
        /// The configuration key.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A parameter that must be non-negative is negative.
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// The configuration key.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Breeding must make at least one attempt.
    #[error("max_breed_attempts must be at least 1")]
    NoBreedAttempts,
}
