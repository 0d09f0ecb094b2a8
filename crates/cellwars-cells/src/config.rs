//! Tunable parameters for cell life mechanics.
//!
//! The [`LifeConfig`] struct bundles every constant the life cycle uses:
//! trait clamps, the sampling ranges of a spontaneous spawn, mutation noise,
//! and the energy economics of breeding and eating. The engine reads it from
//! the `life` section of `cellwars-config.yaml`; tests and callers that do not
//! care use [`LifeConfig::default`].

use rand::Rng;
use serde::Deserialize;

use crate::error::CellError;

/// A closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Span {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Span {
    /// Build a span from its bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the span. NaN maps to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Whether `value` lies inside the span.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Draw a value uniformly from the span.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        rng.random_range(self.min..=self.max)
    }

    fn validate(&self, name: &'static str) -> Result<(), CellError> {
        finite(name, self.min)?;
        finite(name, self.max)?;
        if self.min > self.max {
            return Err(CellError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Configuration for cell life mechanics.
///
/// Defaults reproduce the reference behavior: a spontaneous spawn samples
/// `max_health` from `[1.5, 5]`, which the floor of 10 then overrides, so
/// every fresh cell starts with 10 health.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Lower bound on `max_health` (default: 10).
    pub max_health_floor: f64,

    /// Clamp for `breed_chance` (default: 0.05--0.35).
    pub breed_chance_bounds: Span,

    /// Lower bound on `max_hue_distance` (default: 0).
    pub max_hue_distance_floor: f64,

    /// Clamp for `damage` (default: 0.25--9).
    pub damage_bounds: Span,

    /// Sampling range of `max_health` for a spawn without parents (default: 1.5--5).
    pub spawn_max_health: Span,

    /// Sampling range of `breed_chance` for a spawn without parents (default: 0.1--0.5).
    pub spawn_breed_chance: Span,

    /// Sampling range of `max_hue_distance` for a spawn without parents (default: 5--15).
    pub spawn_max_hue_distance: Span,

    /// Sampling range of `damage` for a spawn without parents (default: 0.1--1).
    pub spawn_damage: Span,

    /// Half-width of the uniform noise added to every inherited trait and
    /// hue (default: 1).
    pub mutation_range: f64,

    /// Fraction of `max_health` a cell needs before it may breed (default: 0.75).
    pub breed_health_fraction: f64,

    /// Fraction of a corpse's `max_health` gained by eating it (default: 0.5).
    pub corpse_energy_fraction: f64,

    /// Degrees the eater's hue moves toward the eaten corpse (default: 0.001).
    pub hue_shift_step: f64,

    /// Saturation and value of a corpse (default: 0.1).
    pub corpse_tint: f64,

    /// Upper bound of the uniform number of child attempts per breeding,
    /// inclusive, starting at 1 (default: 3).
    pub max_breed_attempts: u32,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            max_health_floor: 10.0,
            breed_chance_bounds: Span::new(0.05, 0.35),
            max_hue_distance_floor: 0.0,
            damage_bounds: Span::new(0.25, 9.0),
            spawn_max_health: Span::new(1.5, 5.0),
            spawn_breed_chance: Span::new(0.1, 0.5),
            spawn_max_hue_distance: Span::new(5.0, 15.0),
            spawn_damage: Span::new(0.1, 1.0),
            mutation_range: 1.0,
            breed_health_fraction: 0.75,
            corpse_energy_fraction: 0.5,
            hue_shift_step: 0.001,
            corpse_tint: 0.1,
            max_breed_attempts: 3,
        }
    }
}

impl LifeConfig {
    /// Check every parameter for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`CellError`] found: a reversed range, a non-finite
    /// number, a fraction outside `[0, 1]`, a negative step, or zero breeding
    /// attempts.
    pub fn validate(&self) -> Result<(), CellError> {
        finite("max_health_floor", self.max_health_floor)?;
        finite("max_hue_distance_floor", self.max_hue_distance_floor)?;
        self.breed_chance_bounds.validate("breed_chance_bounds")?;
        self.damage_bounds.validate("damage_bounds")?;
        self.spawn_max_health.validate("spawn_max_health")?;
        self.spawn_breed_chance.validate("spawn_breed_chance")?;
        self.spawn_max_hue_distance.validate("spawn_max_hue_distance")?;
        self.spawn_damage.validate("spawn_damage")?;

        // breed_chance feeds a Bernoulli trial, so its clamp must be a probability range.
        fraction("breed_chance_bounds.min", self.breed_chance_bounds.min)?;
        fraction("breed_chance_bounds.max", self.breed_chance_bounds.max)?;
        fraction("breed_health_fraction", self.breed_health_fraction)?;
        fraction("corpse_tint", self.corpse_tint)?;

        non_negative("mutation_range", self.mutation_range)?;
        non_negative("corpse_energy_fraction", self.corpse_energy_fraction)?;
        non_negative("hue_shift_step", self.hue_shift_step)?;

        if self.max_breed_attempts == 0 {
            return Err(CellError::NoBreedAttempts);
        }
        Ok(())
    }

    /// Uniform noise in `[-mutation_range, mutation_range]`.
    pub fn mutation(&self, rng: &mut impl Rng) -> f64 {
        rng.random_range(-self.mutation_range..=self.mutation_range)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), CellError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CellError::NonFinite { name, value })
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), CellError> {
    finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CellError::FractionOutOfRange { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), CellError> {
    finite(name, value)?;
    if value < 0.0 {
        Err(CellError::Negative { name, value })
    } else {
        Ok(())
    }
}
