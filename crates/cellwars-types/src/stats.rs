//! Population aggregate structs reported to the console.

use serde::{Deserialize, Serialize};

/// One value per tracked trait, used for both maxima and means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitSummary {
    /// Maximum health (lifespan budget).
    pub max_health: f64,
    /// Kinship radius in hue degrees.
    pub max_hue_distance: f64,
    /// Per-tick breeding probability.
    pub breed_chance: f64,
    /// Current health.
    pub health: f64,
}

impl TraitSummary {
    /// Component-wise maximum of two summaries.
    pub fn max(self, other: Self) -> Self {
        Self {
            max_health: self.max_health.max(other.max_health),
            max_hue_distance: self.max_hue_distance.max(other.max_hue_distance),
            breed_chance: self.breed_chance.max(other.breed_chance),
            health: self.health.max(other.health),
        }
    }
}

/// Snapshot of the living population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Number of living cells.
    pub living: usize,
    /// Number of uneaten corpses.
    pub corpses: usize,
    /// Per-trait maxima, `None` when nothing is alive.
    pub maxima: Option<TraitSummary>,
    /// Per-trait means, `None` when nothing is alive.
    pub averages: Option<TraitSummary>,
}
