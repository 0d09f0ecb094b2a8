//! Heritable traits and their derivation at birth.
//!
//! A [`Genome`] holds the four real-valued traits that evolve across
//! generations. Every constructor routes through [`Genome::clamped`], so the
//! bounds from [`LifeConfig`] hold after every mutation:
//!
//! - `max_health` >= `max_health_floor` (10)
//! - `breed_chance` in `breed_chance_bounds` (0.05--0.35)
//! - `max_hue_distance` >= `max_hue_distance_floor` (0)
//! - `damage` in `damage_bounds` (0.25--9)
//!
//! Hue is inherited alongside the genome but lives on the cell's color; see
//! [`crate::cell::Cell::be_born`].

use rand::Rng;
use serde::Serialize;

use crate::config::LifeConfig;

/// The evolvable traits of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Genome {
    /// Health budget; also the health a newborn starts with.
    max_health: f64,
    /// Probability of breeding on a tick where the cell is healthy enough.
    breed_chance: f64,
    /// Kinship radius in hue degrees.
    max_hue_distance: f64,
    /// Health removed from an enemy per attack.
    damage: f64,
}

impl Genome {
    /// Build a genome, clamping each trait into its configured bounds.
    pub fn clamped(
        max_health: f64,
        breed_chance: f64,
        max_hue_distance: f64,
        damage: f64,
        config: &LifeConfig,
    ) -> Self {
        Self {
            max_health: floor(max_health, config.max_health_floor),
            breed_chance: config.breed_chance_bounds.clamp(breed_chance),
            max_hue_distance: floor(max_hue_distance, config.max_hue_distance_floor),
            damage: config.damage_bounds.clamp(damage),
        }
    }

    /// The genome of an empty slot: every trait at its lower bound.
    pub const fn baseline(config: &LifeConfig) -> Self {
        Self {
            max_health: config.max_health_floor,
            breed_chance: config.breed_chance_bounds.min,
            max_hue_distance: config.max_hue_distance_floor,
            damage: config.damage_bounds.min,
        }
    }

    /// A genome for a cell spawned without parents.
    ///
    /// Each trait is drawn from its `spawn_*` range and then clamped, so the
    /// clamp can dominate the sampled value (the default `max_health` range
    /// lies entirely below the floor).
    pub fn spontaneous(config: &LifeConfig, rng: &mut impl Rng) -> Self {
        let max_health = config.spawn_max_health.sample(rng);
        let breed_chance = config.spawn_breed_chance.sample(rng);
        let max_hue_distance = config.spawn_max_hue_distance.sample(rng);
        let damage = config.spawn_damage.sample(rng);
        Self::clamped(max_health, breed_chance, max_hue_distance, damage, config)
    }

    /// A genome inherited from a single parent: each trait plus mutation noise.
    pub fn asexual(parent: &Self, config: &LifeConfig, rng: &mut impl Rng) -> Self {
        let max_health = parent.max_health + config.mutation(rng);
        let breed_chance = parent.breed_chance + config.mutation(rng);
        let max_hue_distance = parent.max_hue_distance + config.mutation(rng);
        let damage = parent.damage + config.mutation(rng);
        Self::clamped(max_health, breed_chance, max_hue_distance, damage, config)
    }

    /// A genome inherited from two parents: each trait is the parents' mean
    /// plus mutation noise.
    pub fn sexual(mother: &Self, father: &Self, config: &LifeConfig, rng: &mut impl Rng) -> Self {
        let max_health = mean(mother.max_health, father.max_health) + config.mutation(rng);
        let breed_chance = mean(mother.breed_chance, father.breed_chance) + config.mutation(rng);
        let max_hue_distance =
            mean(mother.max_hue_distance, father.max_hue_distance) + config.mutation(rng);
        let damage = mean(mother.damage, father.damage) + config.mutation(rng);
        Self::clamped(max_health, breed_chance, max_hue_distance, damage, config)
    }

    /// Health budget.
    pub const fn max_health(&self) -> f64 {
        self.max_health
    }

    /// Breeding probability per eligible tick.
    pub const fn breed_chance(&self) -> f64 {
        self.breed_chance
    }

    /// Kinship radius in hue degrees.
    pub const fn max_hue_distance(&self) -> f64 {
        self.max_hue_distance
    }

    /// Damage dealt per attack.
    pub const fn damage(&self) -> f64 {
        self.damage
    }
}

fn mean(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

fn floor(value: f64, min: f64) -> f64 {
    if value.is_nan() { min } else { value.max(min) }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn assert_within_bounds(g: &Genome, cfg: &LifeConfig) {
        assert!(g.max_health() >= cfg.max_health_floor);
        assert!(cfg.breed_chance_bounds.contains(g.breed_chance()));
        assert!(g.max_hue_distance() >= cfg.max_hue_distance_floor);
        assert!(cfg.damage_bounds.contains(g.damage()));
    }

    #[test]
    fn clamped_enforces_bounds() {
        let cfg = LifeConfig::default();
        let g = Genome::clamped(-4.0, 0.9, -2.0, 100.0, &cfg);
        assert!((g.max_health() - 10.0).abs() < f64::EPSILON);
        assert!((g.breed_chance() - 0.35).abs() < f64::EPSILON);
        assert!(g.max_hue_distance().abs() < f64::EPSILON);
        assert!((g.damage() - 9.0).abs() < f64::EPSILON);

        let low = Genome::clamped(25.0, 0.0, 40.0, 0.0, &cfg);
        assert!((low.max_health() - 25.0).abs() < f64::EPSILON);
        assert!((low.breed_chance() - 0.05).abs() < f64::EPSILON);
        assert!((low.max_hue_distance() - 40.0).abs() < f64::EPSILON);
        assert!((low.damage() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn spontaneous_genome_respects_clamps() {
        let cfg = LifeConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..200 {
            let g = Genome::spontaneous(&cfg, &mut rng);
            assert_within_bounds(&g, &cfg);
            // The spawn range for max_health sits below the floor.
            assert!((g.max_health() - 10.0).abs() < f64::EPSILON);
            assert!((5.0..=15.0).contains(&g.max_hue_distance()));
        }
    }

    #[test]
    fn floor_overrides_asexual_noise() {
        let cfg = LifeConfig::default();
        let parent = Genome {
            max_health: 3.0,
            breed_chance: 0.2,
            max_hue_distance: 10.0,
            damage: 1.0,
        };
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..200 {
            let child = Genome::asexual(&parent, &cfg, &mut rng);
            // Raw value lies in [2, 4]; the floor of 10 wins every time.
            assert!((child.max_health() - 10.0).abs() < f64::EPSILON);
            assert!((9.0..=11.0).contains(&child.max_hue_distance()));
        }
    }

    #[test]
    fn asexual_noise_is_bounded_by_mutation_range() {
        let cfg = LifeConfig::default();
        let parent = Genome::clamped(40.0, 0.2, 30.0, 4.0, &cfg);
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            let child = Genome::asexual(&parent, &cfg, &mut rng);
            assert!((child.max_health() - 40.0).abs() <= 1.0);
            assert!((child.max_hue_distance() - 30.0).abs() <= 1.0);
            assert!((child.damage() - 4.0).abs() <= 1.0);
            assert_within_bounds(&child, &cfg);
        }
    }

    #[test]
    fn sexual_child_centers_on_parent_mean() {
        let cfg = LifeConfig {
            mutation_range: 0.0,
            ..LifeConfig::default()
        };
        let mother = Genome::clamped(20.0, 0.1, 10.0, 2.0, &cfg);
        let father = Genome::clamped(30.0, 0.3, 20.0, 4.0, &cfg);
        let mut rng = SmallRng::seed_from_u64(8);
        let child = Genome::sexual(&mother, &father, &cfg, &mut rng);
        assert!((child.max_health() - 25.0).abs() < 1e-12);
        assert!((child.breed_chance() - 0.2).abs() < 1e-12);
        assert!((child.max_hue_distance() - 15.0).abs() < 1e-12);
        assert!((child.damage() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_mutation_never_escapes_bounds() {
        let cfg = LifeConfig::default();
        let mut rng = SmallRng::seed_from_u64(21);
        let mut g = Genome::spontaneous(&cfg, &mut rng);
        for _ in 0..2000 {
            g = Genome::asexual(&g, &cfg, &mut rng);
            assert_within_bounds(&g, &cfg);
        }
    }

    #[test]
    fn baseline_sits_on_lower_bounds() {
        let cfg = LifeConfig::default();
        let g = Genome::baseline(&cfg);
        assert!((g.max_health() - 10.0).abs() < f64::EPSILON);
        assert!((g.damage() - 0.25).abs() < f64::EPSILON);
    }
}
