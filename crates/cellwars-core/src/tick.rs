//! The per-tick update pass.
//!
//! Each tick first refreshes the selection highlights, paused or not. When
//! unpaused it then updates every slot in row-major order. A living cell:
//!
//! 1. **Ages** -- `time_alive += dt`, `health -= dt`; at zero health it dies
//!    and its turn ends.
//! 2. **Attacks** -- if it was hostile after its previous update, it deals
//!    its damage to one random living neighbor outside its close family and
//!    eats the victim if the blow is lethal.
//! 3. **Breeds** -- if healthy enough and a Bernoulli trial on its breed
//!    chance succeeds, it makes 1 to `max_breed_attempts` child attempts.
//! 4. **Re-evaluates hostility** -- hostile iff some living neighbor is
//!    neither close nor extended family.
//! 5. **Eats** -- the first corpse in neighbor slot order.
//!
//! Updates happen in place: a neighbor attacked, eaten, or born earlier in
//! the pass is seen in that state by every later slot.

use cellwars_cells::{Birth, Cell, DeathCause, is_close_family, is_enemy, provokes_hostility};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::{debug, trace};

use crate::grid::{CellGrid, Neighborhood, pair_mut};

/// What happened during one call to [`CellGrid::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// Unpaused ticks completed, including this one.
    pub tick: u64,
    /// Whether the update pass was skipped.
    pub paused: bool,
    /// Children born.
    pub births: usize,
    /// Cells that died of age.
    pub starved: usize,
    /// Cells killed in combat.
    pub killed: usize,
    /// Corpses eaten.
    pub meals: usize,
    /// Living cells after the pass.
    pub living: usize,
}

impl TickSummary {
    /// All deaths this tick.
    pub const fn deaths(&self) -> usize {
        self.starved.saturating_add(self.killed)
    }
}

impl CellGrid {
    /// Advance the simulation by `dt` seconds.
    ///
    /// Selection highlights are refreshed even when `paused`; the update
    /// pass only runs when it is not.
    pub fn tick(&mut self, dt: f64, paused: bool, rng: &mut impl Rng) -> TickSummary {
        self.refresh_selection();

        let mut summary = TickSummary {
            tick: self.ticks,
            paused,
            ..TickSummary::default()
        };

        if !paused {
            for index in 0..self.cells.len() {
                self.update_cell(index, dt, rng, &mut summary);
            }
            self.ticks = self.ticks.saturating_add(1);
            self.elapsed += dt;
            summary.tick = self.ticks;
        }

        summary.living = self.living_count();
        debug!(
            tick = summary.tick,
            paused,
            births = summary.births,
            deaths = summary.deaths(),
            kills = summary.killed,
            meals = summary.meals,
            living = summary.living,
            "Tick complete"
        );
        summary
    }

    fn update_cell(&mut self, index: usize, dt: f64, rng: &mut impl Rng, summary: &mut TickSummary) {
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        if !cell.is_alive() {
            return;
        }
        if cell.advance(dt) {
            self.kill(index, DeathCause::Starvation);
            summary.starved = summary.starved.saturating_add(1);
            return;
        }

        let neighbors = self.neighbors.get(index).copied().unwrap_or_default();

        if self.cells.get(index).is_some_and(Cell::is_hostile) {
            self.attack(index, &neighbors, rng, summary);
        }

        let breed_chance = self
            .cells
            .get(index)
            .filter(|c| c.can_breed(&self.config))
            .map(|c| c.genome().breed_chance());
        if breed_chance.is_some_and(|chance| rng.random_bool(chance)) {
            self.breed(index, &neighbors, rng, summary);
        }

        let hostile = self.cells.get(index).is_some_and(|cell| {
            neighbors
                .iter()
                .flatten()
                .filter_map(|n| self.cells.get(*n))
                .any(|other| provokes_hostility(cell, other))
        });
        if let Some(cell) = self.cells.get_mut(index) {
            cell.set_hostile(hostile);
        }

        let corpse = neighbors
            .iter()
            .flatten()
            .copied()
            .find(|n| self.cells.get(*n).is_some_and(Cell::has_corpse));
        if let Some(corpse) = corpse {
            self.eat(index, corpse, summary);
        }
    }

    /// Strike one random enemy neighbor; eat it if the blow kills.
    fn attack(
        &mut self,
        index: usize,
        neighbors: &Neighborhood,
        rng: &mut impl Rng,
        summary: &mut TickSummary,
    ) {
        let Some(attacker) = self.cells.get(index) else {
            return;
        };
        let damage = attacker.genome().damage();
        let enemies: Vec<usize> = neighbors
            .iter()
            .flatten()
            .copied()
            .filter(|n| self.cells.get(*n).is_some_and(|other| is_enemy(attacker, other)))
            .collect();
        let Some(&target) = enemies.choose(rng) else {
            return;
        };

        let lethal = self
            .cells
            .get_mut(target)
            .is_some_and(|victim| victim.take_damage(damage));
        if lethal {
            self.kill(target, DeathCause::Combat);
            summary.killed = summary.killed.saturating_add(1);
            self.eat(index, target, summary);
        }
    }

    /// Make 1 to `max_breed_attempts` child attempts, with the first
    /// close-family neighbor as mate if there is one.
    fn breed(
        &mut self,
        index: usize,
        neighbors: &Neighborhood,
        rng: &mut impl Rng,
        summary: &mut TickSummary,
    ) {
        let mate = self.cells.get(index).and_then(|parent| {
            neighbors
                .iter()
                .flatten()
                .copied()
                .find(|n| self.cells.get(*n).is_some_and(|other| is_close_family(parent, other)))
        });

        let attempts = rng.random_range(1..=self.config.max_breed_attempts);
        for _ in 0..attempts {
            let Some(target) = self.birth_target(neighbors, rng) else {
                continue;
            };
            if self.cells.get(target).is_some_and(Cell::has_corpse) {
                self.eat(index, target, summary);
            }

            let Some(mother) = self.cells.get(index).and_then(Cell::heritage) else {
                return;
            };
            let father = mate.and_then(|m| self.cells.get(m)).and_then(Cell::heritage);
            let birth = match father {
                Some(father) => Birth::Sexual { mother, father },
                None => Birth::Asexual(mother),
            };

            if let Some(child) = self.cells.get_mut(target) {
                child.be_born(&birth, &self.config, rng);
                summary.births = summary.births.saturating_add(1);
                trace!(
                    parent = %mother.pos,
                    child = %child.pos(),
                    sexual = father.is_some(),
                    "Cell born"
                );
            }
        }
    }

    /// The last corpse neighbor in slot order, else a random empty neighbor.
    fn birth_target(&self, neighbors: &Neighborhood, rng: &mut impl Rng) -> Option<usize> {
        let corpse = neighbors
            .iter()
            .rev()
            .flatten()
            .copied()
            .find(|n| self.cells.get(*n).is_some_and(Cell::has_corpse));
        if corpse.is_some() {
            return corpse;
        }
        let empty: Vec<usize> = neighbors
            .iter()
            .flatten()
            .copied()
            .filter(|n| self.cells.get(*n).is_some_and(Cell::is_empty))
            .collect();
        empty.choose(rng).copied()
    }

    /// `eater` consumes the corpse at `corpse`.
    fn eat(&mut self, eater: usize, corpse: usize, summary: &mut TickSummary) {
        let Some((eater, corpse)) = pair_mut(&mut self.cells, eater, corpse) else {
            return;
        };
        if eater.consume(corpse, &self.config).is_some() {
            summary.meals = summary.meals.saturating_add(1);
        }
    }

    /// Turn the living cell at `index` into a corpse, dropping the selection
    /// if it was the anchor.
    fn kill(&mut self, index: usize, cause: DeathCause) {
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        cell.die(&self.config);
        trace!(pos = %cell.pos(), %cause, "Cell died");
        if self.is_anchor(index) {
            self.clear_selection();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cellwars_cells::{Genome, LifeConfig, Parentage, Span};
    use cellwars_types::{GridPos, LineageId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    /// Breed chance may be zero, so cells never reproduce.
    fn sterile() -> LifeConfig {
        LifeConfig {
            breed_chance_bounds: Span::new(0.0, 0.35),
            ..LifeConfig::default()
        }
    }

    /// A breed chance of 1 always passes, and every breeding makes exactly
    /// one attempt.
    fn fertile() -> LifeConfig {
        LifeConfig {
            breed_chance_bounds: Span::new(0.05, 1.0),
            max_breed_attempts: 1,
            ..LifeConfig::default()
        }
    }

    fn grid(width: usize, height: usize, cfg: &LifeConfig) -> CellGrid {
        CellGrid::new(width, height, cfg.clone()).unwrap()
    }

    fn genome(cfg: &LifeConfig, max_health: f64, breed: f64, radius: f64, damage: f64) -> Genome {
        Genome::clamped(max_health, breed, radius, damage, cfg)
    }

    #[test]
    fn paused_tick_skips_update() {
        let cfg = sterile();
        let mut g = grid(3, 3, &cfg);
        g.implant(1, 1, genome(&cfg, 10.0, 0.0, 5.0, 1.0), 10.0, None).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let summary = g.tick(100.0, true, &mut rng);
        assert!(summary.paused);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.living, 1);
        assert!((g.get_cell(1, 1).unwrap().health() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn starvation_produces_corpse() {
        let cfg = sterile();
        let mut g = grid(5, 5, &cfg);
        g.implant(2, 2, genome(&cfg, 10.0, 0.0, 5.0, 1.0), 10.0, None).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let summary = g.tick(11.0, false, &mut rng);
        assert_eq!(summary.starved, 1);
        assert_eq!(summary.deaths(), 1);
        assert_eq!(summary.living, 0);
        assert!(g.get_cell(2, 2).unwrap().has_corpse());
        assert_eq!(g.ticks(), 1);
        assert!((g.elapsed() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn hostility_is_set_then_acted_on_next_tick() {
        let cfg = sterile();
        let mut g = grid(2, 1, &cfg);
        g.implant(0, 0, genome(&cfg, 100.0, 0.0, 5.0, 9.0), 10.0, None).unwrap();
        g.implant(1, 0, genome(&cfg, 100.0, 0.0, 5.0, 9.0), 20.0, None).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        g.tick(0.001, false, &mut rng);
        assert!(g.get_cell(0, 0).unwrap().is_hostile());
        assert!(g.get_cell(1, 0).unwrap().is_hostile());
        let before = g.get_cell(1, 0).unwrap().health();

        g.tick(0.001, false, &mut rng);
        let after = g.get_cell(1, 0).unwrap().health();
        assert!(before - after > 8.9);
    }

    #[test]
    fn lethal_attack_eats_victim() {
        let cfg = sterile();
        let mut g = grid(2, 1, &cfg);
        g.implant(0, 0, genome(&cfg, 100.0, 0.0, 5.0, 9.0), 10.0, None).unwrap();
        g.implant(1, 0, genome(&cfg, 10.0, 0.0, 5.0, 0.25), 100.0, None).unwrap();
        let mut rng = SmallRng::seed_from_u64(4);

        // Both turn hostile; the weak cell drops to 9 health.
        g.tick(1.0, false, &mut rng);
        let summary = g.tick(0.0, false, &mut rng);
        assert_eq!(summary.killed, 1);
        assert_eq!(summary.meals, 1);
        assert!(g.get_cell(1, 0).unwrap().is_empty());
        let attacker = g.get_cell(0, 0).unwrap();
        assert!(attacker.is_alive());
        // The victim never struck back: not yet hostile on tick 1, dead
        // before its turn on tick 2. 99 + 0.5 * 10.
        assert!((attacker.health() - 104.0).abs() < 1e-9);
    }

    #[test]
    fn corpse_neighbor_is_eaten() {
        let cfg = sterile();
        let mut g = grid(2, 1, &cfg);
        g.implant(0, 0, genome(&cfg, 20.0, 0.0, 5.0, 1.0), 10.0, None).unwrap();
        g.implant(1, 0, genome(&cfg, 10.0, 0.0, 5.0, 1.0), 12.0, None).unwrap();
        if let Some(cell) = g.cells.get_mut(1) {
            cell.die(&cfg);
        }
        let mut rng = SmallRng::seed_from_u64(5);
        let summary = g.tick(1.0, false, &mut rng);
        assert_eq!(summary.meals, 1);
        assert!(g.get_cell(1, 0).unwrap().is_empty());
        // 20 - 1 + 0.5 * 10
        assert!((g.get_cell(0, 0).unwrap().health() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn anchor_death_clears_selection() {
        let cfg = sterile();
        let mut g = grid(3, 3, &cfg);
        g.implant(1, 1, genome(&cfg, 10.0, 0.0, 5.0, 1.0), 10.0, None).unwrap();
        g.select_familial(1, 1).unwrap();
        let mut rng = SmallRng::seed_from_u64(6);
        g.tick(20.0, false, &mut rng);
        assert!(g.selection().is_none());
        assert!(g.cells().iter().all(|c| !c.is_selected()));
    }

    #[test]
    fn breeding_fills_neighbor_slots() {
        let cfg = LifeConfig::default();
        let mut g = grid(3, 3, &cfg);
        let mut rng = SmallRng::seed_from_u64(7);
        let lineage = Some(LineageId::from_rng(&mut rng));
        g.implant(1, 1, genome(&cfg, 100.0, 0.35, 5.0, 1.0), 10.0, lineage).unwrap();

        let mut births = 0_usize;
        for _ in 0..50 {
            births = births.saturating_add(g.tick(0.01, false, &mut rng).births);
        }
        assert!(births > 0);
        let child = g
            .cells()
            .iter()
            .find(|c| c.is_alive() && c.pos() != GridPos::new(1, 1))
            .unwrap();
        assert_eq!(child.lineage(), lineage);
        assert!(child.genome().max_health() > 90.0);
    }

    #[test]
    fn breeding_eats_corpse_then_fills_its_slot() {
        let cfg = fertile();
        let mut g = grid(2, 1, &cfg);
        let mut rng = SmallRng::seed_from_u64(8);
        let lineage = Some(LineageId::from_rng(&mut rng));
        g.implant(0, 0, genome(&cfg, 100.0, 1.0, 5.0, 0.25), 10.0, lineage).unwrap();
        g.implant(1, 0, genome(&cfg, 20.0, 0.05, 5.0, 0.25), 200.0, None).unwrap();
        if let Some(cell) = g.cells.get_mut(1) {
            cell.die(&cfg);
        }

        let summary = g.tick(0.0, false, &mut rng);
        assert_eq!(summary.births, 1);
        assert_eq!(summary.meals, 1);
        // 100 + 0.5 * 20
        assert!((g.get_cell(0, 0).unwrap().health() - 110.0).abs() < 1e-9);
        let child = g.get_cell(1, 0).unwrap();
        assert!(child.is_alive());
        assert_eq!(
            child.parentage(),
            Parentage::Asexual {
                mother: GridPos::new(0, 0)
            }
        );
        assert_eq!(child.lineage(), lineage);
    }

    #[test]
    fn breeding_prefers_last_corpse_in_slot_order() {
        let cfg = fertile();
        let mut g = grid(3, 1, &cfg);
        let mut rng = SmallRng::seed_from_u64(9);
        g.implant(1, 0, genome(&cfg, 100.0, 1.0, 5.0, 0.25), 10.0, None).unwrap();
        for x in [0, 2] {
            g.implant(x, 0, genome(&cfg, 20.0, 0.05, 5.0, 0.25), 200.0, None).unwrap();
            if let Some(cell) = g.cells.get_mut(x) {
                cell.die(&cfg);
            }
        }

        let summary = g.tick(0.0, false, &mut rng);
        assert_eq!(summary.births, 1);
        // The right-hand corpse becomes the nursery; the left one is eaten
        // in the regular eating step.
        assert_eq!(summary.meals, 2);
        let child = g.get_cell(2, 0).unwrap();
        assert!(child.is_alive());
        assert_eq!(
            child.parentage(),
            Parentage::Asexual {
                mother: GridPos::new(1, 0)
            }
        );
        assert!(g.get_cell(0, 0).unwrap().is_empty());
        assert!((g.get_cell(1, 0).unwrap().health() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn first_close_family_neighbor_fathers_the_child() {
        let cfg = fertile();
        let mut g = grid(3, 2, &cfg);
        let mut rng = SmallRng::seed_from_u64(10);
        let maternal = Some(LineageId::from_rng(&mut rng));
        let paternal = Some(LineageId::from_rng(&mut rng));
        let traits = genome(&cfg, 100.0, 1.0, 5.0, 0.25);
        g.implant(1, 0, traits, 10.0, maternal).unwrap();
        // Both suitors are close family; (2, 0) comes first in slot order.
        // Neither is healthy enough to breed itself.
        g.implant(2, 0, traits, 12.0, paternal).unwrap();
        g.implant(0, 1, traits, 8.0, paternal).unwrap();
        for index in [2, 3] {
            if let Some(cell) = g.cells.get_mut(index) {
                cell.take_damage(50.0);
            }
        }

        let summary = g.tick(0.0, false, &mut rng);
        assert!(summary.births >= 1);

        let children: Vec<&Cell> = g
            .cells()
            .iter()
            .filter(|c| {
                matches!(c.parentage(), Parentage::Sexual { mother, .. } if mother == GridPos::new(1, 0))
            })
            .collect();
        assert_eq!(children.len(), 1);
        let child = children.first().unwrap();
        assert_eq!(
            child.parentage(),
            Parentage::Sexual {
                mother: GridPos::new(1, 0),
                father: GridPos::new(2, 0)
            }
        );
        assert_eq!(child.lineage(), maternal);
        // Mean of 10 and 12, plus at most one degree of noise.
        assert!((child.color().hue() - 11.0).abs() <= 1.0 + 1e-9);
    }
}
