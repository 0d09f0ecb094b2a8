//! Population aggregates over the living cells.

use std::collections::BTreeSet;

use cellwars_cells::Cell;
use cellwars_types::{PopulationStats, TraitSummary};

use crate::grid::CellGrid;

fn summarize(cell: &Cell) -> TraitSummary {
    let genome = cell.genome();
    TraitSummary {
        max_health: genome.max_health(),
        max_hue_distance: genome.max_hue_distance(),
        breed_chance: genome.breed_chance(),
        health: cell.health(),
    }
}

impl CellGrid {
    fn living(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_alive())
    }

    /// Per-trait maxima over living cells; `None` when nothing is alive.
    pub fn population_maxima(&self) -> Option<TraitSummary> {
        self.living().map(summarize).reduce(TraitSummary::max)
    }

    /// Per-trait means over living cells; `None` when nothing is alive.
    pub fn population_averages(&self) -> Option<TraitSummary> {
        let (count, total) = self.living().map(summarize).fold(
            (0_u32, TraitSummary::default()),
            |(count, acc), s| {
                (
                    count.saturating_add(1),
                    TraitSummary {
                        max_health: acc.max_health + s.max_health,
                        max_hue_distance: acc.max_hue_distance + s.max_hue_distance,
                        breed_chance: acc.breed_chance + s.breed_chance,
                        health: acc.health + s.health,
                    },
                )
            },
        );
        if count == 0 {
            return None;
        }
        let n = f64::from(count);
        Some(TraitSummary {
            max_health: total.max_health / n,
            max_hue_distance: total.max_hue_distance / n,
            breed_chance: total.breed_chance / n,
            health: total.health / n,
        })
    }

    /// Distinct lineages among living cells. Parentless cells without a
    /// lineage are not counted.
    pub fn living_lineages(&self) -> usize {
        self.living()
            .filter_map(Cell::lineage)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Living and corpse counts plus maxima and means.
    pub fn population_stats(&self) -> PopulationStats {
        PopulationStats {
            living: self.living_count(),
            corpses: self.corpse_count(),
            maxima: self.population_maxima(),
            averages: self.population_averages(),
        }
    }
}
