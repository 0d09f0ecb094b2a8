//! The per-slot cell and the self-contained parts of its life cycle.
//!
//! A [`Cell`] occupies one grid position for the whole program and cycles
//! through [`CellState`]: Empty, Alive, Corpse, Empty again. Transitions
//! that involve a single cell (birth, aging, damage, death, reset) live here.
//! Transitions that involve a neighbor (eating) take the neighbor as a
//! second `&mut Cell`; the grid is responsible for handing out disjoint
//! borrows.

use core::fmt;

use cellwars_types::{CellColor, CellState, GridPos, HUE_RANGE, LineageId};
use rand::Rng;
use serde::Serialize;

use crate::config::LifeConfig;
use crate::genome::Genome;

/// Why a living cell became a corpse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Health ran out through aging.
    Starvation,
    /// Health ran out through an attack.
    Combat,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::Combat => write!(f, "combat"),
        }
    }
}

/// Positions of the parents that produced the current occupant.
///
/// Non-owning: the parents may have died and their slots been reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Parentage {
    /// Spawned without parents, or the slot is not alive.
    #[default]
    None,
    /// Born from a single parent.
    Asexual {
        /// The breeding parent.
        mother: GridPos,
    },
    /// Born from two parents.
    Sexual {
        /// The breeding parent.
        mother: GridPos,
        /// The close-family mate.
        father: GridPos,
    },
}

/// Everything a child inherits from one parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heritage {
    /// Where the parent lives.
    pub pos: GridPos,
    /// The parent's traits.
    pub genome: Genome,
    /// The parent's color; only the hue is inherited.
    pub color: CellColor,
    /// The parent's lineage.
    pub lineage: Option<LineageId>,
}

/// How a cell comes to life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Birth {
    /// Random genome, random hue, fresh lineage.
    Spontaneous,
    /// One parent: traits and hue copied with mutation noise.
    Asexual(Heritage),
    /// Two parents: traits and hue averaged, then mutated. Lineage follows
    /// the mother.
    Sexual {
        /// The breeding parent.
        mother: Heritage,
        /// The close-family mate.
        father: Heritage,
    },
}

/// One slot of the grid and whatever currently lives in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pos: GridPos,
    state: CellState,
    health: f64,
    time_alive: f64,
    hostile: bool,
    selected: bool,
    lineage: Option<LineageId>,
    genome: Genome,
    color: CellColor,
    parentage: Parentage,
}

impl Cell {
    /// An empty slot at `pos`.
    pub const fn new(pos: GridPos, config: &LifeConfig) -> Self {
        Self {
            pos,
            state: CellState::Empty,
            health: 0.0,
            time_alive: 0.0,
            hostile: false,
            selected: false,
            lineage: None,
            genome: Genome::baseline(config),
            color: CellColor::white(),
            parentage: Parentage::None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Grid position; never changes.
    pub const fn pos(&self) -> GridPos {
        self.pos
    }

    /// Current life-cycle state.
    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Whether the slot holds a living cell.
    pub const fn is_alive(&self) -> bool {
        matches!(self.state, CellState::Alive)
    }

    /// Whether the slot holds an uneaten corpse.
    pub const fn has_corpse(&self) -> bool {
        matches!(self.state, CellState::Corpse)
    }

    /// Whether the slot is empty.
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, CellState::Empty)
    }

    /// Current health.
    pub const fn health(&self) -> f64 {
        self.health
    }

    /// Seconds since birth.
    pub const fn time_alive(&self) -> f64 {
        self.time_alive
    }

    /// Whether the cell will attack on its next update.
    pub const fn is_hostile(&self) -> bool {
        self.hostile
    }

    /// Whether the cell is highlighted for the next draw.
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Lineage of the current occupant.
    pub const fn lineage(&self) -> Option<LineageId> {
        self.lineage
    }

    /// Heritable traits.
    pub const fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Current color.
    pub const fn color(&self) -> &CellColor {
        &self.color
    }

    /// Who produced the current occupant.
    pub const fn parentage(&self) -> Parentage {
        self.parentage
    }

    /// Whether this cell may attempt to breed: alive with health at least
    /// `breed_health_fraction` of its maximum.
    pub fn can_breed(&self, config: &LifeConfig) -> bool {
        self.is_alive() && self.health >= config.breed_health_fraction * self.genome.max_health()
    }

    /// What a child would inherit from this cell, if it is alive.
    pub const fn heritage(&self) -> Option<Heritage> {
        if !self.is_alive() {
            return None;
        }
        Some(Heritage {
            pos: self.pos,
            genome: self.genome,
            color: self.color,
            lineage: self.lineage,
        })
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Bring the slot to life.
    ///
    /// The hue is drawn first, then the genome traits. The caller is
    /// responsible for eating any corpse in the slot beforehand; a corpse
    /// left here is simply overwritten.
    pub fn be_born(&mut self, birth: &Birth, config: &LifeConfig, rng: &mut impl Rng) {
        let (hue, genome, lineage, parentage) = match birth {
            Birth::Spontaneous => {
                let hue = rng.random_range(0.0..HUE_RANGE);
                let genome = Genome::spontaneous(config, rng);
                (hue, genome, Some(LineageId::from_rng(rng)), Parentage::None)
            }
            Birth::Asexual(mother) => {
                let hue = mother.color.hue() + config.mutation(rng);
                let genome = Genome::asexual(&mother.genome, config, rng);
                let parentage = Parentage::Asexual { mother: mother.pos };
                (hue, genome, mother.lineage, parentage)
            }
            Birth::Sexual { mother, father } => {
                let hue = CellColor::blend(&mother.color, &father.color).hue() + config.mutation(rng);
                let genome = Genome::sexual(&mother.genome, &father.genome, config, rng);
                let parentage = Parentage::Sexual {
                    mother: mother.pos,
                    father: father.pos,
                };
                (hue, genome, mother.lineage, parentage)
            }
        };

        self.state = CellState::Alive;
        self.hostile = false;
        self.time_alive = 0.0;
        self.color = CellColor::from_hue(hue);
        self.genome = genome;
        self.health = genome.max_health();
        self.lineage = lineage;
        self.parentage = parentage;
    }

    /// Place a living cell with exactly the given traits, bypassing
    /// inheritance. The newborn starts at full health.
    pub fn implant(&mut self, genome: Genome, hue: f64, lineage: Option<LineageId>) {
        self.state = CellState::Alive;
        self.hostile = false;
        self.time_alive = 0.0;
        self.color = CellColor::from_hue(hue);
        self.genome = genome;
        self.health = genome.max_health();
        self.lineage = lineage;
        self.parentage = Parentage::None;
    }

    /// Age the cell by `dt` seconds. Returns `true` when health has run out.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.time_alive += dt;
        self.health -= dt;
        self.health <= 0.0
    }

    /// Subtract `amount` health. Returns `true` when the blow is lethal.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        self.health -= amount;
        self.health <= 0.0
    }

    /// Turn a living cell into a corpse. No-op on any other state.
    pub fn die(&mut self, config: &LifeConfig) {
        if !self.is_alive() {
            return;
        }
        self.state = CellState::Corpse;
        self.hostile = false;
        self.selected = false;
        self.parentage = Parentage::None;
        self.time_alive = 0.0;
        self.color.desaturate(config.corpse_tint);
    }

    /// Return the slot to Empty: white, baseline genome, no lineage.
    pub fn reset(&mut self, config: &LifeConfig) {
        self.state = CellState::Empty;
        self.health = 0.0;
        self.time_alive = 0.0;
        self.hostile = false;
        self.selected = false;
        self.lineage = None;
        self.genome = Genome::baseline(config);
        self.color = CellColor::white();
        self.parentage = Parentage::None;
    }

    /// Eat `corpse`, gaining a fraction of its maximum health and shifting
    /// this cell's hue one step toward it. The corpse slot becomes Empty.
    ///
    /// Returns the health gained, or `None` if `corpse` holds no corpse.
    pub fn consume(&mut self, corpse: &mut Self, config: &LifeConfig) -> Option<f64> {
        if !corpse.has_corpse() {
            return None;
        }
        let gain = config.corpse_energy_fraction * corpse.genome.max_health();
        self.health += gain;
        self.color.shift_towards(&corpse.color, config.hue_shift_step);
        corpse.reset(config);
        Some(gain)
    }

    /// Join an existing colony: adopt its hue and lineage. Only living cells
    /// are affected.
    pub fn join_colony(&mut self, hue: f64, lineage: Option<LineageId>) {
        if self.is_alive() {
            self.color.set_hue(hue);
            self.lineage = lineage;
        }
    }

    /// Record whether the cell should attack next update.
    pub const fn set_hostile(&mut self, hostile: bool) {
        self.hostile = hostile;
    }

    /// Highlight the cell for the next draw.
    pub const fn select(&mut self) {
        self.selected = true;
    }

    /// Remove the highlight.
    pub const fn clear_selected(&mut self) {
        self.selected = false;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-|------ {}", self.pos)?;
        if !self.is_alive() {
            return write!(f, " | Dead has corpse: {}", self.has_corpse());
        }
        writeln!(
            f,
            " |MaxHP: {:.3} | MHD: {:.3} | BC: {:.3}",
            self.genome.max_health(),
            self.genome.max_hue_distance(),
            self.genome.breed_chance()
        )?;
        writeln!(
            f,
            " |CurHP: {:.3} | Hue: {:.3} | Hostile: {}",
            self.health,
            self.color.hue(),
            self.hostile
        )?;
        writeln!(
            f,
            " |Damage: {:.3} | Alive: {:.3}s | ",
            self.genome.damage(),
            self.time_alive
        )?;
        let pid = self.lineage.as_ref().map_or_else(|| "none".to_owned(), LineageId::short);
        writeln!(f, " |PID: {pid}")
    }
}
