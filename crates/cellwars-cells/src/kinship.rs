//! Kinship classification between a cell and one of its neighbors.
//!
//! Kinship is asymmetric: it is always judged from the point of view of the
//! first argument, whose own `max_hue_distance` sets the radius. Only living
//! neighbors are ever family or enemies.

use cellwars_types::hue_distance;

use crate::cell::Cell;

/// `other` is alive and its hue lies within `cell`'s kinship radius.
///
/// Close family are potential mates and are never attacked.
pub fn is_close_family(cell: &Cell, other: &Cell) -> bool {
    other.is_alive() && hue_distance(cell.color(), other.color()) <= cell.genome().max_hue_distance()
}

/// `other` is alive, shares `cell`'s lineage, and its hue lies within twice
/// `cell`'s kinship radius.
///
/// Extended family suppresses hostility but does not qualify as a mate.
pub fn is_extended_family(cell: &Cell, other: &Cell) -> bool {
    other.is_alive()
        && cell.lineage().is_some()
        && cell.lineage() == other.lineage()
        && hue_distance(cell.color(), other.color()) <= 2.0 * cell.genome().max_hue_distance()
}

/// `other` is a living neighbor `cell` may attack.
pub fn is_enemy(cell: &Cell, other: &Cell) -> bool {
    other.is_alive() && !is_close_family(cell, other)
}

/// `other` is a living neighbor that is neither close nor extended family;
/// a single such neighbor makes `cell` hostile.
pub fn provokes_hostility(cell: &Cell, other: &Cell) -> bool {
    is_enemy(cell, other) && !is_extended_family(cell, other)
}
