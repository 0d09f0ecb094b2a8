//! Enumeration types shared across the simulation.

use serde::{Deserialize, Serialize};

/// Life-cycle state of one grid slot.
///
/// Every slot starts [`Empty`](Self::Empty) and cycles
/// Empty → Alive → Corpse → Empty for the lifetime of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Blank slot, available for spawning or birth.
    Empty,
    /// A living cell.
    Alive,
    /// A dead cell whose body can still be eaten.
    Corpse,
}

impl core::fmt::Display for CellState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Alive => write!(f, "alive"),
            Self::Corpse => write!(f, "corpse"),
        }
    }
}

/// How the grid highlights cells around the selected (anchor) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Nothing selected.
    #[default]
    None,
    /// Only the anchor cell.
    Single,
    /// Every cell the anchor considers close family.
    Familial,
    /// Every cell sharing the anchor's lineage id.
    Lineage,
}

/// Keyboard modifier held during a primary click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// No modifier: single selection.
    #[default]
    None,
    /// Shift: lineage selection.
    Shift,
    /// Control: familial selection.
    Control,
}

impl Modifier {
    /// The selection mode a primary click with this modifier requests.
    pub const fn selection_mode(self) -> SelectionMode {
        match self {
            Self::None => SelectionMode::Single,
            Self::Shift => SelectionMode::Lineage,
            Self::Control => SelectionMode::Familial,
        }
    }
}
