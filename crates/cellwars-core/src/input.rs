//! Pointer input mapped onto grid operations.
//!
//! Pixel coordinates are divided by the grid's cell size. A primary click
//! selects (single, familial with Control, lineage with Shift); a secondary
//! click founds a colony.

use cellwars_types::{Modifier, SelectionMode};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::CellGrid;

/// A pointer event in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Left click: select.
    Primary {
        /// Horizontal pixel.
        px: u32,
        /// Vertical pixel.
        py: u32,
        /// Held keyboard modifier.
        modifier: Modifier,
    },
    /// Right click: spawn a colony.
    Secondary {
        /// Horizontal pixel.
        px: u32,
        /// Vertical pixel.
        py: u32,
    },
}

/// What an [`InputEvent`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// A selection was made (or cleared, if the slot held no living cell).
    Selected {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
        /// Requested mode.
        mode: SelectionMode,
        /// Description of the clicked cell, for single selections.
        description: Option<String>,
    },
    /// A colony was founded.
    Spawned {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
}

impl CellGrid {
    /// Slot coordinates under viewport pixel `(px, py)`.
    pub fn cell_coords(&self, px: u32, py: u32) -> (usize, usize) {
        let to_cell = |p: u32| {
            let cell = p.checked_div(self.cell_size).unwrap_or(p);
            usize::try_from(cell).unwrap_or(usize::MAX)
        };
        (to_cell(px), to_cell(py))
    }

    /// Apply a pointer event.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the pixel lies outside the grid.
    pub fn apply_input(
        &mut self,
        event: InputEvent,
        rng: &mut impl Rng,
    ) -> Result<InputOutcome, GridError> {
        match event {
            InputEvent::Primary { px, py, modifier } => {
                let (x, y) = self.cell_coords(px, py);
                let mode = modifier.selection_mode();
                self.select(x, y, mode)?;
                let description = if mode == SelectionMode::Single {
                    Some(self.describe(x, y)?)
                } else {
                    None
                };
                Ok(InputOutcome::Selected {
                    x,
                    y,
                    mode,
                    description,
                })
            }
            InputEvent::Secondary { px, py } => {
                let (x, y) = self.cell_coords(px, py);
                self.spawn(x, y, true, rng)?;
                Ok(InputOutcome::Spawned { x, y })
            }
        }
    }
}
