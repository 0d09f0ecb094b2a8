//! Cell selection and highlight marking.
//!
//! A selection is an anchor slot plus a [`SelectionMode`]. Familial and
//! lineage highlights are re-marked at the start of every tick, paused or
//! not, so they follow the population as it changes. A single selection
//! highlights its anchor once, at click time.
//!
//! Selecting a slot that holds no living cell clears the selection. When the
//! anchor dies the selection and every highlight flag are cleared.

use cellwars_cells::is_close_family;
use cellwars_types::SelectionMode;
use tracing::debug;

use crate::error::GridError;
use crate::grid::CellGrid;

/// The anchor slot and how highlights spread from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    anchor: Option<usize>,
    mode: SelectionMode,
}

impl Selection {
    /// Arena index of the selected cell.
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Current highlight mode.
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Whether nothing is selected.
    pub const fn is_none(&self) -> bool {
        self.anchor.is_none()
    }
}

impl CellGrid {
    /// The current selection.
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Select the cell at `(x, y)` and highlight it alone.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn select_single(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        self.select(x, y, SelectionMode::Single)
    }

    /// Select the cell at `(x, y)` and highlight every cell it considers
    /// close family, itself included.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn select_familial(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        self.select(x, y, SelectionMode::Familial)
    }

    /// Select the cell at `(x, y)` and highlight every cell sharing its
    /// lineage.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn select_lineage(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        self.select(x, y, SelectionMode::Lineage)
    }

    /// Select `(x, y)` with the given mode. [`SelectionMode::None`] clears.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn select(&mut self, x: usize, y: usize, mode: SelectionMode) -> Result<(), GridError> {
        let index = self.checked_index(x, y)?;
        let alive = self.cells.get(index).is_some_and(cellwars_cells::Cell::is_alive);
        if !alive || mode == SelectionMode::None {
            self.clear_selection();
            return Ok(());
        }

        self.selection = Selection {
            anchor: Some(index),
            mode,
        };
        self.mark_selection();
        debug!(x, y, ?mode, "Selection changed");
        Ok(())
    }

    /// Drop the selection and every highlight flag.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
        for cell in &mut self.cells {
            cell.clear_selected();
        }
    }

    /// Re-mark familial and lineage highlights around a live anchor. A dead
    /// anchor clears the selection.
    pub(crate) fn refresh_selection(&mut self) {
        let Some(anchor) = self.selection.anchor else {
            return;
        };
        if !self.cells.get(anchor).is_some_and(cellwars_cells::Cell::is_alive) {
            self.clear_selection();
            return;
        }
        if self.selection.mode != SelectionMode::Single {
            self.mark_selection();
        }
    }

    /// Whether `index` is the selection anchor.
    pub(crate) fn is_anchor(&self, index: usize) -> bool {
        self.selection.anchor == Some(index)
    }

    fn mark_selection(&mut self) {
        let Some(anchor_index) = self.selection.anchor else {
            return;
        };
        let Some(anchor) = self.cells.get(anchor_index).cloned() else {
            return;
        };
        match self.selection.mode {
            SelectionMode::None => {}
            SelectionMode::Single => {
                if let Some(cell) = self.cells.get_mut(anchor_index) {
                    cell.select();
                }
            }
            SelectionMode::Familial => {
                for cell in &mut self.cells {
                    if is_close_family(&anchor, cell) {
                        cell.select();
                    }
                }
            }
            SelectionMode::Lineage => {
                let Some(lineage) = anchor.lineage() else {
                    return;
                };
                for cell in &mut self.cells {
                    if cell.lineage() == Some(lineage) {
                        cell.select();
                    }
                }
            }
        }
    }
}
