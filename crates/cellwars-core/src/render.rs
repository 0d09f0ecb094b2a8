//! Draw hand-off to an external renderer.
//!
//! The grid owns the highlight flags. A render pass hands every slot to the
//! consumer in row-major order and clears the slot's flag right after the
//! draw call, so a highlight lasts exactly one frame unless the selection
//! logic marks it again.

use cellwars_types::Rgb;
use serde::Serialize;

use crate::grid::CellGrid;

/// Everything a renderer needs to draw one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderCell {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Display color.
    pub rgb: Rgb,
    /// Whether to draw the highlight sprite.
    pub selected: bool,
}

impl CellGrid {
    /// Hand every slot to `draw`, then clear its highlight flag.
    pub fn render_pass(&mut self, mut draw: impl FnMut(RenderCell)) {
        for cell in &mut self.cells {
            let pos = cell.pos();
            draw(RenderCell {
                x: pos.x,
                y: pos.y,
                rgb: cell.color().to_rgb(),
                selected: cell.is_selected(),
            });
            cell.clear_selected();
        }
    }
}
