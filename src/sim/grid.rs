//! Toroidal grid geometry
//!
//! Every position handed to the simulation passes through [`Grid::wrap`], so
//! moving off one edge re-enters on the opposite one.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Integer cell coordinate
pub type Position = IVec2;

/// Board dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

impl Grid {
    /// Create a grid; dimensions below 1 are raised to 1
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Grid that fits a drawing surface of the given size, leaving room for page chrome
    pub fn fit_viewport(width_px: u32, height_px: u32, cell_px: u32) -> Self {
        let cell = cell_px.max(1);
        let available_w = (cell * MIN_COLS as u32).max(width_px.saturating_sub(CHROME_WIDTH));
        let available_h = (cell * MIN_ROWS as u32).max(height_px.saturating_sub(CHROME_HEIGHT));
        Self::new(
            ((available_w / cell) as i32).max(MIN_COLS),
            ((available_h / cell) as i32).max(MIN_ROWS),
        )
    }

    /// Map any coordinate onto the board (Euclidean remainder, never clamps)
    #[inline]
    pub fn wrap(&self, pos: Position) -> Position {
        pos.rem_euclid(IVec2::new(self.cols, self.rows))
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Drawing surface size in pixels
    pub fn pixel_size(&self, cell_px: u32) -> (u32, u32) {
        (self.cols as u32 * cell_px, self.rows as u32 * cell_px)
    }
}
