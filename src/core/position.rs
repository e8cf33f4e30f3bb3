//! Grid positions and pointer hit testing

use serde::{Deserialize, Serialize};

/// A cell position in the visible terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column index (0-based)
    pub col: usize,
    /// Row index (0-based)
    pub row: usize,
}

impl Position {
    /// Create a new position
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Check if this position comes before another in reading order
    pub fn is_before(&self, other: &Position) -> bool {
        (self.row, self.col) < (other.row, other.col)
    }
}

/// Size of one rendered cell in host surface units (points or pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 9.0,
            height: 18.0,
        }
    }
}

impl CellMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Convert a raw pointer coordinate into a grid position.
///
/// Negative coordinates land on row/column 0 and anything past the grid
/// extent is clamped to the last column/row.
pub fn calculate_tap_hit(x: f32, y: f32, metrics: CellMetrics, cols: usize, rows: usize) -> Position {
    Position {
        col: cell_index(x, metrics.width, cols),
        row: cell_index(y, metrics.height, rows),
    }
}

fn cell_index(raw: f32, cell_size: f32, count: usize) -> usize {
    let last = count.saturating_sub(1);
    if raw.is_nan() || raw <= 0.0 || cell_size.is_nan() || cell_size <= 0.0 {
        return 0;
    }
    let index = (raw / cell_size).floor();
    if index >= last as f32 {
        last
    } else {
        index as usize
    }
}
