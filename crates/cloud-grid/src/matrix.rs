//! Fixed-size cloud cover matrix.

use cloud_common::MAX_GRID_CELLS;
use tracing::warn;

/// A `rows x cols` grid of optional cloud cover readings.
///
/// Row 0 is the southernmost latitude band, column 0 the westernmost
/// longitude band. Cells are stored row-major; an absent cell means the
/// provider returned no observation for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl CloudMatrix {
    /// Create a matrix with every cell absent.
    ///
    /// Dimensions above [`MAX_GRID_CELLS`] yield an empty `0 x 0` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_GRID_CELLS => Self {
                rows,
                cols,
                cells: vec![None; cells],
            },
            _ => {
                warn!(rows, cols, limit = MAX_GRID_CELLS, "Grid too large, using empty matrix");
                Self {
                    rows: 0,
                    cols: 0,
                    cells: Vec::new(),
                }
            }
        }
    }

    /// Build from nested rows. Ragged rows are padded with absent cells.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut matrix = Self::new(rows.len(), cols);
        for (row, values) in rows.into_iter().enumerate() {
            for (col, value) in values.into_iter().enumerate() {
                matrix.set(row, col, value);
            }
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the matrix has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Reading at `(row, col)`, or `None` if absent or out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Write a cell. Returns false (and writes nothing) when out of range.
    pub fn set(&mut self, row: usize, col: usize, value: Option<f64>) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = value;
        true
    }

    /// Present cells as `(row, col, reading)` in row-major order.
    pub fn iter_present(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|v| (i / cols, i % cols, v)))
    }

    /// Number of present cells.
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when no cell carries data ("no data" for downstream stages).
    pub fn is_all_absent(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Nested row representation, the shape of the static band files.
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[_]>::to_vec).collect()
    }
}
