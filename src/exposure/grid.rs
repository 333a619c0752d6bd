//! Sensor grid of lux readings

use crate::error::{LightmeterError, Result};

/// Number of sensor rows
pub const GRID_ROWS: usize = 5;
/// Number of sensor columns
pub const GRID_COLS: usize = 4;
/// Row holding the center/spot cells
pub const CENTER_ROW: usize = 2;
/// Columns of the center/spot cells within [`CENTER_ROW`]
pub const CENTER_COLS: [usize; 2] = [1, 2];

/// Fixed 5×4 grid of non-negative lux readings
///
/// Rows and columns are 0-based. Every constructor validates the readings, so a
/// `SensorGrid` value always satisfies the shape and sign invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorGrid {
    cells: [[f64; GRID_COLS]; GRID_ROWS],
}

impl SensorGrid {
    /// Create a grid from fixed-size rows
    pub fn new(cells: [[f64; GRID_COLS]; GRID_ROWS]) -> Result<Self> {
        for (row, values) in cells.iter().enumerate() {
            for (col, &lux) in values.iter().enumerate() {
                if !lux.is_finite() || lux < 0.0 {
                    return Err(LightmeterError::InvalidSensorGrid(format!(
                        "reading {lux} at row {row}, column {col} is not a non-negative lux value"
                    )));
                }
            }
        }
        Ok(Self { cells })
    }

    /// Create a grid from dynamically sized rows, rejecting anything but 5×4
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.len() != GRID_ROWS {
            return Err(LightmeterError::InvalidSensorGrid(format!(
                "expected {GRID_ROWS} rows, got {}",
                rows.len()
            )));
        }

        let mut cells = [[0.0; GRID_COLS]; GRID_ROWS];
        for (row, values) in rows.iter().enumerate() {
            if values.len() != GRID_COLS {
                return Err(LightmeterError::InvalidSensorGrid(format!(
                    "expected {GRID_COLS} columns in row {row}, got {}",
                    values.len()
                )));
            }
            cells[row].copy_from_slice(values);
        }
        Self::new(cells)
    }

    /// Grid with every cell set to the same reading
    pub fn uniform(lux: f64) -> Result<Self> {
        Self::new([[lux; GRID_COLS]; GRID_ROWS])
    }

    /// Readings generated internally are known to be valid
    pub(crate) fn from_cells_unchecked(cells: [[f64; GRID_COLS]; GRID_ROWS]) -> Self {
        debug_assert!(cells.iter().flatten().all(|v| v.is_finite() && *v >= 0.0));
        Self { cells }
    }

    /// Reading at `(row, col)`, or `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// All rows
    pub fn rows(&self) -> &[[f64; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }

    /// Iterate all 20 readings in row-major order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// The two center/spot readings
    pub fn center_values(&self) -> [f64; 2] {
        CENTER_COLS.map(|col| self.cells[CENTER_ROW][col])
    }

    /// Sum of all readings
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Brightest reading
    pub fn max(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }
}
