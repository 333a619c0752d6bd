//! Synthetic sensor readouts

use crate::exposure::{GRID_COLS, GRID_ROWS, MeteringMode, SensorGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Range of the base illumination level of a simulated scene (lux)
pub const BASE_LUX_RANGE: (f64, f64) = (50.0, 2000.0);
/// Per-cell multiplicative variation around the falloff curve
pub const CELL_VARIATION: f64 = 0.3;
/// Distance (in cells) over which brightness falls off from the hotspot
pub const FALLOFF_DISTANCE: f64 = 8.0;
/// Falloff never dims a cell below this share of the base level
pub const MIN_FALLOFF: f64 = 0.5;
/// Hotspot brightness multiplier in highlight mode
pub const HIGHLIGHT_GAIN: f64 = 3.0;
/// Range of the decorative idle readings (lux)
pub const IDLE_LUX_RANGE: (f64, f64) = (10.0, 500.0);

/// One simulated scene, with the parameters it was drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedScene {
    /// Generated readings
    pub grid: SensorGrid,
    /// `(row, col)` of the brightest region
    pub hotspot: (usize, usize),
    /// Base illumination level
    pub base_lux: f64,
}

/// Stand-in for the sensor hardware
///
/// Stateless across calls apart from the random stream, which is injected so
/// tests can replay a fixed sequence of draws.
pub struct SimulationModel<R = ChaCha8Rng> {
    rng: R,
}

impl SimulationModel<ChaCha8Rng> {
    /// Deterministic model: the same seed replays the same scenes
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Model seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> SimulationModel<R> {
    /// Create a model drawing from `rng`
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a hotspot-biased grid for a measurement
    pub fn generate(&mut self, mode: MeteringMode) -> SensorGrid {
        self.generate_scene(mode).grid
    }

    /// Generate a grid and report the scene parameters behind it
    ///
    /// Every cell is `base × max(0.5, 1 − d/8) × U(0.7, 1.3)` where `d` is the
    /// Euclidean distance to the hotspot in index space. In highlight mode the
    /// hotspot itself is exactly `3 × base` and draws no variation.
    pub fn generate_scene(&mut self, mode: MeteringMode) -> SimulatedScene {
        let base_lux = self.rng.gen_range(BASE_LUX_RANGE.0..=BASE_LUX_RANGE.1);
        let hotspot = (
            self.rng.gen_range(0..GRID_ROWS),
            self.rng.gen_range(0..GRID_COLS),
        );

        let mut cells = [[0.0; GRID_COLS]; GRID_ROWS];
        for (row, values) in cells.iter_mut().enumerate() {
            for (col, cell) in values.iter_mut().enumerate() {
                if mode == MeteringMode::Highlight && (row, col) == hotspot {
                    *cell = base_lux * HIGHLIGHT_GAIN;
                    continue;
                }

                let d_row = row as f64 - hotspot.0 as f64;
                let d_col = col as f64 - hotspot.1 as f64;
                let distance = d_row.hypot(d_col);
                let falloff = (1.0 - distance / FALLOFF_DISTANCE).max(MIN_FALLOFF);
                let variation = self
                    .rng
                    .gen_range(1.0 - CELL_VARIATION..=1.0 + CELL_VARIATION);
                *cell = base_lux * falloff * variation;
            }
        }

        SimulatedScene {
            grid: SensorGrid::from_cells_unchecked(cells),
            hotspot,
            base_lux,
        }
    }

    /// Independent uniform readings for the idle matrix display
    ///
    /// Not meant for metering.
    pub fn randomize_idle(&mut self) -> SensorGrid {
        let mut cells = [[0.0; GRID_COLS]; GRID_ROWS];
        for cell in cells.iter_mut().flatten() {
            *cell = self.rng.gen_range(IDLE_LUX_RANGE.0..=IDLE_LUX_RANGE.1);
        }
        SensorGrid::from_cells_unchecked(cells)
    }
}
