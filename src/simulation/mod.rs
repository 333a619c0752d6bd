//! Sensor simulation module
//!
//! Produces plausible 5×4 lux grids when no device is attached, so the menu and
//! the exposure calculator can be exercised without hardware.
//!
//! # Overview
//!
//! - `SimulationModel::generate`: a scene with a bright region (the hotspot)
//!   that falls off with distance, plus per-cell noise
//! - `SimulationModel::randomize_idle`: decorative readings for the idle display
//!
//! The random source is a type parameter. `SimulationModel::from_seed` gives a
//! reproducible `ChaCha8Rng` stream, `from_entropy` an unpredictable one.
//!
//! # Example Usage
//!
//! ```
//! use lightmeter::exposure::MeteringMode;
//! use lightmeter::simulation::SimulationModel;
//!
//! let mut a = SimulationModel::from_seed(1);
//! let mut b = SimulationModel::from_seed(1);
//! assert_eq!(a.generate(MeteringMode::Spot), b.generate(MeteringMode::Spot));
//! ```

pub mod model;

pub use model::{SimulatedScene, SimulationModel};
