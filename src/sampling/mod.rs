//! Sampling module - Hybrid Monte Carlo for the oscillator lattice.

mod traits;
mod hmc;

pub use traits::{Measurement, ObservableSink};
pub use hmc::{metropolis, HarmonicSimulation, Phase, RunningStats, MIN_ACCEPTANCE, WARMUP_TRAJECTORIES};
