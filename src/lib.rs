//! harmonic_hmc - Hybrid Monte Carlo for the quantum (an-)harmonic oscillator
//!
//! The Euclidean path integral of a particle in the potential
//! V(x) = ½ω²x² + λx⁴ is discretized on a periodic time lattice and sampled
//! with Hybrid Monte Carlo. The statistical error of the measured observables
//! is estimated from their integrated autocorrelation time.

pub mod error;
pub mod systems;
pub mod sampling;
pub mod statistics;
pub mod io;

#[cfg(test)]
mod tests;

// Re-export commonly used types at crate root
pub use error::{HmcError, Result};
pub use systems::{wrap, x_square_harmonic, Lattice, LatticeParams};
pub use sampling::{metropolis, HarmonicSimulation, Measurement, ObservableSink, Phase, RunningStats};
pub use statistics::{AutoCorrelation, Observable, DEFAULT_WINDOW};
pub use io::{parse_configuration, read_configuration, Configuration, TsvWriter};
