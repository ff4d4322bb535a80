//! Systems module - the discretized oscillator and its exact results.

mod lattice;
pub mod analytic;

pub use lattice::{wrap, Lattice, LatticeParams};
pub use analytic::x_square_harmonic;
