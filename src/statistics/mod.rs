//! Statistics module - error analysis of Monte Carlo series.

mod autocorrelation;

pub use autocorrelation::{AutoCorrelation, Observable, DEFAULT_WINDOW};
