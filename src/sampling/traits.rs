//! Traits for reporting HMC measurements.

use crate::error::Result;

/// Observables of one measured trajectory.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    pub step: usize,
    pub x_average: f64,
    pub x_square_average: f64,
    pub action_average: f64,
}

/// Receiver of per-trajectory measurements, called in step order.
pub trait ObservableSink {
    fn record(&mut self, measurement: &Measurement) -> Result<()>;
}

impl<F> ObservableSink for F
where
    F: FnMut(&Measurement) -> Result<()>,
{
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        self(measurement)
    }
}
