//! Hybrid Monte Carlo (HMC) driver for the oscillator lattice.
//!
//! A run goes through three phases in order: a short warm-up without
//! accept/reject, thermalization with an acceptance-rate check, and the
//! measurement phase that feeds an [`ObservableSink`]. Every random draw
//! comes from the single generator owned by the driver.

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use rand_pcg::Pcg64;
use tracing::{info, warn};

use super::traits::{Measurement, ObservableSink};
use crate::error::{HmcError, Result};
use crate::io::Configuration;
use crate::systems::{Lattice, LatticeParams};

/// Warm-up trajectories run by [`HarmonicSimulation::init`].
pub const WARMUP_TRAJECTORIES: usize = 10;

/// Thermalization must accept at least this fraction of trajectories.
pub const MIN_ACCEPTANCE: f64 = 0.25;

/// Metropolis rule for a reversible, volume-preserving proposal.
///
/// The uniform number is only drawn when ΔH > 0.
pub fn metropolis<R: Rng + ?Sized>(delta_h: f64, rng: &mut R) -> bool {
    delta_h <= 0.0 || Uniform::new(0.0, 1.0).sample(rng) <= (-delta_h).exp()
}

/// Where a simulation is in its schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Init,
    Thermalize,
    Measure,
    Done,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Thermalize => "thermalize",
            Phase::Measure => "measure",
            Phase::Done => "done",
        }
    }
}

/// Sums collected over the measurement phase.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunningStats {
    pub accepted: usize,
    pub x_sum: f64,
    pub x_square_sum: f64,
    pub exp_delta_h_sum: f64,
}

/// HMC simulation of one oscillator lattice.
pub struct HarmonicSimulation<R: Rng = Pcg64> {
    cfg: Configuration,
    rng: R,
    lattice: Lattice,
    stats: RunningStats,
    phase: Phase,
    last_delta_h: f64,
}

impl HarmonicSimulation<Pcg64> {
    /// Build a simulation seeded from `cfg.seed`.
    pub fn new(cfg: Configuration) -> Result<Self> {
        Self::with_rng(cfg, Pcg64::seed_from_u64(cfg.seed as u64))
    }
}

impl<R: Rng> HarmonicSimulation<R> {
    /// Build a simulation around an injected generator.
    pub fn with_rng(cfg: Configuration, mut rng: R) -> Result<Self> {
        cfg.validate()?;
        let lattice = Lattice::new(LatticeParams::from(&cfg), &mut rng)?;
        Ok(Self {
            cfg,
            rng,
            lattice,
            stats: RunningStats::default(),
            phase: Phase::Init,
            last_delta_h: 0.0,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.cfg
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    fn enter(&mut self, expected: Phase, next: Phase) -> Result<()> {
        if self.phase != expected {
            return Err(HmcError::PhaseOrder {
                expected: expected.name(),
                found: self.phase.name(),
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Run all three phases, reporting every measurement to `sink`.
    pub fn run<S: ObservableSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.init()?;
        self.thermalize()?;
        self.measure(sink)
    }

    /// Move away from the initial configuration with unconditional trajectories.
    pub fn init(&mut self) -> Result<()> {
        self.enter(Phase::Init, Phase::Thermalize)?;
        for _ in 0..WARMUP_TRAJECTORIES {
            self.lattice.randomize(&mut self.rng);
            self.lattice.integrate();
        }
        Ok(())
    }

    /// Run `ntherm` HMC trials and fail if fewer than a quarter were accepted.
    pub fn thermalize(&mut self) -> Result<()> {
        self.enter(Phase::Thermalize, Phase::Measure)?;
        info!("thermalization started");

        let mut accepted = 0;
        for n in 0..self.cfg.ntherm {
            let acc = self.step();
            info!(
                step = n,
                accepted = acc,
                x = self.lattice.x_average(),
                x2 = self.lattice.x_square_average(),
                "init-update"
            );
            accepted += acc as usize;
        }

        info!(accepted, trials = self.cfg.ntherm, "thermalization finished");

        if (accepted as f64) < MIN_ACCEPTANCE * self.cfg.ntherm as f64 {
            warn!(
                accepted,
                trials = self.cfg.ntherm,
                "bad acceptance rate in thermalization"
            );
            self.phase = Phase::Done;
            return Err(HmcError::BadAcceptance {
                accepted,
                trials: self.cfg.ntherm,
            });
        }
        Ok(())
    }

    /// Run `nmeas` HMC trials, reporting the observables after each one.
    pub fn measure<S: ObservableSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.enter(Phase::Measure, Phase::Done)?;
        info!("measurements started");

        for n in 0..self.cfg.nmeas {
            let acc = self.step();
            let measurement = Measurement {
                step: n,
                x_average: self.lattice.x_average(),
                x_square_average: self.lattice.x_square_average(),
                action_average: self.lattice.action_average(),
            };
            info!(
                step = n,
                accepted = acc,
                x = measurement.x_average,
                x2 = measurement.x_square_average,
                "meas-update"
            );
            sink.record(&measurement)?;

            self.stats.accepted += acc as usize;
            self.stats.x_sum += measurement.x_average;
            self.stats.x_square_sum += measurement.x_square_average;
            self.stats.exp_delta_h_sum += (-self.last_delta_h).exp();
        }

        info!("measurements finished");
        Ok(())
    }

    /// One HMC trial: refresh momenta, integrate, accept or roll back.
    pub fn step(&mut self) -> bool {
        self.lattice.randomize(&mut self.rng);
        self.lattice.store();
        let before = self.lattice.hamilton();
        self.lattice.integrate();
        let after = self.lattice.hamilton();

        self.last_delta_h = after - before;
        let accept = self.metropolis(self.last_delta_h);
        if !accept {
            self.lattice.restore();
        }
        accept
    }

    pub fn metropolis(&mut self, delta_h: f64) -> bool {
        metropolis(delta_h, &mut self.rng)
    }

    fn per_measurement(&self, sum: f64) -> f64 {
        sum / self.cfg.nmeas as f64
    }

    pub fn compute_acceptance(&self) -> f64 {
        self.per_measurement(self.stats.accepted as f64)
    }

    pub fn compute_x(&self) -> f64 {
        self.per_measurement(self.stats.x_sum)
    }

    pub fn compute_x_square(&self) -> f64 {
        self.per_measurement(self.stats.x_square_sum)
    }

    /// <exp(-ΔH)>, equal to one up to statistics for an exact integrator.
    pub fn compute_exp_delta_h(&self) -> f64 {
        self.per_measurement(self.stats.exp_delta_h_sum)
    }
}
