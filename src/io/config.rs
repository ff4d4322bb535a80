//! Run configuration, read from YAML and echoed at startup.
//!
//! Example file:
//!
//! ```yaml
//! nt: 100
//! omega_square: 1.0
//! lambda: 0.0
//! nmeas: 1000
//! ntherm: 100
//! tau: 1.0
//! nstep: 10
//! seed: 0
//! ```
//!
//! Missing keys fall back to [`Configuration::default`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HmcError, Result};
use crate::systems::{x_square_harmonic, LatticeParams};

/// Physical and algorithmic parameters of one HMC run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Number of time slices
    pub nt: usize,
    /// Squared oscillator frequency ω²
    pub omega_square: f64,
    /// Quartic anharmonic coupling
    pub lambda: f64,
    /// Number of measured trajectories
    pub nmeas: usize,
    /// Number of thermalization trajectories
    pub ntherm: usize,
    /// Trajectory length
    pub tau: f64,
    /// Leapfrog steps per trajectory
    pub nstep: usize,
    /// Seed of the random generator, reinterpreted bitwise as u64
    pub seed: i64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            nt: 100,
            omega_square: 1.0,
            lambda: 0.0,
            nmeas: 1000,
            ntherm: 100,
            tau: 1.0,
            nstep: 10,
            seed: 0,
        }
    }
}

impl Configuration {
    /// Reject configurations that would produce meaningless numbers.
    pub fn validate(&self) -> Result<()> {
        LatticeParams::from(self).validate()?;
        if self.nmeas == 0 {
            return Err(HmcError::InvalidParameter("nmeas must be positive".into()));
        }
        if self.ntherm == 0 {
            return Err(HmcError::InvalidParameter("ntherm must be positive".into()));
        }
        Ok(())
    }

    /// Leapfrog step size ε = τ / nstep.
    pub fn step_size(&self) -> f64 {
        self.tau / self.nstep as f64
    }

    /// Exact <x²> for comparison, only known for the harmonic case.
    pub fn analytic_x_square(&self) -> Option<f64> {
        if self.lambda == 0.0 {
            Some(x_square_harmonic(self.nt, self.omega_square))
        } else {
            None
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nt     = {}", self.nt)?;
        writeln!(f, "ω²     = {}", self.omega_square)?;
        writeln!(f, "λ      = {}", self.lambda)?;
        writeln!(f, "Nmeas  = {}", self.nmeas)?;
        writeln!(f, "Ntherm = {}", self.ntherm)?;
        writeln!(f, "τ      = {}", self.tau)?;
        writeln!(f, "Nstep  = {}", self.nstep)?;
        write!(f, "Seed   = {}", self.seed)
    }
}

/// Parse a configuration from YAML text.
pub fn parse_configuration(text: &str) -> Result<Configuration> {
    let cfg: Configuration = serde_yaml::from_str(text)?;
    Ok(cfg)
}

/// Read a configuration from a YAML file.
pub fn read_configuration<P: AsRef<Path>>(filename: P) -> Result<Configuration> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    let cfg: Configuration = serde_yaml::from_reader(reader)?;
    Ok(cfg)
}
