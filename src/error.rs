//! Error types for harmonic_hmc.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HmcError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not enough samples for autocorrelation: got {samples}, need at least {window} + 2")]
    InsufficientSamples { samples: usize, window: usize },

    #[error("Bad acceptance rate in thermalization: {accepted} of {trials} trajectories accepted")]
    BadAcceptance { accepted: usize, trials: usize },

    #[error("Simulation phase out of order: expected {expected}, found {found}")]
    PhaseOrder {
        expected: &'static str,
        found: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, HmcError>;
