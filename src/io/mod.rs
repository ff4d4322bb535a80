//! IO module - configuration and measurement output.

mod config;
mod output;

pub use config::{parse_configuration, read_configuration, Configuration};
pub use output::TsvWriter;
