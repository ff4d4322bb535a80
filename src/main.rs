use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use harmonic_hmc::{
    read_configuration, AutoCorrelation, Configuration, HarmonicSimulation, HmcError, Measurement,
    ObservableSink, Result, TsvWriter, DEFAULT_WINDOW,
};

#[derive(Parser, Debug)]
#[command(version, about = "Hybrid Monte Carlo for the quantum (an-)harmonic oscillator", long_about = None)]
struct Args {
    /// YAML configuration file, overridden by the options below
    #[arg(short, long)]
    config: Option<String>,

    /// Path where the measurements will be stored
    #[arg(short, long, default_value = "data.out")]
    output: String,

    /// The number of points in temporal direction
    #[arg(short = 'n', long)]
    nt: Option<usize>,

    /// The value of omega², which is proportional to a
    #[arg(short = 'w', long)]
    omegasq: Option<f64>,

    /// The anharmonic coupling lambda
    #[arg(short = 'l', long)]
    lambda: Option<f64>,

    /// The length of a trajectory, the step size is ε = τ / N_delta
    #[arg(short = 't', long)]
    tau: Option<f64>,

    /// The number of steps in the integrator, called N_delta
    #[arg(short = 'd', long)]
    ndelta: Option<usize>,

    /// The number of steps, i.e. the number of measurements
    #[arg(short = 'm', long)]
    nmeas: Option<usize>,

    /// The number of steps in the thermalization process
    #[arg(short = 'i', long)]
    ninit: Option<usize>,

    /// The seed for the random number generator
    #[arg(short = 's', long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Lags added to the error sum of the autocorrelation analysis
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn configuration(&self) -> Result<Configuration> {
        let mut cfg = match &self.config {
            Some(path) => read_configuration(path)?,
            None => Configuration::default(),
        };
        if let Some(nt) = self.nt {
            cfg.nt = nt;
        }
        if let Some(omega_square) = self.omegasq {
            cfg.omega_square = omega_square;
        }
        if let Some(lambda) = self.lambda {
            cfg.lambda = lambda;
        }
        if let Some(tau) = self.tau {
            cfg.tau = tau;
        }
        if let Some(nstep) = self.ndelta {
            cfg.nstep = nstep;
        }
        if let Some(nmeas) = self.nmeas {
            cfg.nmeas = nmeas;
        }
        if let Some(ntherm) = self.ninit {
            cfg.ntherm = ntherm;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = args.configuration()?;
    info!("configuration:\n{}", cfg);

    let mut sim = HarmonicSimulation::new(cfg)?;
    let mut data = TsvWriter::create(&args.output)?;
    let mut x_square = Vec::with_capacity(cfg.nmeas);

    sim.run(&mut |m: &Measurement| -> Result<()> {
        x_square.push(m.x_square_average);
        data.record(m)
    })?;
    data.finish()?;

    println!("HMC Results for the Oscillator");
    println!("------------------------------");
    println!("{}", sim.configuration());
    println!("Step size ε:      {:.6}", sim.lattice().step_size());
    println!("Acceptance rate:  {:.4}", sim.compute_acceptance());
    println!("<x>:              {:.6}", sim.compute_x());
    println!("<x²>:             {:.6}", sim.compute_x_square());
    if let Some(analytic) = cfg.analytic_x_square() {
        println!("<x²> (analytic):  {:.6}", analytic);
    }
    println!("<exp(-ΔH)>:       {:.6}", sim.compute_exp_delta_h());

    match AutoCorrelation::new(&x_square, args.window) {
        Ok(ac) => println!("τ_int(<x²>):      {:.4}", ac.compute()),
        Err(e) => warn!("skipping autocorrelation analysis: {}", e),
    }
    println!("Measurements written to {}", args.output);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        // already reported by the simulation
        Err(HmcError::BadAcceptance { .. }) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let args = Args::try_parse_from(["harmonic_hmc", "-n", "50", "-w", "0.5", "-s", "-1"]).unwrap();
        let cfg = args.configuration().unwrap();
        assert_eq!(cfg.nt, 50);
        assert_eq!(cfg.omega_square, 0.5);
        assert_eq!(cfg.seed, -1);
        assert_eq!(cfg.nstep, Configuration::default().nstep);
    }

    #[test]
    fn test_cli_rejects_invalid_values() {
        let args = Args::try_parse_from(["harmonic_hmc", "--tau", "-1"]);
        let rejected = match args {
            Ok(args) => matches!(args.configuration(), Err(HmcError::InvalidParameter(_))),
            Err(_) => true,
        };
        assert!(rejected);
    }
}
