//! Scan of the anharmonic coupling λ
//!
//! Run with: cargo run --release --example anharmonic
//!
//! The quartic term λx⁴ confines the particle more strongly than the harmonic
//! well, so <x²> shrinks as λ grows. λ = 0 is compared with the exact lattice
//! result.

use harmonic_hmc::{AutoCorrelation, Configuration, HarmonicSimulation, Measurement, Result};

fn main() -> Result<()> {
    let base = Configuration {
        nt: 64,
        nmeas: 4000,
        ntherm: 500,
        tau: 1.0,
        nstep: 10,
        seed: 2014,
        ..Configuration::default()
    };

    println!("{:>8} {:>10} {:>12} {:>12} {:>16}", "λ", "acc", "<x²>", "exact", "τ_int");
    for &lambda in &[0.0, 0.1, 0.25, 0.5, 1.0, 2.0] {
        let cfg = Configuration { lambda, ..base };
        let mut sim = HarmonicSimulation::new(cfg)?;
        let mut x_square = Vec::with_capacity(cfg.nmeas);
        sim.run(&mut |m: &Measurement| -> Result<()> {
            x_square.push(m.x_square_average);
            Ok(())
        })?;

        let tau = AutoCorrelation::with_default_window(&x_square)?.compute();
        let exact = cfg
            .analytic_x_square()
            .map(|v| format!("{:.6}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8.3} {:>10.4} {:>12.6} {:>12} {:>16}",
            lambda,
            sim.compute_acceptance(),
            sim.compute_x_square(),
            exact,
            format!("{:.3}", tau)
        );
    }
    Ok(())
}
