//! End-to-end runs of the full pipeline.

use approx::assert_relative_eq;

use crate::error::Result;
use crate::io::{Configuration, TsvWriter};
use crate::sampling::{HarmonicSimulation, Measurement, ObservableSink};
use crate::statistics::AutoCorrelation;

fn run_collecting(cfg: Configuration) -> (HarmonicSimulation, Vec<f64>) {
    let mut sim = HarmonicSimulation::new(cfg).unwrap();
    let mut x2 = Vec::with_capacity(cfg.nmeas);
    sim.run(&mut |m: &Measurement| -> Result<()> {
        x2.push(m.x_square_average);
        Ok(())
    })
    .unwrap();
    (sim, x2)
}

#[test]
fn test_harmonic_reference_run() {
    let cfg = Configuration {
        nt: 50,
        omega_square: 1.0,
        lambda: 0.0,
        nmeas: 2000,
        ntherm: 200,
        tau: 1.0,
        nstep: 10,
        seed: 42,
    };
    let (sim, x2) = run_collecting(cfg);

    let acceptance = sim.compute_acceptance();
    assert!((0.25..=1.0).contains(&acceptance), "acceptance {}", acceptance);

    let analytic = cfg.analytic_x_square().unwrap();
    assert_relative_eq!(sim.compute_x_square(), analytic, max_relative = 0.1);
    assert!(sim.compute_x().abs() < 0.1);

    // ε = 0.1 keeps the energy violation tiny
    assert_relative_eq!(sim.compute_exp_delta_h(), 1.0, epsilon = 0.05);

    let tau = AutoCorrelation::with_default_window(&x2).unwrap().compute();
    assert!(tau.mean >= 0.5 && tau.mean.is_finite());
    assert!(tau.uncertainty >= 0.0 && tau.uncertainty.is_finite());
}

#[test]
fn test_harmonic_within_statistical_error() {
    let cfg = Configuration {
        nt: 100,
        omega_square: 0.5,
        lambda: 0.0,
        nmeas: 3000,
        ntherm: 200,
        tau: 0.5,
        nstep: 10,
        seed: 7,
    };
    let (sim, x2) = run_collecting(cfg);

    let ac = AutoCorrelation::with_default_window(&x2).unwrap();
    let tau = ac.compute();
    let error = ac.sigma() * (2.0 * tau.mean).sqrt();
    let analytic = cfg.analytic_x_square().unwrap();
    let deviation = (sim.compute_x_square() - analytic).abs();
    assert!(
        deviation < 5.0 * error,
        "<x²> = {} vs {} (error {})",
        sim.compute_x_square(),
        analytic,
        error
    );
}

#[test]
fn test_anharmonic_narrows_the_path() {
    let base = Configuration {
        nt: 40,
        nmeas: 500,
        ntherm: 100,
        seed: 5,
        ..Configuration::default()
    };
    let (harmonic, _) = run_collecting(base);
    let (quartic, _) = run_collecting(Configuration { lambda: 1.0, ..base });
    assert!(quartic.compute_x_square() < harmonic.compute_x_square());
}

#[test]
fn test_rows_written_match_measurements() {
    let cfg = Configuration {
        nt: 16,
        nmeas: 30,
        ntherm: 20,
        seed: 1,
        ..Configuration::default()
    };
    let mut sim = HarmonicSimulation::new(cfg).unwrap();
    let mut out = TsvWriter::new(Vec::new());
    sim.run(&mut out).unwrap();
    let text = String::from_utf8(out.finish().unwrap()).unwrap();

    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), cfg.nmeas);
    for (i, row) in rows.iter().enumerate() {
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], i.to_string());
    }
    let x2: f64 = rows
        .iter()
        .map(|r| r.split('\t').nth(2).unwrap().parse::<f64>().unwrap())
        .sum::<f64>()
        / cfg.nmeas as f64;
    assert_relative_eq!(x2, sim.compute_x_square(), max_relative = 1e-12);
}

#[test]
fn test_sinks_compose() {
    let cfg = Configuration {
        nt: 16,
        nmeas: 20,
        ntherm: 20,
        seed: 2,
        ..Configuration::default()
    };
    let mut sim = HarmonicSimulation::new(cfg).unwrap();
    let mut out = TsvWriter::new(Vec::new());
    let mut samples = Vec::new();
    sim.run(&mut |m: &Measurement| -> Result<()> {
        samples.push(m.x_square_average);
        out.record(m)
    })
    .unwrap();
    let text = String::from_utf8(out.finish().unwrap()).unwrap();
    assert_eq!(text.lines().count(), samples.len());
}
