//! Integrated autocorrelation time with automatic windowing.
//!
//! The normalized autocorrelation Γ(t) of a Monte Carlo series is summed
//! until it drops below its own statistical error, which fixes the window W.
//! The error of each Γ(t) follows the Madras-Sokal propagation formula and the
//! error of τ_int the usual windowing estimate.
//!
//! Reference: Wolff, U. (2004) "Monte Carlo errors with less errors",
//! Comput. Phys. Commun. 156, 143

use std::fmt;

use crate::error::{HmcError, Result};

/// Default number of extra lags in the error sum of Γ(t).
pub const DEFAULT_WINDOW: usize = 100;

/// Estimate with its statistical uncertainty.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observable<T> {
    pub mean: T,
    pub uncertainty: T,
}

impl<T: fmt::Display> fmt::Display for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*} ± {:.*}", precision, self.mean, precision, self.uncertainty)
        } else {
            write!(f, "{} ± {}", self.mean, self.uncertainty)
        }
    }
}

/// Autocorrelation analysis of a borrowed sample series.
#[derive(Clone, Debug)]
pub struct AutoCorrelation<'a> {
    elements: &'a [f64],
    window: usize,
    avg: f64,
}

impl<'a> AutoCorrelation<'a> {
    /// Needs at least `window + 2` samples so that the lag range is not empty.
    pub fn new(elements: &'a [f64], window: usize) -> Result<Self> {
        if elements.len() < window + 2 {
            return Err(HmcError::InsufficientSamples {
                samples: elements.len(),
                window,
            });
        }
        let avg = elements.iter().sum::<f64>() / elements.len() as f64;
        Ok(Self { elements, window, avg })
    }

    pub fn with_default_window(elements: &'a [f64]) -> Result<Self> {
        Self::new(elements, DEFAULT_WINDOW)
    }

    pub fn average(&self) -> f64 {
        self.avg
    }

    /// Standard error of the mean, ignoring correlations.
    pub fn sigma(&self) -> f64 {
        let n = self.elements.len() as f64;
        let var: f64 = self.elements.iter().map(|&x| (x - self.avg).powi(2)).sum();
        (var / (n * (n - 1.0))).sqrt()
    }

    /// τ_int and its uncertainty.
    pub fn compute(&self) -> Observable<f64> {
        let n = self.elements.len();
        let tmax = (n - self.window) / 2;
        let (g0, g) = self.auto_corr(n - 1);
        let eg = self.sigma_corr(tmax, &g);

        if g0 == 0.0 {
            return Observable { mean: 0.5, uncertainty: 0.0 };
        }

        let mut tau = 0.5;
        let mut w = tmax;
        for t in 1..tmax {
            tau += g[t];
            if g[t] <= eg[t] {
                w = t;
                break;
            }
        }

        let xn = n as f64;
        let sigma = tau * ((2.0 / xn) * ((2 * w + 1) as f64 - 3.0 * tau + 1.0 / (4.0 * tau))).sqrt();
        Observable { mean: tau, uncertainty: sigma }
    }

    /// Normalized autocorrelation for lags `0..lags` and the lag-0 autocovariance.
    /// A series without measurable variance yields Γ ≡ 0 and g0 = 0.
    fn auto_corr(&self, lags: usize) -> (f64, Vec<f64>) {
        let n = self.elements.len();
        let mut g = vec![0.0; lags];

        let sigma = self.sigma();
        if sigma <= 10.0 * f64::EPSILON * self.avg.abs() {
            return (0.0, g);
        }

        let g0 = sigma * sigma * (n - 1) as f64;
        g[0] = 1.0;
        for t in 1..lags {
            let cov: f64 = self.elements[..n - t]
                .iter()
                .zip(self.elements[t..].iter())
                .map(|(&a, &b)| (a - self.avg) * (b - self.avg))
                .sum();
            g[t] = cov / (g0 * (n - t) as f64);
        }
        (g0, g)
    }

    /// Statistical error of Γ(t) for lags `0..tmax`.
    fn sigma_corr(&self, tmax: usize, g: &[f64]) -> Vec<f64> {
        let n = self.elements.len() as f64;
        let mut eg = vec![0.0; tmax];
        if g[0] == 0.0 {
            return eg;
        }

        for t in 1..tmax {
            let sm: f64 = (1..=t + self.window)
                .map(|k| (g[k + t] + g[k.abs_diff(t)] - 2.0 * g[t] * g[k]).powi(2))
                .sum();
            eg[t] = (sm / n).sqrt();
        }
        eg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_pcg::Pcg64;

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = Pcg64::seed_from_u64(seed);
        (0..n).map(|_| StandardNormal.sample(&mut rng)).collect()
    }

    fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                let noise: f64 = StandardNormal.sample(&mut rng);
                x = phi * x + noise;
                x
            })
            .collect()
    }

    #[test]
    fn test_too_few_samples() {
        let data = vec![1.0; 101];
        assert!(matches!(
            AutoCorrelation::new(&data, 100),
            Err(HmcError::InsufficientSamples { samples: 101, window: 100 })
        ));
        assert!(AutoCorrelation::new(&vec![1.0, 2.0, 3.0, 4.0], 2).is_ok());
    }

    #[test]
    fn test_average_and_sigma() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let ac = AutoCorrelation::new(&data, 0).unwrap();
        assert_relative_eq!(ac.average(), 2.5, epsilon = 1e-12);
        // sqrt(5 / (4 * 3))
        assert_relative_eq!(ac.sigma(), (5.0f64 / 12.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_constant_series() {
        let data = vec![3.25; 500];
        let tau = AutoCorrelation::with_default_window(&data).unwrap().compute();
        assert_eq!(tau, Observable { mean: 0.5, uncertainty: 0.0 });
    }

    #[test]
    fn test_normalization() {
        let data = white_noise(300, 9);
        let ac = AutoCorrelation::new(&data, 10).unwrap();
        let (g0, g) = ac.auto_corr(data.len() - 1);
        assert_eq!(g.len(), 299);
        assert_eq!(g[0], 1.0);
        let var: f64 = data.iter().map(|x| (x - ac.average()).powi(2)).sum::<f64>() / 300.0;
        assert_relative_eq!(g0, var, epsilon = 1e-12);
    }

    #[test]
    fn test_white_noise() {
        let data = white_noise(1000, 17);
        let tau = AutoCorrelation::with_default_window(&data).unwrap().compute();
        assert!((tau.mean - 0.5).abs() < 0.15, "tau_int = {}", tau);
        assert!(tau.uncertainty > 0.0 && tau.uncertainty < 0.15, "tau_int = {}", tau);
    }

    #[test]
    fn test_correlated_series() {
        let data = ar1(4000, 0.9, 23);
        let tau = AutoCorrelation::with_default_window(&data).unwrap().compute();
        // exact value (1 + φ) / (2 (1 - φ)) = 9.5
        assert!(tau.mean > 3.0, "tau_int = {}", tau);
        assert!(tau.uncertainty > 0.0 && tau.uncertainty < tau.mean);
    }

    #[test]
    fn test_deterministic() {
        let data = ar1(600, 0.5, 4);
        let a = AutoCorrelation::with_default_window(&data).unwrap().compute();
        let b = AutoCorrelation::with_default_window(&data).unwrap().compute();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let obs = Observable { mean: 1.23456, uncertainty: 0.01 };
        assert_eq!(format!("{:.2}", obs), "1.23 ± 0.01");
    }
}
