//! Discretized path of the (an-)harmonic oscillator in Euclidean time.
//!
//! The path lives on `nt` time slices with periodic boundary conditions,
//! x[nt] = x[0]. Together with the conjugate momenta it forms the phase space
//! that the HMC driver evolves with a leapfrog integrator. The lattice does
//! not own a random generator: every draw comes from the caller's generator so
//! that momentum refresh and the Metropolis test share one stream.

use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{HmcError, Result};
use crate::io::Configuration;

/// Map a logical site index onto `[0, n)`, wrapping negative indices backward.
#[inline]
pub fn wrap(i: isize, n: usize) -> usize {
    let n = n as isize;
    (((i % n) + n) % n) as usize
}

/// Immutable parameters of a lattice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatticeParams {
    /// Number of time slices
    pub nt: usize,
    /// Leapfrog steps per trajectory
    pub nstep: usize,
    /// Trajectory length
    pub tau: f64,
    /// Squared oscillator frequency ω²
    pub omega_square: f64,
    /// Quartic coupling, 0 for the pure harmonic oscillator
    pub lambda: f64,
}

impl LatticeParams {
    pub fn validate(&self) -> Result<()> {
        if self.nt == 0 {
            return Err(HmcError::InvalidParameter("nt must be positive".into()));
        }
        if self.nstep == 0 {
            return Err(HmcError::InvalidParameter("nstep must be positive".into()));
        }
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(HmcError::InvalidParameter(format!(
                "tau must be positive, got {}",
                self.tau
            )));
        }
        if !(self.omega_square.is_finite() && self.omega_square > 0.0) {
            return Err(HmcError::InvalidParameter(format!(
                "omega_square must be positive, got {}",
                self.omega_square
            )));
        }
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(HmcError::InvalidParameter(format!(
                "lambda must be non-negative, got {}",
                self.lambda
            )));
        }
        Ok(())
    }
}

impl From<&Configuration> for LatticeParams {
    fn from(cfg: &Configuration) -> Self {
        Self {
            nt: cfg.nt,
            nstep: cfg.nstep,
            tau: cfg.tau,
            omega_square: cfg.omega_square,
            lambda: cfg.lambda,
        }
    }
}

/// Path positions, backup buffer and conjugate momenta.
#[derive(Clone, Debug)]
pub struct Lattice {
    nt: usize,
    nstep: usize,
    /// 2 + ω², diagonal coefficient of the discretized action
    osq: f64,
    lambda: f64,
    /// Leapfrog step size τ / nstep
    eps: f64,
    x: DVector<f64>,
    xbck: DVector<f64>,
    p: DVector<f64>,
}

impl Lattice {
    /// Create a lattice with positions drawn from the free-field width
    /// 1/sqrt(2ω²). Momenta stay zero until [`Lattice::randomize`].
    pub fn new<R: Rng + ?Sized>(params: LatticeParams, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let factor = 1.0 / (2.0 * params.omega_square).sqrt();
        let x = DVector::<f64>::from_distribution(params.nt, &StandardNormal, rng) * factor;

        Ok(Self {
            nt: params.nt,
            nstep: params.nstep,
            osq: 2.0 + params.omega_square,
            lambda: params.lambda,
            eps: params.tau / params.nstep as f64,
            xbck: x.clone(),
            x,
            p: DVector::zeros(params.nt),
        })
    }

    pub fn nt(&self) -> usize {
        self.nt
    }

    pub fn step_size(&self) -> f64 {
        self.eps
    }

    #[inline]
    pub fn x(&self, index: isize) -> f64 {
        self.x[wrap(index, self.nt)]
    }

    #[inline]
    pub fn p(&self, index: isize) -> f64 {
        self.p[wrap(index, self.nt)]
    }

    #[inline]
    pub fn set_x(&mut self, index: isize, value: f64) {
        let i = wrap(index, self.nt);
        self.x[i] = value;
    }

    #[inline]
    pub fn set_p(&mut self, index: isize, value: f64) {
        let i = wrap(index, self.nt);
        self.p[i] = value;
    }

    pub fn positions(&self) -> &[f64] {
        self.x.as_slice()
    }

    pub fn momenta(&self) -> &[f64] {
        self.p.as_slice()
    }

    /// Snapshot the positions for a later [`Lattice::restore`].
    pub fn store(&mut self) {
        self.xbck.copy_from(&self.x);
    }

    /// Roll the positions back to the last snapshot.
    pub fn restore(&mut self) {
        self.x.copy_from(&self.xbck);
    }

    /// Refresh all momenta with standard normal draws, site 0 first.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in self.p.iter_mut() {
            *p = StandardNormal.sample(rng);
        }
    }

    /// Negative gradient of the action at site n:
    /// (2 + ω²) x_n - x_{n-1} - x_{n+1} + 4λ x_n³
    #[inline]
    pub fn force(&self, n: isize) -> f64 {
        let xn = self.x(n);
        self.osq * xn - self.x(n - 1) - self.x(n + 1) + 4.0 * self.lambda * xn.powi(3)
    }

    fn integrate_x(&mut self, eps: f64) {
        self.x.axpy(eps, &self.p, 1.0);
    }

    fn integrate_p(&mut self, eps: f64) {
        for i in 0..self.nt {
            let f = self.force(i as isize);
            self.p[i] -= eps * f;
        }
    }

    /// One leapfrog trajectory of length τ:
    /// x half step, then nstep momentum kicks interleaved with nstep - 1 full
    /// position drifts, then the closing x half step.
    pub fn integrate(&mut self) {
        self.integrate_x(0.5 * self.eps);
        self.integrate_p(self.eps);

        for _ in 1..self.nstep {
            self.integrate_x(self.eps);
            self.integrate_p(self.eps);
        }

        self.integrate_x(0.5 * self.eps);
    }

    /// Local action density at site i, without the kinetic term.
    #[inline]
    fn action_density(&self, i: isize) -> f64 {
        let xi = self.x(i);
        self.osq * xi * xi + 2.0 * self.lambda * xi.powi(4) - xi * (self.x(i - 1) + self.x(i + 1))
    }

    /// H = ½ Σ p² + S[x]
    pub fn hamilton(&self) -> f64 {
        let kinetic: f64 = self.p.iter().map(|p| p * p).sum();
        let action: f64 = (0..self.nt as isize).map(|i| self.action_density(i)).sum();
        0.5 * (kinetic + action)
    }

    pub fn x_average(&self) -> f64 {
        self.x.sum() / self.nt as f64
    }

    pub fn x_square_average(&self) -> f64 {
        self.x.norm_squared() / self.nt as f64
    }

    /// Action per site, S[x] / nt.
    pub fn action_average(&self) -> f64 {
        let action: f64 = (0..self.nt as isize).map(|i| self.action_density(i)).sum();
        0.5 * action / self.nt as f64
    }
}
