//! Closed-form results for the harmonic chain (λ = 0).
//!
//! For the lattice action S = ½ Σᵢ [(x_{i+1} - x_i)² + ω² x_i²] on a periodic
//! chain of nt sites the two-point function is known exactly. With
//! R = 1 + ω²/2 - ω sqrt(1 + ω²/4):
//!
//! <x²> = (1 + R^nt) / (2ω sqrt(1 + ω²/4) (1 - R^nt))
//!
//! Reference: Creutz, M. and Freedman, B. (1981) "A statistical approach to
//! quantum mechanics", Ann. Phys. 132, 427

/// Exact <x²> of the discretized harmonic oscillator.
pub fn x_square_harmonic(nt: usize, omega_square: f64) -> f64 {
    let omega = omega_square.sqrt();
    let root = (1.0 + 0.25 * omega_square).sqrt();
    let r = 1.0 + 0.5 * omega_square - omega * root;
    // 0 <= R < 1, so R^nt has long underflowed once nt leaves the i32 range
    let rn = i32::try_from(nt).map_or(0.0, |n| r.powi(n));

    let a = 1.0 + rn;
    let b = 2.0 * omega * root * (1.0 - rn);
    a / b
}
