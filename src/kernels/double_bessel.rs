use std::f64::consts::{LN_2, PI};

use num_complex::Complex;
use statrs::function::gamma::ln_gamma as ln_gamma_real;

use super::MellinKernel;
use crate::math::{hyp2f1, ln_gamma};

/// Product of spherical Bessel functions `j_{l1}(t) j_{l2}(αt)`.
///
/// With `μ = l1 + 1/2`, `ν = l2 + 1/2` and `λ = 2 - z` the transform is the
/// Weber–Schafheitlin integral
///
/// ```text
/// M(z) = (π/2) α^{ν-1/2} Γ((ν+μ-λ+1)/2) / (2^λ Γ((λ+μ-ν+1)/2) Γ(ν+1))
///        · ₂F₁((ν+μ-λ+1)/2, (ν-μ-λ+1)/2; ν+1; α²)
/// ```
///
/// for `α <= 1`; `α > 1` maps back onto it through `M(z) = α^{-z} M_{l2, l1, 1/α}(z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleSphericalBesselJ {
    pub l1: u32,
    pub l2: u32,
    pub alpha: f64,
}

impl DoubleSphericalBesselJ {
    fn mellin_inner(l1: u32, l2: u32, alpha: f64, z: Complex<f64>) -> Complex<f64> {
        let mu = f64::from(l1) + 0.5;
        let nu = f64::from(l2) + 0.5;
        let lambda = -z + 2.0;

        let a = (-lambda + nu + mu + 1.0) * 0.5;
        let b = (-lambda + nu - mu + 1.0) * 0.5;
        let c = Complex::new(nu + 1.0, 0.0);
        let Some(f) = hyp2f1(a, b, c, alpha * alpha) else {
            return Complex::new(f64::NAN, f64::NAN);
        };

        let ln_pref = (PI / 2.0).ln() + (nu - 0.5) * alpha.ln() + ln_gamma(a)
            - lambda * LN_2
            - ln_gamma((lambda + mu - nu + 1.0) * 0.5)
            - ln_gamma_real(nu + 1.0);
        ln_pref.exp() * f
    }
}

impl MellinKernel for DoubleSphericalBesselJ {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Complex::new(f64::NAN, f64::NAN);
        }
        if self.alpha <= 1.0 {
            Self::mellin_inner(self.l1, self.l2, self.alpha, z)
        } else {
            let scale = (-z * self.alpha.ln()).exp();
            scale * Self::mellin_inner(self.l2, self.l1, 1.0 / self.alpha, z)
        }
    }
}
