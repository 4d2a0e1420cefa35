//! Smoothing windows used for variances of filtered fields.

use num_complex::Complex;
use statrs::function::gamma::ln_gamma as ln_gamma_real;

use super::{MellinKernel, pow2};
use crate::math::ln_gamma;

/// Top-hat window in `dim` dimensions, `W(t) = 2^ν Γ(ν+1) J_ν(t) / t^ν` with `ν = dim/2`.
///
/// Normalised to `W(0) = 1`; in three dimensions `W(t) = 3 (sin t - t cos t) / t³`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tophat {
    pub dim: u32,
}

impl MellinKernel for Tophat {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        let nu = 0.5 * f64::from(self.dim);
        let half = z * 0.5;
        let ln_m = ln_gamma_real(nu + 1.0) + ln_gamma(half) - ln_gamma(-half + nu + 1.0);
        pow2(z - 1.0) * ln_m.exp()
    }
}

/// Squared top-hat window `W(t)²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TophatSq {
    pub dim: u32,
}

impl MellinKernel for TophatSq {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        let nu = 0.5 * f64::from(self.dim);
        let half = z * 0.5;
        let ln_m = 2.0 * ln_gamma_real(nu + 1.0) + ln_gamma(-z + 2.0 * nu + 1.0) + ln_gamma(half)
            - 2.0 * ln_gamma(-half + nu + 1.0)
            - ln_gamma(-half + 2.0 * nu + 1.0);
        pow2(z - 1.0) * ln_m.exp()
    }
}

/// Gaussian window `exp(-t²/2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauss;

impl MellinKernel for Gauss {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        pow2(z * 0.5 - 1.0) * ln_gamma(z * 0.5).exp()
    }
}

/// Squared Gaussian window `exp(-t²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussSq;

impl MellinKernel for GaussSq {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        ln_gamma(z * 0.5).exp() * 0.5
    }
}
