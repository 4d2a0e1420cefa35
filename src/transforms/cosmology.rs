//! Power spectra, correlation functions and filtered variances.
//!
//! Conventions: `ξ_l(r) = i^l / (2π²) ∫ P(k) j_l(kr) k² dk` and its inverse
//! `P_l(k) = 4π (-i)^l ∫ ξ_l(r) j_l(kr) r² dr`, so [`P2xi`] followed by [`Xi2P`]
//! is the identity.

use std::f64::consts::PI;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::{PowerFactor, ScaledTransform, i_pow, with_derivative};
use crate::core::{FftLogError, LogGrid};
use crate::engines::fftlog::{FftLog, FftLogParams};
use crate::kernels::{GaussSq, SphericalBesselJ, TophatSq};

/// Power spectrum to correlation function multipole.
///
/// With `n` set the integrand carries an extra `k^n`, the bias becomes `q + n` and
/// the `i^l` phase is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct P2xi {
    pub l: u32,
    pub n: Option<i32>,
    pub q: f64,
}

impl Default for P2xi {
    fn default() -> Self {
        Self {
            l: 0,
            n: None,
            q: 1.5,
        }
    }
}

impl P2xi {
    pub fn build(&self, k: LogGrid, params: FftLogParams) -> Result<ScaledTransform<SphericalBesselJ>, FftLogError> {
        let (n, phase) = match self.n {
            Some(n) => (f64::from(n), Complex::new(1.0, 0.0)),
            None => (0.0, i_pow(self.l)),
        };
        let engine = FftLog::new(k, SphericalBesselJ { l: self.l }, self.q + n, params)?;
        let prefactor = with_derivative(PowerFactor::new(1.0 / (2.0 * PI * PI), 3.0 + n), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, phase)
    }
}

/// Correlation function multipole to power spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xi2P {
    pub l: u32,
    pub q: f64,
}

impl Default for Xi2P {
    fn default() -> Self {
        Self { l: 0, q: 1.5 }
    }
}

impl Xi2P {
    pub fn build(&self, r: LogGrid, params: FftLogParams) -> Result<ScaledTransform<SphericalBesselJ>, FftLogError> {
        let engine = FftLog::new(r, SphericalBesselJ { l: self.l }, self.q, params)?;
        let prefactor = with_derivative(PowerFactor::new(4.0 * PI, 3.0), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, i_pow(self.l).conj())
    }
}

/// Variance in a top-hat sphere of radius `R`, `σ²(R) = 1/(2π²) ∫ P(k) W²(kR) k² dk`.
///
/// ```rust
/// use fftlog::core::{LogGrid, interpolate_loglog};
/// use fftlog::engines::fftlog::{Extrapolation, FftLogParams, LowRing};
/// use fftlog::transforms::TophatVar;
///
/// let k = LogGrid::from_range(1e-5, 1e2, 512).unwrap();
/// let params = FftLogParams { lowring: LowRing::Offset, ..FftLogParams::default() };
/// let var = TophatVar::default().build(k, params).unwrap();
/// let pk: Vec<f64> = var.x().iter().map(|k| k / (1.0 + (k / 0.02).powi(4))).collect();
/// let (r, sigma2) = var.apply(&pk, Extrapolation::Zero).unwrap();
/// let sigma8 = interpolate_loglog(&r, &sigma2, 8.0).sqrt();
/// assert!(sigma8.is_finite() && sigma8 > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TophatVar {
    pub q: f64,
}

impl Default for TophatVar {
    fn default() -> Self {
        Self { q: 1.5 }
    }
}

impl TophatVar {
    pub fn build(&self, k: LogGrid, params: FftLogParams) -> Result<ScaledTransform<TophatSq>, FftLogError> {
        let engine = FftLog::new(k, TophatSq { dim: 3 }, self.q, params)?;
        let prefactor = with_derivative(PowerFactor::new(1.0 / (2.0 * PI * PI), 3.0), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, Complex::new(1.0, 0.0))
    }
}

/// Variance in a Gaussian window, `W(kR)² = exp(-k²R²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussVar {
    pub q: f64,
}

impl Default for GaussVar {
    fn default() -> Self {
        Self { q: 1.5 }
    }
}

impl GaussVar {
    pub fn build(&self, k: LogGrid, params: FftLogParams) -> Result<ScaledTransform<GaussSq>, FftLogError> {
        let engine = FftLog::new(k, GaussSq, self.q, params)?;
        let prefactor = with_derivative(PowerFactor::new(1.0 / (2.0 * PI * PI), 3.0), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, Complex::new(1.0, 0.0))
    }
}

/// Excursion-set first-crossing trajectory. No kernel is defined for it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExcursionSet {
    pub q: f64,
}

impl ExcursionSet {
    pub fn build(&self, _k: LogGrid, _params: FftLogParams) -> Result<ScaledTransform<TophatSq>, FftLogError> {
        Err(FftLogError::Unsupported(
            "excursion-set trajectories have no Mellin kernel".to_string(),
        ))
    }
}
