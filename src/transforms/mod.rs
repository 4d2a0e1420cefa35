//! Integral transforms with physical normalisation on top of the engine.
//!
//! A [`ScaledTransform`] multiplies the input by a power-law prefactor, runs the
//! engine and multiplies the output by a power-law postfactor and a constant
//! phase. The constructors here and in [`cosmology`] only pick the kernel, the
//! bias exponent and these factors.

pub mod cosmology;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

pub use cosmology::{ExcursionSet, GaussVar, P2xi, TophatVar, Xi2P};

use crate::core::{FftLogError, LogGrid};
use crate::engines::fftlog::{ApplyOptions, Extrapolation, FftLog, FftLogParams, pad};
use crate::kernels::{BesselJ, DoubleSphericalBesselJ, MellinKernel, SphericalBesselJ};

/// `scale * x^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerFactor {
    pub scale: f64,
    pub exponent: f64,
}

impl PowerFactor {
    pub const ONE: Self = Self {
        scale: 1.0,
        exponent: 0.0,
    };

    pub fn new(scale: f64, exponent: f64) -> Self {
        Self { scale, exponent }
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.scale * x.powf(self.exponent)
    }
}

/// Engine plus prefactor, postfactor and phase.
#[derive(Debug, Clone)]
pub struct ScaledTransform<K> {
    engine: FftLog<K>,
    prefactor: PowerFactor,
    postfactor: PowerFactor,
    phase: Complex<f64>,
    /// Prefactor sampled on the padded input grid.
    prefactor_values: Vec<f64>,
}

impl<K: MellinKernel> ScaledTransform<K> {
    pub fn new(
        engine: FftLog<K>,
        prefactor: PowerFactor,
        postfactor: PowerFactor,
        phase: Complex<f64>,
    ) -> Result<Self, FftLogError> {
        let prefactor_values: Vec<f64> = engine
            .padded_input_grid()
            .values()
            .into_iter()
            .map(|x| prefactor.eval(x))
            .collect();
        if prefactor_values.iter().any(|v| !v.is_finite()) || !(phase.re.is_finite() && phase.im.is_finite()) {
            return Err(FftLogError::NumericOverflow(
                "prefactor or phase is not finite on the padded grid".to_string(),
            ));
        }
        Ok(Self {
            engine,
            prefactor,
            postfactor,
            phase,
            prefactor_values,
        })
    }

    /// Real transform; fails with [`FftLogError::ComplexOutput`] for an imaginary phase.
    pub fn apply(&self, input: &[f64], extrap: Extrapolation) -> Result<(Vec<f64>, Vec<f64>), FftLogError> {
        self.apply_with(input, &ApplyOptions::with_extrap(extrap))
    }

    pub fn apply_with(
        &self,
        input: &[f64],
        options: &ApplyOptions,
    ) -> Result<(Vec<f64>, Vec<f64>), FftLogError> {
        if self.phase.im != 0.0 {
            return Err(FftLogError::ComplexOutput);
        }
        let (y, mut g) = self.transform(input, options)?;
        for (v, yv) in g.iter_mut().zip(&y) {
            *v *= self.postfactor.eval(*yv) * self.phase.re;
        }
        Ok((y, g))
    }

    /// Transform including an imaginary phase such as `i^l`.
    pub fn apply_complex(
        &self,
        input: &[f64],
        options: &ApplyOptions,
    ) -> Result<(Vec<f64>, Vec<Complex<f64>>), FftLogError> {
        let (y, g) = self.transform(input, options)?;
        let out = g
            .iter()
            .zip(&y)
            .map(|(v, yv)| self.phase * (v * self.postfactor.eval(*yv)))
            .collect();
        Ok((y, out))
    }

    /// Pads the raw input, applies the prefactor and runs the engine.
    fn transform(&self, input: &[f64], options: &ApplyOptions) -> Result<(Vec<f64>, Vec<f64>), FftLogError> {
        let expected = self.engine.input_grid().len();
        if input.len() != expected {
            return Err(FftLogError::Shape {
                expected,
                actual: input.len(),
            });
        }
        self.engine.check_extrap(options.extrap)?;
        let (left, right) = self.engine.pads();
        let mut padded = pad(input, left, right, options.extrap, self.engine.params().extrap_window);
        for (v, p) in padded.iter_mut().zip(&self.prefactor_values) {
            *v *= *p;
        }
        self.engine.apply_padded(padded, options)
    }

    pub fn x(&self) -> Vec<f64> {
        self.engine.x()
    }

    pub fn y(&self) -> Vec<f64> {
        self.engine.y()
    }

    pub fn engine(&self) -> &FftLog<K> {
        &self.engine
    }

    pub fn prefactor(&self) -> PowerFactor {
        self.prefactor
    }

    pub fn postfactor(&self) -> PowerFactor {
        self.postfactor
    }

    pub fn phase(&self) -> Complex<f64> {
        self.phase
    }
}

/// Multiplies a prefactor by `x^deriv` so outputs become `dⁿG/dyⁿ`.
pub(crate) fn with_derivative(prefactor: PowerFactor, params: &FftLogParams) -> PowerFactor {
    PowerFactor::new(prefactor.scale, prefactor.exponent + f64::from(params.deriv))
}

/// `i^l`.
pub(crate) fn i_pow(l: u32) -> Complex<f64> {
    match l % 4 {
        0 => Complex::new(1.0, 0.0),
        1 => Complex::new(0.0, 1.0),
        2 => Complex::new(-1.0, 0.0),
        _ => Complex::new(0.0, -1.0),
    }
}

/// Hankel transform `G(y) = ∫ F(x) J_ν(xy) x dx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hankel {
    pub nu: f64,
    pub q: f64,
}

impl Default for Hankel {
    fn default() -> Self {
        Self { nu: 0.0, q: 1.0 }
    }
}

impl Hankel {
    pub fn build(&self, x: LogGrid, params: FftLogParams) -> Result<ScaledTransform<BesselJ>, FftLogError> {
        let engine = FftLog::new(x, BesselJ { nu: self.nu }, self.q, params)?;
        let prefactor = with_derivative(PowerFactor::new(1.0, 2.0), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, Complex::new(1.0, 0.0))
    }
}

/// Spherical Bessel transform `G(y) = ∫ F(x) j_l(xy) x² dx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalBessel {
    pub l: u32,
    pub q: f64,
}

impl Default for SphericalBessel {
    fn default() -> Self {
        Self { l: 0, q: 1.5 }
    }
}

impl SphericalBessel {
    pub fn build(&self, x: LogGrid, params: FftLogParams) -> Result<ScaledTransform<SphericalBesselJ>, FftLogError> {
        let engine = FftLog::new(x, SphericalBesselJ { l: self.l }, self.q, params)?;
        let prefactor = with_derivative(PowerFactor::new(1.0, 3.0), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, Complex::new(1.0, 0.0))
    }
}

/// `G(y) = ∫ F(x) j_{l1}(xy) j_{l2}(αxy) x² dx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleSphericalBessel {
    pub alpha: f64,
    pub l1: u32,
    pub l2: u32,
    pub q: f64,
}

impl Default for DoubleSphericalBessel {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            l1: 0,
            l2: 0,
            q: 1.5,
        }
    }
}

impl DoubleSphericalBessel {
    pub fn build(
        &self,
        x: LogGrid,
        params: FftLogParams,
    ) -> Result<ScaledTransform<DoubleSphericalBesselJ>, FftLogError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(FftLogError::Configuration(
                "double spherical Bessel ratio alpha must be finite and > 0".to_string(),
            ));
        }
        let kernel = DoubleSphericalBesselJ {
            l1: self.l1,
            l2: self.l2,
            alpha: self.alpha,
        };
        let engine = FftLog::new(x, kernel, self.q, params)?;
        let prefactor = with_derivative(PowerFactor::new(1.0, 3.0), &params);
        ScaledTransform::new(engine, prefactor, PowerFactor::ONE, Complex::new(1.0, 0.0))
    }
}
