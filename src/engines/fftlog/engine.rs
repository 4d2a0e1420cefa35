use std::f64::consts::PI;

use num_complex::Complex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::extrap::{self, DEFAULT_WINDOW, Extrapolation};
use super::fft_core::{Direction, FftPlans};
use super::lowring::{self, LowRing, LowRingSolution, LowRingStatus};
use crate::core::{FftLogError, LogGrid};
use crate::kernels::{Derivative, Inverse, MellinKernel};

/// Smallest grid that resolves at least one oscillation.
pub const MIN_GRID_LEN: usize = 4;

/// FFT length relative to the grid length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Padding {
    /// FFT over the grid itself.
    #[default]
    None,
    /// Next power of two at least `factor` times the grid length.
    Fold(u32),
    /// Explicit FFT length, at least the grid length.
    Exact(usize),
}

impl Padding {
    /// FFT length for a grid of `len` points.
    pub fn fft_len(self, len: usize) -> Result<usize, FftLogError> {
        match self {
            Self::None => Ok(len),
            Self::Fold(0) => Err(FftLogError::Configuration(
                "padding factor must be >= 1".to_string(),
            )),
            Self::Fold(factor) => Ok((len * factor as usize).next_power_of_two()),
            Self::Exact(n) if n < len => Err(FftLogError::Configuration(format!(
                "padded length {n} is shorter than the grid ({len} points)"
            ))),
            Self::Exact(n) => Ok(n),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FftLogParams {
    pub lowring: LowRing,
    /// Requested `ln(x[N-1-k] y[k])` before low-ringing adjustment.
    pub ln_xy: f64,
    pub padding: Padding,
    /// Order of the kernel derivative.
    pub deriv: u32,
    /// Edge samples used by power-law extrapolation.
    pub extrap_window: usize,
}

impl Default for FftLogParams {
    fn default() -> Self {
        Self {
            lowring: LowRing::Off,
            ln_xy: 0.0,
            padding: Padding::None,
            deriv: 0,
            extrap_window: DEFAULT_WINDOW,
        }
    }
}

impl FftLogParams {
    pub fn validate(&self) -> Result<(), FftLogError> {
        if !self.ln_xy.is_finite() {
            return Err(FftLogError::Configuration("ln_xy must be finite".to_string()));
        }
        if let LowRing::Step { max_rel_change } = self.lowring {
            if !(max_rel_change > 0.0 && max_rel_change < 1.0) {
                return Err(FftLogError::Configuration(
                    "low-ringing max_rel_change must be in (0, 1)".to_string(),
                ));
            }
        }
        if self.padding == Padding::Fold(0) {
            return Err(FftLogError::Configuration(
                "padding factor must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-call options of [`FftLog::apply_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    pub extrap: Extrapolation,
    /// Return the full padded output instead of the part conjugate to the input grid.
    pub keep_pads: bool,
    /// Skip the `x^{-q}` and `y^{-q}` weights and return the bare convolution.
    pub conv_only: bool,
}

impl ApplyOptions {
    pub fn with_extrap(extrap: Extrapolation) -> Self {
        Self {
            extrap,
            ..Self::default()
        }
    }
}

/// Everything derived from the grid, bias and tuning; replaced as a whole on retune.
#[derive(Debug, Clone)]
struct Layout {
    input: LogGrid,
    output: LogGrid,
    padded_input: LogGrid,
    padded_output: LogGrid,
    pad_left: usize,
    pad_right: usize,
    lowring: LowRingSolution,
    plans: FftPlans,
    transfer: Vec<Complex<f64>>,
    x_weight: Vec<f64>,
    y_weight: Vec<f64>,
}

impl Layout {
    fn build<K: MellinKernel>(
        kernel: &K,
        nominal: &LogGrid,
        q: f64,
        params: &FftLogParams,
    ) -> Result<Self, FftLogError> {
        nominal.validate()?;
        params.validate()?;
        let n = nominal.len();
        if n < MIN_GRID_LEN {
            return Err(FftLogError::Configuration(format!(
                "fftlog requires at least {MIN_GRID_LEN} samples, got {n}"
            )));
        }
        if !q.is_finite() {
            return Err(FftLogError::Configuration(
                "bias exponent q must be finite".to_string(),
            ));
        }
        let m_q = kernel.mellin(Complex::new(q, 0.0));
        if !(m_q.re.is_finite() && m_q.im.is_finite()) {
            return Err(FftLogError::Configuration(format!(
                "kernel Mellin transform is not finite at q = {q}; q is outside its convergence strip"
            )));
        }

        let fft_len = params.padding.fft_len(n)?;
        let pad_left = (fft_len - n) / 2;
        let pad_right = fft_len - n - pad_left;

        let lowring = lowring::solve(kernel, q, nominal.log_step(), params.ln_xy, params.lowring);
        let input = if lowring.log_step == nominal.log_step() {
            *nominal
        } else {
            nominal.with_log_step(lowring.log_step)
        };
        input.validate()?;

        let padded_input = input.extend(pad_left, pad_right);
        let padded_output = padded_input.reflect(lowring.ln_xy);
        let output = padded_output.slice(pad_right, n);

        let transfer = transfer_function(kernel, q, lowring.log_step, lowring.ln_xy, fft_len)?;
        let x_weight = padded_input.powers(-q);
        let y_weight = padded_output.powers(-q);
        if x_weight.iter().chain(&y_weight).any(|w| !w.is_finite()) {
            return Err(FftLogError::NumericOverflow(format!(
                "bias weights x^-q overflow for q = {q} on this grid"
            )));
        }

        tracing::debug!(
            "fftlog: n={} fft_len={} log_step={:e} q={} ln_xy={} lowring={:?}",
            n,
            fft_len,
            lowring.log_step,
            q,
            lowring.ln_xy,
            lowring.status
        );

        let plans = FftPlans::new(fft_len);
        debug_assert_eq!(transfer.len(), plans.half_len());

        Ok(Self {
            input,
            output,
            padded_input,
            padded_output,
            pad_left,
            pad_right,
            lowring,
            plans,
            transfer,
            x_weight,
            y_weight,
        })
    }

    fn fft_len(&self) -> usize {
        self.padded_input.len()
    }
}

/// `U_m = M(q + iω_m) exp(-iω_m ln_xy)` for `m = 0..=len/2`, `ω_m = 2πm / (len Δ)`.
fn transfer_function<K: MellinKernel>(
    kernel: &K,
    q: f64,
    log_step: f64,
    ln_xy: f64,
    len: usize,
) -> Result<Vec<Complex<f64>>, FftLogError> {
    let dw = 2.0 * PI / (len as f64 * log_step);
    (0..=len / 2)
        .map(|m| {
            let w = m as f64 * dw;
            let u = kernel.mellin(Complex::new(q, w)) * Complex::new(0.0, -w * ln_xy).exp();
            if u.re.is_finite() && u.im.is_finite() {
                Ok(u)
            } else {
                Err(FftLogError::NumericOverflow(format!(
                    "kernel not finite at bin {m} (z = {q} + {w}i)"
                )))
            }
        })
        .collect()
}

/// FFTLog transform `G(y) = ∫ F(x) K(xy) dx/x` of samples on a logarithmic grid.
///
/// Construction evaluates the kernel once per frequency bin; [`FftLog::apply`] then
/// costs two real FFTs of the padded length. The output grid is the reflection of
/// the input grid, `x[N-1-k] y[k] = exp(ln_xy)`, with the same log-step.
///
/// # Examples
/// ```rust
/// use fftlog::core::LogGrid;
/// use fftlog::engines::fftlog::{Extrapolation, FftLog, FftLogParams};
/// use fftlog::kernels::SphericalBesselJ;
///
/// let grid = LogGrid::from_range(1e-4, 1e4, 256).unwrap();
/// let engine = FftLog::new(grid, SphericalBesselJ { l: 0 }, 1.5, FftLogParams::default()).unwrap();
/// let input: Vec<f64> = engine.x().iter().map(|x| (-x * x).exp()).collect();
/// let (y, g) = engine.apply(&input, Extrapolation::Zero).unwrap();
/// assert_eq!(y.len(), 256);
/// assert_eq!(g.len(), 256);
/// ```
#[derive(Debug, Clone)]
pub struct FftLog<K> {
    kernel: Derivative<K>,
    q: f64,
    params: FftLogParams,
    nominal: LogGrid,
    layout: Layout,
}

impl<K: MellinKernel> FftLog<K> {
    pub fn new(grid: LogGrid, kernel: K, q: f64, params: FftLogParams) -> Result<Self, FftLogError> {
        let kernel = Derivative::new(kernel, params.deriv);
        let layout = Layout::build(&kernel, &grid, q, &params)?;
        Ok(Self {
            kernel,
            q,
            params,
            nominal: grid,
            layout,
        })
    }

    /// Engine on tabulated, logarithmically spaced abscissae.
    pub fn from_samples(x: &[f64], kernel: K, q: f64, params: FftLogParams) -> Result<Self, FftLogError> {
        Self::new(LogGrid::from_samples(x)?, kernel, q, params)
    }

    /// Recomputes the tuned grid and transfer function for a new bias and tuning mode.
    ///
    /// On error the engine is left unchanged.
    pub fn retune(&mut self, q: f64, lowring: LowRing) -> Result<(), FftLogError> {
        let params = FftLogParams {
            lowring,
            ..self.params
        };
        let layout = Layout::build(&self.kernel, &self.nominal, q, &params)?;
        self.q = q;
        self.params = params;
        self.layout = layout;
        Ok(())
    }

    pub fn apply(&self, input: &[f64], extrap: Extrapolation) -> Result<(Vec<f64>, Vec<f64>), FftLogError> {
        self.apply_with(input, &ApplyOptions::with_extrap(extrap))
    }

    /// Transforms `input`, sampled on [`FftLog::x`], and returns `(y, G(y))`.
    pub fn apply_with(
        &self,
        input: &[f64],
        options: &ApplyOptions,
    ) -> Result<(Vec<f64>, Vec<f64>), FftLogError> {
        self.check_len(input.len())?;
        self.check_extrap(options.extrap)?;
        let layout = &self.layout;
        let padded = extrap::pad(
            input,
            layout.pad_left,
            layout.pad_right,
            options.extrap,
            self.params.extrap_window,
        );
        let out = self.transform_padded(padded, options.conv_only)?;
        Ok(self.crop(out, options.keep_pads))
    }

    /// Transforms a signal already extended to [`FftLog::fft_len`] samples on
    /// [`FftLog::padded_input_grid`]; `options.extrap` is ignored.
    pub fn apply_padded(
        &self,
        padded: Vec<f64>,
        options: &ApplyOptions,
    ) -> Result<(Vec<f64>, Vec<f64>), FftLogError> {
        let expected = self.fft_len();
        if padded.len() != expected {
            return Err(FftLogError::Shape {
                expected,
                actual: padded.len(),
            });
        }
        let out = self.transform_padded(padded, options.conv_only)?;
        Ok(self.crop(out, options.keep_pads))
    }

    /// Transforms complex samples; real and imaginary parts are extrapolated separately.
    pub fn apply_complex(
        &self,
        input: &[Complex<f64>],
        options: &ApplyOptions,
    ) -> Result<(Vec<f64>, Vec<Complex<f64>>), FftLogError> {
        self.check_len(input.len())?;
        self.check_extrap(options.extrap)?;
        let layout = &self.layout;
        let pad_part = |part: fn(&Complex<f64>) -> f64| {
            let values: Vec<f64> = input.iter().map(part).collect();
            extrap::pad(
                &values,
                layout.pad_left,
                layout.pad_right,
                options.extrap,
                self.params.extrap_window,
            )
        };
        let re = pad_part(|c| c.re);
        let im = pad_part(|c| c.im);

        let mut buf: Vec<Complex<f64>> = re
            .into_iter()
            .zip(im)
            .map(|(r, i)| Complex::new(r, i))
            .collect();
        if !options.conv_only {
            for (v, w) in buf.iter_mut().zip(&layout.x_weight) {
                *v *= *w;
            }
        }

        layout.plans.complex_inplace(&mut buf, Direction::Forward);
        for (v, u) in buf.iter_mut().zip(self.full_transfer()) {
            *v *= u;
        }
        layout.plans.complex_inplace(&mut buf, Direction::Inverse);
        buf.reverse();

        if !options.conv_only {
            for (v, w) in buf.iter_mut().zip(&layout.y_weight) {
                *v *= *w;
            }
        }
        Ok(self.crop(buf, options.keep_pads))
    }

    /// Inverse engine on the output grid: kernel `1/M(-z)`, bias `-q`, same `ln_xy`
    /// and FFT length, no further tuning.
    pub fn inverse(&self) -> Result<FftLog<Inverse<Derivative<K>>>, FftLogError>
    where
        K: Clone,
    {
        let params = FftLogParams {
            lowring: LowRing::Off,
            ln_xy: self.ln_xy(),
            padding: Padding::Exact(self.fft_len()),
            deriv: 0,
            extrap_window: self.params.extrap_window,
        };
        FftLog::new(self.layout.output, Inverse(self.kernel.clone()), -self.q, params)
    }

    /// Dense transform matrix, `m[i][j]` the response at `y[i]` to a unit sample at `x[j]`.
    pub fn matrix(&self) -> Result<Vec<Vec<f64>>, FftLogError> {
        let n = self.layout.input.len();
        let mut columns = Vec::with_capacity(n);
        let mut unit = vec![0.0; n];
        for j in 0..n {
            unit[j] = 1.0;
            columns.push(self.apply(&unit, Extrapolation::Zero)?.1);
            unit[j] = 0.0;
        }
        Ok(transpose(&columns))
    }

    /// Transform matrix of the full padded system.
    pub fn matrix_padded(&self) -> Result<Vec<Vec<f64>>, FftLogError> {
        let len = self.fft_len();
        let mut columns = Vec::with_capacity(len);
        for j in 0..len {
            let mut unit = vec![0.0; len];
            unit[j] = 1.0;
            columns.push(self.transform_padded(unit, false)?);
        }
        Ok(transpose(&columns))
    }

    fn check_len(&self, actual: usize) -> Result<(), FftLogError> {
        let expected = self.layout.input.len();
        if actual != expected {
            return Err(FftLogError::Shape { expected, actual });
        }
        Ok(())
    }

    /// Extrapolation only fills the FFT padding, so it needs an engine with pads.
    pub(crate) fn check_extrap(&self, extrap: Extrapolation) -> Result<(), FftLogError> {
        if extrap != Extrapolation::Zero && self.pads() == (0, 0) {
            return Err(FftLogError::Configuration(format!(
                "{extrap:?} extrapolation needs FFT padding; build the engine with Padding::Fold or Padding::Exact"
            )));
        }
        Ok(())
    }

    /// Weighted real FFT pipeline on an already padded signal.
    fn transform_padded(&self, mut padded: Vec<f64>, conv_only: bool) -> Result<Vec<f64>, FftLogError> {
        let layout = &self.layout;
        if !conv_only {
            for (v, w) in padded.iter_mut().zip(&layout.x_weight) {
                *v *= *w;
            }
        }

        let mut spectrum = layout.plans.forward_real(&mut padded)?;
        for (s, u) in spectrum.iter_mut().zip(&layout.transfer) {
            *s *= *u;
        }
        let mut out = layout.plans.inverse_real(&mut spectrum)?;
        out.reverse();

        if !conv_only {
            for (v, w) in out.iter_mut().zip(&layout.y_weight) {
                *v *= *w;
            }
        }
        Ok(out)
    }

    /// Transfer function over all `fft_len` bins, with the Nyquist bin projected
    /// onto its real part as the real pipeline does.
    fn full_transfer(&self) -> Vec<Complex<f64>> {
        let len = self.fft_len();
        let half = &self.layout.transfer;
        (0..len)
            .map(|m| {
                if 2 * m == len {
                    Complex::new(half[m].re, 0.0)
                } else if m < half.len() {
                    half[m]
                } else {
                    half[len - m].conj()
                }
            })
            .collect()
    }

    fn crop<T>(&self, out: Vec<T>, keep_pads: bool) -> (Vec<f64>, Vec<T>) {
        let layout = &self.layout;
        if keep_pads {
            return (layout.padded_output.values(), out);
        }
        let n = layout.input.len();
        let cropped = out.into_iter().skip(layout.pad_right).take(n).collect();
        (layout.output.values(), cropped)
    }

    /// Input abscissae; differ from the construction grid when the step was tuned.
    pub fn x(&self) -> Vec<f64> {
        self.layout.input.values()
    }

    pub fn y(&self) -> Vec<f64> {
        self.layout.output.values()
    }

    pub fn input_grid(&self) -> LogGrid {
        self.layout.input
    }

    pub fn output_grid(&self) -> LogGrid {
        self.layout.output
    }

    pub fn padded_input_grid(&self) -> LogGrid {
        self.layout.padded_input
    }

    pub fn padded_output_grid(&self) -> LogGrid {
        self.layout.padded_output
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn log_step(&self) -> f64 {
        self.layout.input.log_step()
    }

    pub fn ln_xy(&self) -> f64 {
        self.layout.lowring.ln_xy
    }

    pub fn fft_len(&self) -> usize {
        self.layout.fft_len()
    }

    /// Padding `(left, right)` around the input samples.
    pub fn pads(&self) -> (usize, usize) {
        (self.layout.pad_left, self.layout.pad_right)
    }

    pub fn lowring_status(&self) -> LowRingStatus {
        self.layout.lowring.status
    }

    pub fn is_lowring_tuned(&self) -> bool {
        self.layout.lowring.status == LowRingStatus::Tuned
    }

    /// Boundary phase ratio `r`; an integer when low-ringing tuning succeeded.
    pub fn phase_ratio(&self) -> f64 {
        self.layout.lowring.phase_ratio
    }

    /// `U_m` for `m = 0..=fft_len/2`.
    pub fn transfer_function(&self) -> &[Complex<f64>] {
        &self.layout.transfer
    }

    pub fn kernel(&self) -> &K {
        &self.kernel.kernel
    }

    pub fn params(&self) -> &FftLogParams {
        &self.params
    }
}

impl<K: MellinKernel + Sync> FftLog<K> {
    /// Applies the engine to every input; outputs share the grid `y`.
    pub fn apply_many<S>(
        &self,
        inputs: &[S],
        extrap: Extrapolation,
    ) -> Result<(Vec<f64>, Vec<Vec<f64>>), FftLogError>
    where
        S: AsRef<[f64]> + Sync,
    {
        let options = ApplyOptions::with_extrap(extrap);
        let run = |input: &S| self.apply_with(input.as_ref(), &options).map(|(_, g)| g);

        #[cfg(feature = "parallel")]
        let outputs = inputs.par_iter().map(run).collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let outputs = inputs.iter().map(run).collect::<Result<Vec<_>, _>>()?;

        Ok((self.y(), outputs))
    }
}

fn transpose(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let rows = columns.first().map_or(0, Vec::len);
    (0..rows)
        .map(|i| columns.iter().map(|col| col[i]).collect())
        .collect()
}
