use serde::{Deserialize, Serialize};

use super::FftLogError;

/// Relative tolerance on the log-steps of tabulated abscissae.
const GEOMETRIC_RTOL: f64 = 1e-8;

/// Logarithmically spaced abscissae `x[i] = start * exp(i * log_step)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogGrid {
    start: f64,
    log_step: f64,
    len: usize,
}

impl LogGrid {
    pub fn new(start: f64, log_step: f64, len: usize) -> Result<Self, FftLogError> {
        let grid = Self {
            start,
            log_step,
            len,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Grid of `len` points spanning `[x_min, x_max]` inclusive.
    pub fn from_range(x_min: f64, x_max: f64, len: usize) -> Result<Self, FftLogError> {
        if len < 2 {
            return Err(FftLogError::Configuration(
                "log grid requires at least 2 points".to_string(),
            ));
        }
        if !(x_min.is_finite() && x_max.is_finite() && x_min > 0.0 && x_max > x_min) {
            return Err(FftLogError::Configuration(
                "log grid requires 0 < x_min < x_max".to_string(),
            ));
        }
        let log_step = (x_max / x_min).ln() / (len - 1) as f64;
        Self::new(x_min, log_step, len)
    }

    /// Recovers the grid parameters from tabulated abscissae.
    ///
    /// The samples must be a geometric progression; the step is taken from the end points.
    pub fn from_samples(x: &[f64]) -> Result<Self, FftLogError> {
        if x.len() < 2 {
            return Err(FftLogError::Configuration(
                "log grid requires at least 2 samples".to_string(),
            ));
        }
        if x.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(FftLogError::Configuration(
                "log grid samples must be finite and positive".to_string(),
            ));
        }

        let n = x.len();
        let log_step = (x[n - 1] / x[0]).ln() / (n - 1) as f64;
        let tol = GEOMETRIC_RTOL * log_step.abs().max(f64::MIN_POSITIVE);
        if x
            .windows(2)
            .any(|w| ((w[1] / w[0]).ln() - log_step).abs() > tol)
        {
            return Err(FftLogError::Configuration(
                "samples are not logarithmically spaced".to_string(),
            ));
        }
        Self::new(x[0], log_step, n)
    }

    pub fn validate(&self) -> Result<(), FftLogError> {
        if !self.start.is_finite() || self.start <= 0.0 {
            return Err(FftLogError::Configuration(
                "log grid start must be finite and > 0".to_string(),
            ));
        }
        if !self.log_step.is_finite() || self.log_step <= 0.0 {
            return Err(FftLogError::Configuration(
                "log grid step must be finite and > 0".to_string(),
            ));
        }
        if self.len < 2 {
            return Err(FftLogError::Configuration(
                "log grid requires at least 2 points".to_string(),
            ));
        }
        Ok(())
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn log_step(&self) -> f64 {
        self.log_step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ln_start(&self) -> f64 {
        self.start.ln()
    }

    pub fn ln_end(&self) -> f64 {
        self.ln_start() + (self.len - 1) as f64 * self.log_step
    }

    pub fn end(&self) -> f64 {
        self.ln_end().exp()
    }

    /// Constant ratio `x[i+1] / x[i]`.
    pub fn ratio(&self) -> f64 {
        self.log_step.exp()
    }

    pub fn value(&self, i: usize) -> f64 {
        (self.ln_start() + i as f64 * self.log_step).exp()
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.value(i)).collect()
    }

    /// `x[i]^p`, evaluated in log space.
    pub fn powers(&self, p: f64) -> Vec<f64> {
        let ln_start = self.ln_start();
        (0..self.len)
            .map(|i| (p * (ln_start + i as f64 * self.log_step)).exp())
            .collect()
    }

    /// Same step, `left` extra points below and `right` above.
    pub fn extend(&self, left: usize, right: usize) -> Self {
        Self {
            start: (self.ln_start() - left as f64 * self.log_step).exp(),
            log_step: self.log_step,
            len: self.len + left + right,
        }
    }

    /// Sub-grid of `len` points starting at index `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            start: self.value(offset),
            log_step: self.log_step,
            len,
        }
    }

    /// Reflected grid `y[k] = exp(ln_xy) / x[len - 1 - k]`.
    pub fn reflect(&self, ln_xy: f64) -> Self {
        Self {
            start: (ln_xy - self.ln_end()).exp(),
            log_step: self.log_step,
            len: self.len,
        }
    }

    /// Same geometric centre and length with a new step.
    pub fn with_log_step(&self, log_step: f64) -> Self {
        let ln_center = 0.5 * (self.ln_start() + self.ln_end());
        Self {
            start: (ln_center - 0.5 * (self.len - 1) as f64 * log_step).exp(),
            log_step,
            len: self.len,
        }
    }
}

/// Interpolates tabulated `(x, f)` at `xq`, linearly in `ln x` and `ln f`.
///
/// Falls back to linear in `f` when a bracketing value is not positive, and clamps
/// outside the table. A NaN query gives NaN.
pub fn interpolate_loglog(x: &[f64], f: &[f64], xq: f64) -> f64 {
    let n = x.len().min(f.len());
    if n == 0 {
        return 0.0;
    }
    if xq.is_nan() {
        return f64::NAN;
    }
    if xq <= x[0] || n == 1 {
        return f[0];
    }
    if xq >= x[n - 1] {
        return f[n - 1];
    }

    let hi = x[..n].partition_point(|grid_x| *grid_x < xq).clamp(1, n - 1);
    let lo = hi - 1;
    let w = (xq / x[lo]).ln() / (x[hi] / x[lo]).ln();
    if f[lo] > 0.0 && f[hi] > 0.0 {
        (f[lo].ln() + w * (f[hi] / f[lo]).ln()).exp()
    } else {
        f[lo] + w * (f[hi] - f[lo])
    }
}
