use serde::{Deserialize, Serialize};

/// Number of edge samples used by the power-law fit unless configured otherwise.
pub const DEFAULT_WINDOW: usize = 2;

/// How the input is continued into the padding region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extrapolation {
    #[default]
    Zero,
    /// Repeat the edge sample.
    Constant,
    /// Continue a power law fitted to the edge samples.
    PowerLaw,
}

/// Least-squares line `ln f(i) = ln_amplitude + slope * i` through edge samples.
///
/// `i` counts grid points from the first sample of the fitted window, so on a grid
/// with log-step `Δ` the power-law exponent is `slope / Δ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFit {
    pub ln_amplitude: f64,
    pub slope: f64,
}

impl EdgeFit {
    pub fn value(&self, i: f64) -> f64 {
        (self.ln_amplitude + self.slope * i).exp()
    }

    pub fn exponent(&self, log_step: f64) -> f64 {
        self.slope / log_step
    }
}

/// Fits a power law to consecutive log-spaced samples.
///
/// Returns `None` for fewer than two samples or any non-positive or non-finite value.
pub fn fit_power_law(samples: &[f64]) -> Option<EdgeFit> {
    if samples.len() < 2 || samples.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        return None;
    }

    let n = samples.len() as f64;
    let mean_i = 0.5 * (n - 1.0);
    let mean_ln = samples.iter().map(|v| v.ln()).sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, v) in samples.iter().enumerate() {
        let di = i as f64 - mean_i;
        sxy += di * (v.ln() - mean_ln);
        sxx += di * di;
    }
    let slope = sxy / sxx;
    Some(EdgeFit {
        ln_amplitude: mean_ln - slope * mean_i,
        slope,
    })
}

/// Pads `input` with `left` samples below and `right` samples above.
///
/// A power-law edge that cannot be fitted, or whose continuation overflows, is
/// padded with zeros instead.
pub fn pad(input: &[f64], left: usize, right: usize, mode: Extrapolation, window: usize) -> Vec<f64> {
    let n = input.len();
    let mut out = Vec::with_capacity(n + left + right);
    if n == 0 {
        out.resize(left + right, 0.0);
        return out;
    }

    match mode {
        Extrapolation::Zero => {
            out.resize(left, 0.0);
            out.extend_from_slice(input);
            out.resize(n + left + right, 0.0);
        }
        Extrapolation::Constant => {
            out.resize(left, input[0]);
            out.extend_from_slice(input);
            out.resize(n + left + right, input[n - 1]);
        }
        Extrapolation::PowerLaw => {
            let w = window.min(n);
            let low = power_law_edge(&input[..w], left, |fit, k| fit.value(-(k as f64)), "lower");
            out.extend(low.into_iter().rev());
            out.extend_from_slice(input);
            let last = w.saturating_sub(1) as f64;
            let high = power_law_edge(&input[n - w..], right, |fit, k| fit.value(last + k as f64), "upper");
            out.extend(high);
        }
    }
    out
}

/// `count` continuation samples, nearest to the edge first.
fn power_law_edge(
    window: &[f64],
    count: usize,
    sample: impl Fn(&EdgeFit, usize) -> f64,
    edge: &str,
) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let Some(fit) = fit_power_law(window) else {
        tracing::debug!(
            "{} edge window of {} samples admits no power-law fit; padding with zeros",
            edge,
            window.len()
        );
        return vec![0.0; count];
    };

    let values: Vec<f64> = (1..=count).map(|k| sample(&fit, k)).collect();
    if values.iter().any(|v| !v.is_finite()) {
        tracing::debug!(
            "{} edge power law with slope {} overflows; padding with zeros",
            edge,
            fit.slope
        );
        return vec![0.0; count];
    }
    values
}
