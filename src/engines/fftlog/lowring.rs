//! Low-ringing condition for the discrete transform.
//!
//! The DFT treats the log-space signal as periodic. Ringing at the ends of the
//! output is smallest when the transfer function is real at the boundary
//! frequency `ω = π/Δ`, i.e. when
//!
//! ```text
//! r(Δ, ln_xy) = [arg M(q + iπ/Δ) - π ln_xy / Δ] / π
//! ```
//!
//! is an integer. Either `ln_xy` (closed form) or `Δ` (root search) is adjusted.

use std::f64::consts::PI;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::kernels::MellinKernel;
use crate::math::{MathError, bisect, bracket_nearest};

pub const DEFAULT_MAX_REL_CHANGE: f64 = 0.1;
/// Relative step of the outward scan for a sign change.
pub const SCAN_REL_STEP: f64 = 1e-4;
pub const BISECT_REL_TOL: f64 = 1e-15;
pub const BISECT_MAX_ITER: usize = 200;

/// Low-ringing adjustment applied at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LowRing {
    /// Use the nominal step and `ln_xy` as given.
    #[default]
    Off,
    /// Keep the step; shift `ln_xy` by less than half a step.
    Offset,
    /// Keep `ln_xy`; search the nearest step within `max_rel_change` of the nominal one.
    Step { max_rel_change: f64 },
}

impl LowRing {
    pub fn step() -> Self {
        Self::Step {
            max_rel_change: DEFAULT_MAX_REL_CHANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LowRingStatus {
    /// Tuning was not requested.
    Disabled,
    /// The boundary phase ratio is an integer.
    Tuned,
    /// Tuning failed; the nominal grid is used.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowRingSolution {
    pub log_step: f64,
    pub ln_xy: f64,
    /// `r` at the returned step and `ln_xy`.
    pub phase_ratio: f64,
    pub status: LowRingStatus,
}

fn boundary_value<K: MellinKernel + ?Sized>(kernel: &K, q: f64, log_step: f64, ln_xy: f64) -> Complex<f64> {
    let w = PI / log_step;
    kernel.mellin(Complex::new(q, w)) * Complex::new(0.0, -w * ln_xy).exp()
}

/// Phase ratio `r(Δ, ln_xy)` of the transfer function at the boundary frequency.
pub fn boundary_phase_ratio<K: MellinKernel + ?Sized>(
    kernel: &K,
    q: f64,
    log_step: f64,
    ln_xy: f64,
) -> f64 {
    let w = PI / log_step;
    (kernel.mellin(Complex::new(q, w)).arg() - w * ln_xy) / PI
}

/// `ln_xy` nearest to `ln_xy` that makes the boundary phase ratio an integer.
///
/// Returns `None` when the kernel is not finite at the boundary frequency.
pub fn lowring_ln_xy<K: MellinKernel + ?Sized>(
    kernel: &K,
    q: f64,
    log_step: f64,
    ln_xy: f64,
) -> Option<f64> {
    let r = boundary_phase_ratio(kernel, q, log_step, ln_xy);
    r.is_finite().then(|| ln_xy + log_step * (r - r.round()))
}

/// Nearest step to `log_step` at which the boundary phase ratio is an integer.
///
/// The root function is `sin(π r(Δ))`, which is continuous in `Δ` and vanishes
/// exactly at integer ratios. On failure the nominal step is returned with
/// [`LowRingStatus::Fallback`].
pub fn tune_log_step<K: MellinKernel + ?Sized>(
    kernel: &K,
    q: f64,
    log_step: f64,
    ln_xy: f64,
    max_rel_change: f64,
) -> LowRingSolution {
    let sin_ratio = |step: f64| {
        let u = boundary_value(kernel, q, step, ln_xy);
        u.im / u.norm()
    };

    let max_steps = (max_rel_change / SCAN_REL_STEP).floor() as usize;
    let root = bracket_nearest(sin_ratio, log_step, SCAN_REL_STEP, max_steps)
        .and_then(|(lo, hi)| bisect(sin_ratio, lo, hi, BISECT_REL_TOL, BISECT_MAX_ITER));

    match root {
        Ok(tuned) => LowRingSolution {
            log_step: tuned,
            ln_xy,
            phase_ratio: boundary_phase_ratio(kernel, q, tuned, ln_xy),
            status: LowRingStatus::Tuned,
        },
        Err(err) => {
            let reason = match err {
                MathError::NoBracket => "no integer phase ratio within the allowed change",
                MathError::NonFinite => "kernel not finite at the boundary frequency",
                MathError::NonConvergence => "bisection did not converge",
                MathError::InvalidInput(msg) => msg,
            };
            tracing::warn!(
                "low-ringing step search failed ({}); keeping log step {:e}",
                reason,
                log_step
            );
            LowRingSolution {
                log_step,
                ln_xy,
                phase_ratio: boundary_phase_ratio(kernel, q, log_step, ln_xy),
                status: LowRingStatus::Fallback,
            }
        }
    }
}

/// Applies `mode` to the nominal `(log_step, ln_xy)`.
pub fn solve<K: MellinKernel + ?Sized>(
    kernel: &K,
    q: f64,
    log_step: f64,
    ln_xy: f64,
    mode: LowRing,
) -> LowRingSolution {
    match mode {
        LowRing::Off => LowRingSolution {
            log_step,
            ln_xy,
            phase_ratio: boundary_phase_ratio(kernel, q, log_step, ln_xy),
            status: LowRingStatus::Disabled,
        },
        LowRing::Offset => match lowring_ln_xy(kernel, q, log_step, ln_xy) {
            Some(tuned) => LowRingSolution {
                log_step,
                ln_xy: tuned,
                phase_ratio: boundary_phase_ratio(kernel, q, log_step, tuned),
                status: LowRingStatus::Tuned,
            },
            None => {
                tracing::warn!(
                    "low-ringing offset undefined at log step {:e}; keeping ln_xy {}",
                    log_step,
                    ln_xy
                );
                LowRingSolution {
                    log_step,
                    ln_xy,
                    phase_ratio: f64::NAN,
                    status: LowRingStatus::Fallback,
                }
            }
        },
        LowRing::Step { max_rel_change } => {
            tune_log_step(kernel, q, log_step, ln_xy, max_rel_change)
        }
    }
}
