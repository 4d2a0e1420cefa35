//! FFTLog transform engine.
//!
//! Implements the Hamilton (2000) algorithm: the input, weighted by `x^{-q}`, is
//! expanded in discrete Mellin frequencies by a real FFT, multiplied by the
//! kernel's Mellin transform on the line `Re z = q`, and brought back to the
//! reflected output grid by the inverse FFT.
//!
//! Primary API surface: [`FftLog`], its [`FftLogParams`] and the per-call [`ApplyOptions`].
//!
//! Numerical considerations: the discrete transform treats `ln x` as periodic.
//! Choose `q` so that `x^{-q} F(x)` is small at both ends, pad with [`Padding`]
//! and extrapolate with [`Extrapolation`] when it is not, and enable [`LowRing`]
//! to suppress boundary ringing.

mod fft_core;

pub mod engine;
pub mod extrap;
pub mod lowring;

pub use engine::{ApplyOptions, FftLog, FftLogParams, MIN_GRID_LEN, Padding};
pub use extrap::{DEFAULT_WINDOW, EdgeFit, Extrapolation, fit_power_law, pad};
pub use fft_core::{clear_plan_cache, plan_cache_len};
pub use lowring::{
    DEFAULT_MAX_REL_CHANGE, LowRing, LowRingSolution, LowRingStatus, boundary_phase_ratio,
    lowring_ln_xy, tune_log_step,
};
