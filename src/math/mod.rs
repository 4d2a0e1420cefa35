//! Special functions and scalar root finding used by the kernels and the tuner.

pub mod gamma;
pub mod hypergeometric;

pub use gamma::{gamma_ratio, ln_gamma, ln_sin_pi};
pub use hypergeometric::hyp2f1;

#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    NonConvergence,
    NoBracket,
    NonFinite,
    InvalidInput(&'static str),
}

/// Scans outwards from `x0` for the nearest sign change of `f`.
///
/// Steps are `rel_step * x0` wide; the scan alternates above and below `x0` and
/// stops after `max_steps` steps on each side. Returns an interval `(lo, hi)`
/// with `f(lo) * f(hi) <= 0`.
pub fn bracket_nearest<F>(
    f: F,
    x0: f64,
    rel_step: f64,
    max_steps: usize,
) -> Result<(f64, f64), MathError>
where
    F: Fn(f64) -> f64,
{
    if !(x0.is_finite() && x0 > 0.0) {
        return Err(MathError::InvalidInput("x0 must be finite and positive"));
    }
    if !(rel_step > 0.0 && rel_step < 1.0) {
        return Err(MathError::InvalidInput("rel_step must be in (0, 1)"));
    }

    let f0 = f(x0);
    if !f0.is_finite() {
        return Err(MathError::NonFinite);
    }
    if f0 == 0.0 {
        return Ok((x0, x0));
    }

    let mut up = (x0, f0);
    let mut down = (x0, f0);
    for k in 1..=max_steps {
        let x_up = x0 * (1.0 + k as f64 * rel_step);
        let f_up = f(x_up);
        if !f_up.is_finite() {
            return Err(MathError::NonFinite);
        }
        if up.1 * f_up <= 0.0 {
            return Ok((up.0, x_up));
        }
        up = (x_up, f_up);

        let x_down = x0 * (1.0 - k as f64 * rel_step);
        if x_down <= 0.0 {
            continue;
        }
        let f_down = f(x_down);
        if !f_down.is_finite() {
            return Err(MathError::NonFinite);
        }
        if down.1 * f_down <= 0.0 {
            return Ok((x_down, down.0));
        }
        down = (x_down, f_down);
    }

    Err(MathError::NoBracket)
}

/// Bisection on a bracketing interval until it is narrower than `rel_tol * |x|`.
pub fn bisect<F>(f: F, lo: f64, hi: f64, rel_tol: f64, max_iter: usize) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    if rel_tol <= 0.0 {
        return Err(MathError::InvalidInput("rel_tol must be positive"));
    }
    if max_iter == 0 {
        return Err(MathError::InvalidInput("max_iter must be > 0"));
    }

    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !(f_lo.is_finite() && f_hi.is_finite()) {
        return Err(MathError::NonFinite);
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo * f_hi > 0.0 {
        return Err(MathError::NoBracket);
    }

    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= rel_tol * mid.abs() {
            return Ok(mid);
        }
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return Err(MathError::NonFinite);
        }
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    Err(MathError::NonConvergence)
}
