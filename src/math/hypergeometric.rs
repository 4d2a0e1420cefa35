use num_complex::Complex;

use super::gamma::ln_gamma;

const SERIES_TOL: f64 = 1e-16;
const MAX_TERMS: usize = 200_000;
/// Largest ratio between the biggest series term and the sum accepted from the
/// plain series before switching to continuation along the real axis.
const MAX_CANCELLATION: f64 = 1e4;
const MAX_TAYLOR_TERMS: usize = 1_000;
const MAX_STEPS: usize = 1_000_000;

/// Gauss hypergeometric function `₂F₁(a, b; c; x)` for real `0 <= x <= 1`.
///
/// Uses Gauss' summation theorem at `x = 1` (which needs `Re(c - a - b) > 0`) and
/// the defining series for `x < 1` while its terms stay within a few digits of the
/// sum. Large `|a|`, `|b|` make the series cancel catastrophically; those values
/// are obtained by summing the series only up to `x0 ~ 1/(4 max(|a|, |b|)²)` and
/// integrating the hypergeometric equation
///
/// ```text
/// x(1-x) w'' + [c - (a+b+1)x] w' - ab w = 0
/// ```
///
/// from there to `x` with local Taylor expansions. Returns `None` outside the
/// domain or when neither route converges.
pub fn hyp2f1(a: Complex<f64>, b: Complex<f64>, c: Complex<f64>, x: f64) -> Option<Complex<f64>> {
    if !(0.0..=1.0).contains(&x) {
        return None;
    }
    if x == 1.0 {
        let s = c - a - b;
        if s.re <= 0.0 {
            return None;
        }
        let value = (ln_gamma(c) + ln_gamma(s) - ln_gamma(c - a) - ln_gamma(c - b)).exp();
        return value.is_finite().then_some(value);
    }
    if x == 0.0 {
        return Some(Complex::new(1.0, 0.0));
    }

    if let Some(partial) = series(a, b, c, x) {
        if partial.largest <= MAX_CANCELLATION * partial.sum.norm() {
            return Some(partial.sum);
        }
    }
    continuation(a, b, c, x)
}

struct Partial {
    sum: Complex<f64>,
    derivative: Complex<f64>,
    largest: f64,
}

/// Defining series with its termwise derivative, for `0 < x < 1`.
fn series(a: Complex<f64>, b: Complex<f64>, c: Complex<f64>, x: f64) -> Option<Partial> {
    let mut term = Complex::new(1.0, 0.0);
    let mut sum = term;
    let mut derivative = Complex::new(0.0, 0.0);
    let mut largest = 1.0_f64;
    for k in 0..MAX_TERMS {
        let kf = k as f64;
        let ratio = (a + kf) * (b + kf) / ((c + kf) * (kf + 1.0)) * x;
        term *= ratio;
        sum += term;
        derivative += term * ((kf + 1.0) / x);
        largest = largest.max(term.norm());
        if !(sum.is_finite() && derivative.is_finite()) {
            return None;
        }
        let decaying = ratio.norm() < 1.0 || term.norm() == 0.0;
        if decaying && term.norm() <= SERIES_TOL * sum.norm() {
            return Some(Partial {
                sum,
                derivative,
                largest,
            });
        }
    }
    None
}

/// Integrates the hypergeometric equation from a small `x0`, where the series is
/// free of cancellation, up to `x`.
fn continuation(a: Complex<f64>, b: Complex<f64>, c: Complex<f64>, x: f64) -> Option<Complex<f64>> {
    let scale = a.norm().max(b.norm()).max(1.0);
    let x0 = x.min(0.25 / (scale * scale));
    let start = series(a, b, c, x0)?;
    let (mut w, mut dw) = (start.sum, start.derivative);

    let mut xc = x0;
    for _ in 0..MAX_STEPS {
        if x - xc <= 1e-15 * x {
            return Some(w);
        }
        // half the distance to the nearest singular point, and about one local
        // oscillation of the solution
        let radius = xc.min(1.0 - xc);
        let sqrt_xc = xc.sqrt();
        let h = (x - xc)
            .min(0.5 * radius)
            .min(sqrt_xc * (1.0 - sqrt_xc) / scale);
        (w, dw) = taylor_step(a, b, c, xc, w, dw, h)?;
        xc += h;
    }
    None
}

/// Advances `(w, w')` from `x0` to `x0 + h` along the local Taylor series.
///
/// With `s_n = w_n hⁿ` the coefficients follow
/// `p0 (n+2)(n+1) s_{n+2} = -[(p1 n + q0)(n+1) h s_{n+1} + (p2 n(n-1) + q1 n - ab) h² s_n]`
/// where `x(1-x) = p0 + p1 u + p2 u²` and `c - (a+b+1)x = q0 + q1 u` about `x0`.
fn taylor_step(
    a: Complex<f64>,
    b: Complex<f64>,
    c: Complex<f64>,
    x0: f64,
    w: Complex<f64>,
    dw: Complex<f64>,
    h: f64,
) -> Option<(Complex<f64>, Complex<f64>)> {
    if !(h > 0.0) {
        return None;
    }
    let p0 = x0 * (1.0 - x0);
    let p1 = 1.0 - 2.0 * x0;
    let p2 = -1.0;
    let q1 = -(a + b + 1.0);
    let q0 = c + q1 * x0;
    let r = -(a * b);

    let (mut s0, mut s1) = (w, dw * h);
    let mut value = s0 + s1;
    let mut slope = s1;
    for n in 0..MAX_TAYLOR_TERMS {
        let nf = n as f64;
        let s2 = -((q0 + p1 * nf) * (nf + 1.0) * h * s1 + (r + q1 * nf + p2 * nf * (nf - 1.0)) * h * h * s0)
            / (p0 * (nf + 2.0) * (nf + 1.0));
        value += s2;
        slope += s2 * (nf + 2.0);
        if !(value.is_finite() && slope.is_finite()) {
            return None;
        }
        let tol = SERIES_TOL * (value.norm() + slope.norm());
        if s2.norm() <= tol && s1.norm() <= tol {
            return Some((value, slope / h));
        }
        s0 = s1;
        s1 = s2;
    }
    None
}
