// Lanczos approximation of the gamma function, evaluated in log form on the
// complex plane. Coefficients from statrs (MIT license), based on:
// "An Analysis of the Lanczos Gamma Approximation", Glendon Ralph Pugh, 2004 p. 116

use std::f64::consts::PI;

use num_complex::Complex;

const GAMMA_R: f64 = 10.900511;

const GAMMA_DK: &[f64] = &[
    2.48574089138753565546e-5,
    1.05142378581721974210,
    -3.45687097222016235469,
    4.51227709466894823700,
    -2.98285225323576655721,
    1.05639711577126713077,
    -1.95428773191645869583e-1,
    1.70970543404441224307e-2,
    -5.71926117404305781283e-4,
    4.63399473359905636708e-6,
    -2.71994908488607703910e-9,
];

const LN_TWO_SQRT_E_OVER_PI: f64 = 0.620_782_237_635_245_2;

/// Imaginary part beyond which `sin(pi z)` is evaluated through its exponential form.
const SIN_ASYMPTOTIC_IM: f64 = 1.0;

/// `ln Γ(z)` on the complex plane.
///
/// The imaginary part is not reduced to the principal branch; only `exp` of the result
/// (or of differences of results) is meaningful. Non-positive integers return `+∞`.
pub fn ln_gamma(z: Complex<f64>) -> Complex<f64> {
    if !(z.re.is_finite() && z.im.is_finite()) {
        return Complex::new(f64::NAN, f64::NAN);
    }
    if z.im == 0.0 && z.re <= 0.0 && z.re == z.re.round() {
        return Complex::new(f64::INFINITY, 0.0);
    }

    if z.re < 0.5 {
        // reflection: Γ(z) Γ(1-z) = π / sin(πz)
        let one = Complex::new(1.0, 0.0);
        return Complex::new(PI.ln(), 0.0) - ln_sin_pi(z) - ln_gamma(one - z);
    }

    let s = GAMMA_DK
        .iter()
        .enumerate()
        .skip(1)
        .fold(Complex::new(GAMMA_DK[0], 0.0), |s, (i, &dk)| {
            s + dk / (z + (i as f64 - 1.0))
        });

    let shifted = z - 0.5;
    s.ln() + LN_TWO_SQRT_E_OVER_PI + shifted * ((shifted + GAMMA_R).ln() - 1.0)
}

/// `Γ(a) / Γ(b)` without intermediate overflow.
pub fn gamma_ratio(a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
    let den = ln_gamma(b);
    if den.re == f64::INFINITY {
        return Complex::new(0.0, 0.0);
    }
    (ln_gamma(a) - den).exp()
}

/// `ln sin(πz)`, stable for large `|Im z|` where `sin(πz)` itself overflows.
pub fn ln_sin_pi(z: Complex<f64>) -> Complex<f64> {
    if z.im.abs() < SIN_ASYMPTOTIC_IM {
        return (z * PI).sin().ln();
    }
    if z.im < 0.0 {
        return ln_sin_pi(z.conj()).conj();
    }

    // sin(w) = (i/2) e^{-iw} (1 - e^{2iw}), |e^{2iw}| = e^{-2π Im z} < 1
    let i = Complex::new(0.0, 1.0);
    let w = z * PI;
    let one = Complex::new(1.0, 0.0);
    -i * w + (one - (i * w * 2.0).exp()).ln() + Complex::new(0.5_f64.ln(), 0.5 * PI)
}
