use std::f64::consts::PI;

use fftlog::core::{LogGrid, interpolate_loglog};
use fftlog::engines::fftlog::{ApplyOptions, Extrapolation, FftLogParams, LowRing, Padding};
use fftlog::kernels::{MellinKernel, TophatSq};
use fftlog::transforms::{DoubleSphericalBessel, GaussVar, P2xi, SphericalBessel, TophatVar};
use num_complex::Complex;

#[test]
fn gaussian_variance_of_gaussian_spectrum() {
    // P = exp(-k²):  σ²(R) = (√π/4) (1 + R²)^{-3/2} / (2π²)
    let k = LogGrid::from_range(1e-5, 1e2, 1024).expect("k grid");
    let params = FftLogParams {
        lowring: LowRing::Offset,
        ..FftLogParams::default()
    };
    let var = GaussVar::default().build(k, params).expect("gauss var");
    let pk: Vec<f64> = var.x().iter().map(|k| (-k * k).exp()).collect();
    let (r, sigma2) = var.apply(&pk, Extrapolation::Zero).expect("apply");

    let mut checked = 0;
    for (rv, s) in r.iter().zip(&sigma2) {
        if (0.1..10.0).contains(rv) {
            let exact = PI.sqrt() / 4.0 * (1.0 + rv * rv).powf(-1.5) / (2.0 * PI * PI);
            assert!(((s - exact) / exact).abs() < 1e-6, "R={rv} got={s} exact={exact}");
            checked += 1;
        }
    }
    assert!(checked > 100);
}

#[test]
fn first_derivative_matches_closed_form() {
    // G(y) = (√π/4) exp(-y²/4) for F = exp(-x²), so G'(y) = -(y/2) G(y)
    let x = LogGrid::from_range(1e-6, 1e4, 1024).expect("grid");
    let params = FftLogParams {
        deriv: 1,
        ..FftLogParams::default()
    };
    let transform = SphericalBessel::default().build(x, params).expect("transform");
    assert_eq!(transform.prefactor().exponent, 4.0);

    let f: Vec<f64> = transform.x().iter().map(|x| (-x * x).exp()).collect();
    let (y, dg) = transform.apply(&f, Extrapolation::Zero).expect("apply");
    for (yv, d) in y.iter().zip(&dg) {
        if (0.05..5.0).contains(yv) {
            let exact = -0.5 * yv * PI.sqrt() / 4.0 * (-yv * yv / 4.0).exp();
            assert!((d - exact).abs() < 1e-6, "y={yv} got={d} exact={exact}");
        }
    }
}

#[test]
fn power_law_extrapolation_removes_edge_truncation() {
    // P = k^-1.5 gives σ²(R) = R^-1.5 M_{W²}(1.5) / (2π²)
    let k = LogGrid::from_range(1e-2, 1e2, 128).expect("k grid");
    let params = FftLogParams {
        lowring: LowRing::Offset,
        padding: Padding::Fold(2),
        ..FftLogParams::default()
    };
    let var = TophatVar::default().build(k, params).expect("tophat var");
    let pk: Vec<f64> = var.x().iter().map(|k| k.powf(-1.5)).collect();
    let amplitude = TophatSq { dim: 3 }.mellin(Complex::new(1.5, 0.0)).re / (2.0 * PI * PI);

    let (r, extrapolated) = var.apply(&pk, Extrapolation::PowerLaw).expect("power law");
    let (_, truncated) = var.apply(&pk, Extrapolation::Zero).expect("zero");
    let mut worst_truncated: f64 = 0.0;
    for ((rv, e), t) in r.iter().zip(&extrapolated).zip(&truncated) {
        let exact = amplitude * rv.powf(-1.5);
        assert!(((e - exact) / exact).abs() < 1e-10, "R={rv}");
        worst_truncated = worst_truncated.max(((t - exact) / exact).abs());
    }
    assert!(worst_truncated > 1e-2);
}

#[test]
fn sigma8_from_tabulated_spectrum() {
    let k = LogGrid::from_range(1e-5, 1e3, 1024).expect("k grid");
    let params = FftLogParams {
        lowring: LowRing::Offset,
        ..FftLogParams::default()
    };
    let var = TophatVar::default().build(k, params).expect("tophat var");
    // BBKS-like shape with a steep cutoff
    let pk: Vec<f64> = var.x().iter().map(|k| k / (1.0 + (k / 0.02).powi(4))).collect();
    let (r, sigma2) = var.apply(&pk, Extrapolation::Zero).expect("apply");
    assert!(sigma2.iter().all(|s| s.is_finite()));

    // variance decreases with smoothing scale in the well-resolved range
    let s4 = interpolate_loglog(&r, &sigma2, 4.0);
    let s8 = interpolate_loglog(&r, &sigma2, 8.0);
    let s16 = interpolate_loglog(&r, &sigma2, 16.0);
    assert!(s4 > s8 && s8 > s16 && s16 > 0.0);
}

#[test]
fn correlation_function_multipoles_have_expected_phase() {
    let k = LogGrid::from_range(1e-4, 1e2, 256).expect("k grid");
    let quadrupole = P2xi {
        l: 2,
        ..P2xi::default()
    }
    .build(k, FftLogParams::default())
    .expect("quadrupole");
    let dipole = P2xi {
        l: 1,
        ..P2xi::default()
    }
    .build(k, FftLogParams::default())
    .expect("dipole");

    let pk: Vec<f64> = quadrupole.x().iter().map(|k| k * (-k * k).exp()).collect();
    let (_, xi2) = quadrupole.apply(&pk, Extrapolation::Zero).expect("real quadrupole");
    let (_, xi2_complex) = quadrupole
        .apply_complex(&pk, &ApplyOptions::default())
        .expect("complex quadrupole");
    for (a, b) in xi2.iter().zip(&xi2_complex) {
        assert_eq!(b.im, 0.0);
        assert!((a - b.re).abs() <= 1e-15 * a.abs().max(1e-300));
    }

    assert!(dipole.apply(&pk, Extrapolation::Zero).is_err());
    let (_, xi1) = dipole.apply_complex(&pk, &ApplyOptions::default()).expect("dipole");
    assert!(xi1.iter().all(|v| v.re == 0.0));
}

#[test]
fn double_bessel_with_unit_ratio_matches_product_kernel_moment() {
    // power-law input again gives G(y) = y^-1.5 M(1.5) exactly
    let x = LogGrid::from_range(1e-3, 1e3, 128).expect("grid");
    let setup = DoubleSphericalBessel {
        alpha: 1.0,
        l1: 0,
        l2: 0,
        q: 1.5,
    };
    let transform = setup.build(x, FftLogParams::default()).expect("double bessel");
    let amplitude = transform
        .engine()
        .kernel()
        .mellin(Complex::new(1.5, 0.0))
        .re;
    // ∫ j0(t)² t^{1/2} dt
    assert!(amplitude.is_finite() && amplitude > 0.0);

    let f: Vec<f64> = transform.x().iter().map(|x| x.powf(-1.5)).collect();
    let (y, g) = transform.apply(&f, Extrapolation::Zero).expect("apply");
    for (yv, gv) in y.iter().zip(&g) {
        let exact = amplitude * yv.powf(-1.5);
        assert!(((gv - exact) / exact).abs() < 1e-10, "y={yv}");
    }

    let bad = DoubleSphericalBessel {
        alpha: -1.0,
        ..setup
    };
    assert!(bad.build(x, FftLogParams::default()).is_err());
}

#[test]
fn double_bessel_of_gaussian_matches_closed_form_off_unit_ratio() {
    // j0(u) j0(v) = [cos(u - v) - cos(u + v)] / (2uv), so for F = exp(-x²)
    // G(y) = √π / (4αy²) [exp(-(1-α)²y²/4) - exp(-(1+α)²y²/4)]
    let x = LogGrid::from_range(1e-6, 1e4, 1024).expect("grid");
    for alpha in [0.5, 2.0] {
        let transform = DoubleSphericalBessel {
            alpha,
            ..DoubleSphericalBessel::default()
        }
        .build(x, FftLogParams::default())
        .expect("double bessel");
        let f: Vec<f64> = transform.x().iter().map(|x| (-x * x).exp()).collect();
        let (y, g) = transform.apply(&f, Extrapolation::Zero).expect("apply");

        let mut checked = 0;
        for (yv, gv) in y.iter().zip(&g) {
            if (0.05..5.0).contains(yv) {
                let y2 = yv * yv;
                let exact = PI.sqrt() / (4.0 * alpha * y2)
                    * ((-(1.0 - alpha).powi(2) * y2 / 4.0).exp() - (-(1.0 + alpha).powi(2) * y2 / 4.0).exp());
                assert!((gv - exact).abs() < 1e-8, "alpha={alpha} y={yv} got={gv} exact={exact}");
                checked += 1;
            }
        }
        assert!(checked > 100);
    }
}

#[test]
fn double_bessel_builds_on_common_grids() {
    for (alpha, n, lo, hi) in [(0.9, 256, 1e-3, 1e3), (2.0, 256, 1e-3, 1e3), (0.5, 512, 1e-4, 1e4)] {
        let x = LogGrid::from_range(lo, hi, n).expect("grid");
        let transform = DoubleSphericalBessel {
            alpha,
            ..DoubleSphericalBessel::default()
        }
        .build(x, FftLogParams::default())
        .expect("double bessel");
        assert!(
            transform
                .engine()
                .transfer_function()
                .iter()
                .all(|u| u.re.is_finite() && u.im.is_finite()),
            "alpha={alpha} n={n}"
        );
    }
}
