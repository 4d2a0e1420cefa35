use fftlog::core::{FftLogError, LogGrid};
use fftlog::engines::fftlog::{ApplyOptions, Extrapolation, FftLog, FftLogParams, LowRing, Padding};
use fftlog::kernels::{MellinKernel, SphericalBesselJ};
use fftlog::transforms::{Hankel, P2xi, Xi2P};
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn offset_params() -> FftLogParams {
    FftLogParams {
        lowring: LowRing::Offset,
        ..FftLogParams::default()
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |m, v| m.max(v.abs()))
}

#[test]
fn power_spectrum_round_trips_through_correlation_function() {
    let k = LogGrid::from_range(1e-4, 1e3, 256).expect("k grid");
    let p2xi = P2xi::default().build(k, offset_params()).expect("p2xi");
    let pk: Vec<f64> = p2xi
        .x()
        .iter()
        .map(|k| k / (1.0 + (k / 0.02).powi(2)).powf(1.5))
        .collect();
    let (r, xi) = p2xi.apply(&pk, Extrapolation::Zero).expect("forward");

    let r_grid = p2xi.engine().output_grid();
    let xi2p = Xi2P::default().build(r_grid, offset_params()).expect("xi2p");
    assert_eq!(xi2p.x().len(), r.len());
    let (k_back, pk_back) = xi2p.apply(&xi, Extrapolation::Zero).expect("backward");

    let scale = max_abs(&pk);
    for ((kb, ka), (pb, pa)) in k_back.iter().zip(p2xi.x()).zip(pk_back.iter().zip(&pk)) {
        assert!(((kb - ka) / ka).abs() < 1e-10, "k grid drifted: {kb} vs {ka}");
        assert!((pb - pa).abs() < 1e-10 * scale, "k={ka} P={pa} back={pb}");
    }
}

#[test]
fn hankel_transform_is_self_inverse() {
    let x = LogGrid::from_range(1e-3, 1e3, 128).expect("grid");
    let forward = Hankel::default().build(x, offset_params()).expect("forward");
    let f: Vec<f64> = forward.x().iter().map(|x| x / (1.0 + x * x).powi(2)).collect();
    let (_, g) = forward.apply(&f, Extrapolation::Zero).expect("forward apply");

    let backward = Hankel::default()
        .build(forward.engine().output_grid(), offset_params())
        .expect("backward");
    let (_, f_back) = backward.apply(&g, Extrapolation::Zero).expect("backward apply");

    let scale = max_abs(&f);
    for (a, b) in f.iter().zip(&f_back) {
        assert!((a - b).abs() < 1e-10 * scale, "{a} vs {b}");
    }
}

#[test]
fn inverse_engine_undoes_forward_engine() {
    let grid = LogGrid::from_range(1e-2, 1e2, 64).expect("grid");
    let engine = FftLog::new(grid, SphericalBesselJ { l: 1 }, 1.2, offset_params()).expect("engine");
    assert!(engine.is_lowring_tuned());

    let mut rng = StdRng::seed_from_u64(42);
    let input: Vec<f64> = (0..64).map(|_| rng.random::<f64>() - 0.5).collect();
    let (y, g) = engine.apply(&input, Extrapolation::Zero).expect("forward");

    let inverse = engine.inverse().expect("inverse engine");
    assert_eq!(inverse.fft_len(), engine.fft_len());
    assert_eq!(inverse.q(), -1.2);
    for (a, b) in inverse.x().iter().zip(&y) {
        assert!(((a - b) / b).abs() < 1e-12);
    }

    let (x_back, input_back) = inverse.apply(&g, Extrapolation::Zero).expect("inverse");
    for (a, b) in x_back.iter().zip(engine.x()) {
        assert!(((a - b) / b).abs() < 1e-10);
    }
    for (a, b) in input.iter().zip(&input_back) {
        assert!((a - b).abs() < 1e-10, "{a} vs {b}");
    }
}

#[test]
fn output_grid_reflects_input_grid() {
    let grid = LogGrid::from_range(1e-3, 1e4, 100).expect("grid");
    for padding in [Padding::None, Padding::Fold(2), Padding::Exact(157)] {
        let params = FftLogParams {
            lowring: LowRing::Offset,
            ln_xy: 0.7,
            padding,
            ..FftLogParams::default()
        };
        let engine = FftLog::new(grid, SphericalBesselJ { l: 2 }, 1.0, params).expect("engine");
        let x = engine.x();
        let y = engine.y();
        let n = x.len();
        let expected = engine.ln_xy().exp();
        for k in 0..n {
            let product = x[n - 1 - k] * y[k];
            assert!(((product - expected) / expected).abs() < 1e-10, "{padding:?} k={k}");
        }
        assert!((engine.ln_xy() - 0.7).abs() <= 0.5 * engine.log_step() + 1e-15);

        let padded_x = engine.padded_input_grid().values();
        let padded_y = engine.padded_output_grid().values();
        let m = padded_x.len();
        for k in [0, m / 2, m - 1] {
            let product = padded_x[m - 1 - k] * padded_y[k];
            assert!(((product - expected) / expected).abs() < 1e-10);
        }
    }
}

#[test]
fn transform_is_linear() {
    let grid = LogGrid::from_range(1e-3, 1e3, 96).expect("grid");
    let params = FftLogParams {
        padding: Padding::Fold(2),
        ..FftLogParams::default()
    };
    let engine = FftLog::new(grid, SphericalBesselJ { l: 0 }, 1.5, params).expect("engine");

    let mut rng = StdRng::seed_from_u64(7);
    let a: Vec<f64> = (0..96).map(|_| rng.random::<f64>()).collect();
    let b: Vec<f64> = (0..96).map(|_| rng.random::<f64>()).collect();
    let (alpha, beta) = (2.5, -0.75);
    let combined: Vec<f64> = a.iter().zip(&b).map(|(u, v)| alpha * u + beta * v).collect();

    let (_, ga) = engine.apply(&a, Extrapolation::Zero).expect("a");
    let (_, gb) = engine.apply(&b, Extrapolation::Zero).expect("b");
    let (_, gc) = engine.apply(&combined, Extrapolation::Zero).expect("combined");
    let scale = max_abs(&ga).max(max_abs(&gb));
    for i in 0..96 {
        let expected = alpha * ga[i] + beta * gb[i];
        assert!((gc[i] - expected).abs() < 1e-12 * scale, "i={i}");
    }
}

#[test]
fn power_law_input_has_closed_form_output() {
    // ∫ x^{1.5} j0(xy) dx/x = y^{-1.5} M(1.5) and M(1.5) = sqrt(π/2)
    let grid = LogGrid::from_range(1e-4, 1e4, 256).expect("grid");
    let kernel = SphericalBesselJ { l: 0 };
    let amplitude = kernel.mellin(Complex::new(1.5, 0.0)).re;
    assert!((amplitude - (std::f64::consts::PI / 2.0).sqrt()).abs() < 1e-13);

    let engine = FftLog::new(grid, kernel, 1.5, FftLogParams::default()).expect("engine");
    let input: Vec<f64> = engine.x().iter().map(|x| x.powf(1.5)).collect();
    let (y, g) = engine.apply(&input, Extrapolation::Zero).expect("apply");
    for (yv, gv) in y.iter().zip(&g) {
        let exact = amplitude * yv.powf(-1.5);
        assert!(((gv - exact) / exact).abs() < 1e-11, "y={yv}");
    }
}

#[test]
fn complex_path_matches_real_path() {
    let grid = LogGrid::from_range(1e-2, 1e2, 50).expect("grid");
    let params = FftLogParams {
        padding: Padding::Fold(2),
        ..FftLogParams::default()
    };
    let engine = FftLog::new(grid, SphericalBesselJ { l: 1 }, 1.3, params).expect("engine");

    let mut rng = StdRng::seed_from_u64(2024);
    let re: Vec<f64> = (0..50).map(|_| rng.random::<f64>()).collect();
    let im: Vec<f64> = (0..50).map(|_| rng.random::<f64>() - 0.5).collect();
    let input: Vec<Complex<f64>> = re.iter().zip(&im).map(|(a, b)| Complex::new(*a, *b)).collect();

    let (_, g_re) = engine.apply(&re, Extrapolation::Zero).expect("re");
    let (_, g_im) = engine.apply(&im, Extrapolation::Zero).expect("im");
    let (_, g) = engine.apply_complex(&input, &ApplyOptions::default()).expect("complex");
    let scale = max_abs(&g_re).max(max_abs(&g_im));
    for i in 0..50 {
        assert!((g[i].re - g_re[i]).abs() < 1e-12 * scale, "re i={i}");
        assert!((g[i].im - g_im[i]).abs() < 1e-12 * scale, "im i={i}");
    }
}

#[test]
fn batch_apply_matches_single_apply() {
    let grid = LogGrid::from_range(1e-3, 1e3, 64).expect("grid");
    let engine = FftLog::new(grid, SphericalBesselJ { l: 0 }, 1.5, FftLogParams::default()).expect("engine");
    let inputs: Vec<Vec<f64>> = (1..=5)
        .map(|s: u32| engine.x().iter().map(|x| (-x * x * f64::from(s)).exp()).collect())
        .collect();

    let (y, outputs) = engine.apply_many(&inputs, Extrapolation::Zero).expect("batch");
    assert_eq!(y, engine.y());
    assert_eq!(outputs.len(), 5);
    for (input, output) in inputs.iter().zip(&outputs) {
        let (_, single) = engine.apply(input, Extrapolation::Zero).expect("single");
        assert_eq!(&single, output);
    }

    let bad = vec![vec![0.0; 64], vec![0.0; 63]];
    assert_eq!(
        engine.apply_many(&bad, Extrapolation::Zero).unwrap_err(),
        FftLogError::Shape {
            expected: 64,
            actual: 63
        }
    );
}

#[test]
fn invalid_construction_is_rejected() {
    let linear: Vec<f64> = (1..=32).map(|i| i as f64).collect();
    let err = FftLog::from_samples(&linear, SphericalBesselJ { l: 0 }, 1.5, FftLogParams::default())
        .unwrap_err();
    assert!(matches!(err, FftLogError::Configuration(_)));

    let grid = LogGrid::from_range(1e-2, 1e2, 32).expect("grid");
    let bad_step = FftLogParams {
        lowring: LowRing::Step { max_rel_change: 1.5 },
        ..FftLogParams::default()
    };
    assert!(matches!(
        FftLog::new(grid, SphericalBesselJ { l: 0 }, 1.5, bad_step).unwrap_err(),
        FftLogError::Configuration(_)
    ));

    let bad_ln_xy = FftLogParams {
        ln_xy: f64::NAN,
        ..FftLogParams::default()
    };
    assert!(FftLog::new(grid, SphericalBesselJ { l: 0 }, 1.5, bad_ln_xy).is_err());
}
