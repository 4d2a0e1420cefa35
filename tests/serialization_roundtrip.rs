use std::fmt::Debug;

use fftlog::core::{LogGrid, from_json, to_json_pretty};
use fftlog::engines::fftlog::{ApplyOptions, Extrapolation, FftLog, FftLogParams, LowRing, Padding};
use fftlog::kernels::{Kernel, SphericalBesselJ};
use fftlog::transforms::{
    DoubleSphericalBessel, ExcursionSet, GaussVar, Hankel, P2xi, PowerFactor, SphericalBessel,
    TophatVar, Xi2P,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

fn assert_roundtrip<T>(value: &T)
where
    T: Serialize + DeserializeOwned + PartialEq + Debug,
{
    let json = to_json_pretty(value).expect("json serialize");
    let decoded: T = from_json(&json).expect("json deserialize");
    assert_eq!(decoded, *value, "json roundtrip mismatch");

    let compact = serde_json::to_vec(value).expect("compact serialize");
    let decoded: T = serde_json::from_slice(&compact).expect("compact deserialize");
    assert_eq!(decoded, *value, "compact roundtrip mismatch");
}

#[test]
fn configuration_types_roundtrip() {
    assert_roundtrip(&LogGrid::from_range(1e-3, 1e3, 64).expect("grid"));
    assert_roundtrip(&FftLogParams::default());
    assert_roundtrip(&FftLogParams {
        lowring: LowRing::step(),
        ln_xy: -0.3,
        padding: Padding::Fold(4),
        deriv: 2,
        extrap_window: 5,
    });
    assert_roundtrip(&ApplyOptions {
        extrap: Extrapolation::PowerLaw,
        keep_pads: true,
        conv_only: false,
    });
    assert_roundtrip(&PowerFactor::new(0.5, -1.5));
}

#[test]
fn transform_specs_roundtrip() {
    assert_roundtrip(&Hankel { nu: 1.5, q: 0.8 });
    assert_roundtrip(&SphericalBessel { l: 3, q: 1.2 });
    assert_roundtrip(&DoubleSphericalBessel {
        alpha: 0.4,
        l1: 1,
        l2: 2,
        q: 1.5,
    });
    assert_roundtrip(&P2xi {
        l: 2,
        n: Some(-1),
        q: 1.5,
    });
    assert_roundtrip(&Xi2P::default());
    assert_roundtrip(&TophatVar::default());
    assert_roundtrip(&GaussVar { q: 1.0 });
    assert_roundtrip(&ExcursionSet { q: 1.5 });
}

#[test]
fn every_kernel_family_roundtrips() {
    let kernels = [
        Kernel::BesselJ { nu: 0.5 },
        Kernel::SphericalBesselJ { l: 4 },
        Kernel::Tophat { dim: 2 },
        Kernel::TophatSq { dim: 3 },
        Kernel::Gauss,
        Kernel::GaussSq,
        Kernel::DoubleSphericalBesselJ {
            l1: 2,
            l2: 0,
            alpha: 3.0,
        },
    ];
    for kernel in &kernels {
        assert_roundtrip(kernel);
    }
}

#[test]
fn engine_rebuilt_from_json_gives_identical_output() {
    let payload = r#"{
        "grid": { "start": 0.0009765625, "log_step": 0.125, "len": 128 },
        "kernel": { "SphericalBesselJ": { "l": 1 } },
        "q": 1.25,
        "params": {
            "lowring": "Offset",
            "ln_xy": 0.0,
            "padding": { "Fold": 2 },
            "deriv": 0,
            "extrap_window": 2
        }
    }"#;

    #[derive(serde::Deserialize)]
    struct Setup {
        grid: LogGrid,
        kernel: Kernel,
        q: f64,
        params: FftLogParams,
    }

    let setup: Setup = from_json(payload).expect("setup json");
    let engine = FftLog::new(setup.grid, setup.kernel, setup.q, setup.params).expect("engine");
    let direct = FftLog::new(
        LogGrid::new(0.0009765625, 0.125, 128).expect("grid"),
        SphericalBesselJ { l: 1 },
        1.25,
        FftLogParams {
            lowring: LowRing::Offset,
            padding: Padding::Fold(2),
            ..FftLogParams::default()
        },
    )
    .expect("direct engine");

    let input: Vec<f64> = engine.x().iter().map(|x| x / (1.0 + x * x)).collect();
    let (y_json, g_json) = engine.apply(&input, Extrapolation::Zero).expect("json engine");
    let (y_direct, g_direct) = direct.apply(&input, Extrapolation::Zero).expect("direct engine");
    assert_eq!(y_json, y_direct);
    assert_eq!(g_json, g_direct);
}
