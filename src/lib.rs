//! # fftlog
//!
//! Fast integral transforms of functions sampled on logarithmic grids.
//!
//! The crate computes
//!
//! ```text
//! G(y) = ∫ F(x) K(xy) dx / x
//! ```
//!
//! for kernels whose Mellin transform `M(z) = ∫ K(t) t^{z-1} dt` is known in
//! closed form. On a log-spaced grid the integral is a convolution in `ln x`,
//! so it costs two FFTs once the kernel has been sampled along the line
//! `Re z = q`.
//!
//! The library is layered:
//! - [`core`]: log-spaced grids, the error type and JSON helpers.
//! - [`math`]: complex log-gamma, the Gauss hypergeometric series and 1-D root finding.
//! - [`kernels`]: Mellin transforms of Bessel, spherical Bessel, window and
//!   double-Bessel kernels plus derivative and inverse wrappers.
//! - [`engines::fftlog`]: the transform engine with padding, extrapolation and
//!   low-ringing tuning.
//! - [`transforms`]: Hankel, spherical Bessel and cosmology transforms with
//!   their physical prefactors.
//!
//! ## References
//!
//! - Talman, J. D. (1978), *Numerical Fourier and Bessel transforms in logarithmic variables*.
//! - Hamilton, A. J. S. (2000), *Uncorrelated modes of the non-linear power spectrum*, MNRAS 312.
//! - Fang, X., Krause, E., Eifler, T., MacCrann, N. (2020), *Beyond Limber: efficient computation
//!   of angular power spectra for galaxy clustering and weak lensing*, for the
//!   double spherical Bessel kernel.
//!
//! ## Numerical considerations
//!
//! - The discrete transform is periodic in `ln x`. Inputs should decay at both
//!   ends of the grid once multiplied by `x^{-q}`; otherwise pad and extrapolate.
//! - The bias `q` must lie inside the convergence strip of the kernel. The
//!   engine rejects a bias where `M(q)` is not finite.
//! - Ringing near the output edges is reduced by making the transfer function
//!   real at the Nyquist frequency. See [`engines::fftlog::LowRing`].
//! - Output near the ends of the grid is contaminated by aliasing. Compare
//!   against a wider grid before trusting those samples.
//!
//! ## When to use
//!
//! Use FFTLog when `F` spans many decades and a full output grid is needed.
//! For a handful of output points an adaptive quadrature is usually more accurate.
//!
//! # Feature Flags
//!
//! - `parallel`: batch transforms through [`engines::fftlog::FftLog::apply_many`] use rayon.
//!
//! # Quick Start
//!
//! Transform a Gaussian with the spherical Bessel kernel:
//! ```rust
//! use fftlog::core::LogGrid;
//! use fftlog::engines::fftlog::{Extrapolation, FftLogParams};
//! use fftlog::transforms::SphericalBessel;
//!
//! let grid = LogGrid::from_range(1e-6, 1e4, 1024).unwrap();
//! let transform = SphericalBessel::default().build(grid, FftLogParams::default()).unwrap();
//! let f: Vec<f64> = transform.x().iter().map(|x| (-x * x).exp()).collect();
//! let (y, g) = transform.apply(&f, Extrapolation::Zero).unwrap();
//!
//! let i = y.iter().position(|&v| v > 1.0).unwrap();
//! let exact = std::f64::consts::PI.sqrt() / 4.0 * (-y[i] * y[i] / 4.0).exp();
//! assert!((g[i] - exact).abs() < 1e-7);
//! ```
//!
//! Correlation function of a power spectrum with low-ringing tuning:
//! ```rust
//! use fftlog::core::LogGrid;
//! use fftlog::engines::fftlog::{Extrapolation, FftLogParams, LowRing};
//! use fftlog::transforms::P2xi;
//!
//! let k = LogGrid::from_range(1e-4, 1e2, 512).unwrap();
//! let params = FftLogParams { lowring: LowRing::Offset, ..FftLogParams::default() };
//! let p2xi = P2xi::default().build(k, params).unwrap();
//! let pk: Vec<f64> = p2xi.x().iter().map(|k| k * (-k * k).exp()).collect();
//! let (r, xi) = p2xi.apply(&pk, Extrapolation::Zero).unwrap();
//! assert_eq!(r.len(), xi.len());
//! ```

pub mod core;
pub mod engines;
pub mod kernels;
pub mod math;
pub mod transforms;
