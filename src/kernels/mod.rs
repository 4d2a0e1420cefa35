//! Mellin transforms of the transform kernels.
//!
//! Every family implements [`MellinKernel`]; the engine only ever calls
//! [`MellinKernel::mellin`] and never inspects which physical kernel it holds.
//! [`Kernel`] is the closed, serialisable set of built-in families.

pub mod bessel;
pub mod derivative;
pub mod double_bessel;
pub mod window;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

pub use bessel::{BesselJ, SphericalBesselJ};
pub use derivative::{Derivative, Inverse, LogDerivative};
pub use double_bessel::DoubleSphericalBesselJ;
pub use window::{Gauss, GaussSq, Tophat, TophatSq};

/// Mellin transform `M(z) = ∫₀^∞ K(t) t^{z-1} dt` of a real kernel `K`.
///
/// Implementations must be holomorphic in a vertical strip containing the bias
/// exponent and satisfy `M(conj z) = conj M(z)`. Values that cannot be computed
/// are reported as non-finite numbers.
pub trait MellinKernel {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64>;
}

impl<K: MellinKernel + ?Sized> MellinKernel for &K {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        (**self).mellin(z)
    }
}

impl<K: MellinKernel + ?Sized> MellinKernel for Box<K> {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        (**self).mellin(z)
    }
}

/// Kernel given directly by its Mellin transform.
#[derive(Clone, Copy)]
pub struct FnKernel<F>(pub F);

impl<F> MellinKernel for FnKernel<F>
where
    F: Fn(Complex<f64>) -> Complex<f64>,
{
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        (self.0)(z)
    }
}

impl<F> std::fmt::Debug for FnKernel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnKernel")
    }
}

/// Built-in kernel families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Kernel {
    /// Cylindrical Bessel `J_ν(t)`.
    BesselJ { nu: f64 },
    /// Spherical Bessel `j_l(t)`.
    SphericalBesselJ { l: u32 },
    /// Top-hat window in `dim` dimensions.
    Tophat { dim: u32 },
    /// Squared top-hat window in `dim` dimensions.
    TophatSq { dim: u32 },
    /// `exp(-t²/2)`.
    Gauss,
    /// `exp(-t²)`.
    GaussSq,
    /// `j_{l1}(t) j_{l2}(αt)`.
    DoubleSphericalBesselJ { l1: u32, l2: u32, alpha: f64 },
}

impl MellinKernel for Kernel {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        match *self {
            Self::BesselJ { nu } => BesselJ { nu }.mellin(z),
            Self::SphericalBesselJ { l } => SphericalBesselJ { l }.mellin(z),
            Self::Tophat { dim } => Tophat { dim }.mellin(z),
            Self::TophatSq { dim } => TophatSq { dim }.mellin(z),
            Self::Gauss => Gauss.mellin(z),
            Self::GaussSq => GaussSq.mellin(z),
            Self::DoubleSphericalBesselJ { l1, l2, alpha } => {
                DoubleSphericalBesselJ { l1, l2, alpha }.mellin(z)
            }
        }
    }
}

/// `2^z` for complex `z`.
pub(crate) fn pow2(z: Complex<f64>) -> Complex<f64> {
    (z * std::f64::consts::LN_2).exp()
}
