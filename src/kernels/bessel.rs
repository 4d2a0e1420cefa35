use std::f64::consts::PI;

use num_complex::Complex;

use super::{MellinKernel, pow2};
use crate::math::gamma_ratio;

/// Cylindrical Bessel function of the first kind, `J_ν(t)`.
///
/// `M(z) = 2^{z-1} Γ((ν+z)/2) / Γ((ν-z)/2 + 1)`, convergent for `-ν < Re z < 3/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BesselJ {
    pub nu: f64,
}

impl MellinKernel for BesselJ {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        pow2(z - 1.0) * gamma_ratio((z + self.nu) * 0.5, (-z + self.nu) * 0.5 + 1.0)
    }
}

/// Spherical Bessel function of the first kind, `j_l(t)`.
///
/// `M(z) = √π 2^{z-2} Γ((l+z)/2) / Γ((3+l-z)/2)`, convergent for `-l < Re z < 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalBesselJ {
    pub l: u32,
}

impl MellinKernel for SphericalBesselJ {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        let l = f64::from(self.l);
        pow2(z - 2.0) * PI.sqrt() * gamma_ratio((z + l) * 0.5, (-z + 3.0 + l) * 0.5)
    }
}
