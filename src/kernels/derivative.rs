//! Adapters turning one kernel's Mellin transform into a related kernel's.

use num_complex::Complex;

use super::MellinKernel;

/// `n`-th derivative `K^{(n)}(t)` of the wrapped kernel.
///
/// Integration by parts gives `M_n(z) = (-1)^n (z-1)(z-2)…(z-n) M(z-n)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivative<K> {
    pub kernel: K,
    pub order: u32,
}

impl<K> Derivative<K> {
    pub fn new(kernel: K, order: u32) -> Self {
        Self { kernel, order }
    }
}

impl<K: MellinKernel> MellinKernel for Derivative<K> {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        let n = f64::from(self.order);
        let falling = (1..=self.order).fold(Complex::new(1.0, 0.0), |acc, k| {
            acc * (f64::from(k) - z)
        });
        falling * self.kernel.mellin(z - n)
    }
}

/// `(t d/dt)^n K(t)`, with Mellin transform `(-z)^n M(z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogDerivative<K> {
    pub kernel: K,
    pub order: u32,
}

impl<K> LogDerivative<K> {
    pub fn new(kernel: K, order: u32) -> Self {
        Self { kernel, order }
    }
}

impl<K: MellinKernel> MellinKernel for LogDerivative<K> {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        (-z).powu(self.order) * self.kernel.mellin(z)
    }
}

/// Kernel of the inverse transform, `M'(z) = 1 / M(-z)`.
///
/// Used with the negated bias exponent on the reflected grid it undoes the
/// wrapped transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse<K>(pub K);

impl<K: MellinKernel> MellinKernel for Inverse<K> {
    fn mellin(&self, z: Complex<f64>) -> Complex<f64> {
        self.0.mellin(-z).inv()
    }
}
