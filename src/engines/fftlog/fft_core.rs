use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

use crate::core::FftLogError;

/// Transform direction, part of every plan-cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

static REAL_FORWARD_CACHE: OnceLock<Mutex<HashMap<usize, Arc<dyn RealToComplex<f64>>>>> =
    OnceLock::new();
static REAL_INVERSE_CACHE: OnceLock<Mutex<HashMap<usize, Arc<dyn ComplexToReal<f64>>>>> =
    OnceLock::new();
static COMPLEX_CACHE: OnceLock<Mutex<HashMap<(usize, Direction), Arc<dyn Fft<f64>>>>> =
    OnceLock::new();

thread_local! {
    static FFT_SCRATCH: RefCell<HashMap<(usize, Direction, bool), Vec<Complex<f64>>>> =
        RefCell::new(HashMap::new());
}

/// Runs `f` with a per-thread scratch buffer of at least `len` elements.
fn with_scratch<R>(
    key: (usize, Direction, bool),
    len: usize,
    f: impl FnOnce(&mut [Complex<f64>]) -> R,
) -> R {
    FFT_SCRATCH.with(|cache| {
        let mut cache = cache.borrow_mut();
        let scratch = cache.entry(key).or_default();
        if scratch.len() < len {
            scratch.resize(len, Complex::new(0.0, 0.0));
        }
        f(&mut scratch[..len])
    })
}

fn real_forward_plan(n: usize) -> Arc<dyn RealToComplex<f64>> {
    let cache = REAL_FORWARD_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().expect("real FFT cache lock poisoned");
    if let Some(plan) = guard.get(&n) {
        return Arc::clone(plan);
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let plan = planner.plan_fft_forward(n);
    guard.insert(n, Arc::clone(&plan));
    plan
}

fn real_inverse_plan(n: usize) -> Arc<dyn ComplexToReal<f64>> {
    let cache = REAL_INVERSE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().expect("real FFT cache lock poisoned");
    if let Some(plan) = guard.get(&n) {
        return Arc::clone(plan);
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let plan = planner.plan_fft_inverse(n);
    guard.insert(n, Arc::clone(&plan));
    plan
}

fn complex_plan(n: usize, direction: Direction) -> Arc<dyn Fft<f64>> {
    let cache = COMPLEX_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().expect("complex FFT cache lock poisoned");
    if let Some(plan) = guard.get(&(n, direction)) {
        return Arc::clone(plan);
    }

    let mut planner = FftPlanner::<f64>::new();
    let plan = match direction {
        Direction::Forward => planner.plan_fft_forward(n),
        Direction::Inverse => planner.plan_fft_inverse(n),
    };
    guard.insert((n, direction), Arc::clone(&plan));
    plan
}

/// Drops every cached plan. Engines keep their own handles and stay usable.
pub fn clear_plan_cache() {
    if let Some(cache) = REAL_FORWARD_CACHE.get() {
        cache.lock().expect("real FFT cache lock poisoned").clear();
    }
    if let Some(cache) = REAL_INVERSE_CACHE.get() {
        cache.lock().expect("real FFT cache lock poisoned").clear();
    }
    if let Some(cache) = COMPLEX_CACHE.get() {
        cache.lock().expect("complex FFT cache lock poisoned").clear();
    }
}

/// Number of plans currently held by the process-wide cache.
pub fn plan_cache_len() -> usize {
    let real_fwd = REAL_FORWARD_CACHE
        .get()
        .map_or(0, |c| c.lock().expect("real FFT cache lock poisoned").len());
    let real_inv = REAL_INVERSE_CACHE
        .get()
        .map_or(0, |c| c.lock().expect("real FFT cache lock poisoned").len());
    let complex = COMPLEX_CACHE
        .get()
        .map_or(0, |c| c.lock().expect("complex FFT cache lock poisoned").len());
    real_fwd + real_inv + complex
}

/// Real FFT plans of one length, held by an engine for its lifetime.
///
/// Complex plans are only needed for complex input and come from the shared cache.
#[derive(Clone)]
pub(crate) struct FftPlans {
    len: usize,
    real_forward: Arc<dyn RealToComplex<f64>>,
    real_inverse: Arc<dyn ComplexToReal<f64>>,
}

impl std::fmt::Debug for FftPlans {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftPlans").field("len", &self.len).finish()
    }
}

impl FftPlans {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            real_forward: real_forward_plan(len),
            real_inverse: real_inverse_plan(len),
        }
    }

    /// Number of independent bins of a real signal, `len/2 + 1`.
    pub(crate) fn half_len(&self) -> usize {
        self.len / 2 + 1
    }

    /// Forward real FFT; `input` is used as workspace.
    pub(crate) fn forward_real(&self, input: &mut [f64]) -> Result<Vec<Complex<f64>>, FftLogError> {
        let plan = &self.real_forward;
        let mut spectrum = plan.make_output_vec();
        let key = (self.len, Direction::Forward, false);
        with_scratch(key, plan.get_scratch_len(), |scratch| {
            plan.process_with_scratch(input, &mut spectrum, scratch)
        })
        .map_err(|err| FftLogError::Fft(err.to_string()))?;
        Ok(spectrum)
    }

    /// Inverse real FFT with `1/len` normalisation.
    ///
    /// The imaginary parts of the DC bin and, for even lengths, of the Nyquist bin
    /// do not exist for a real signal and are discarded.
    pub(crate) fn inverse_real(&self, spectrum: &mut [Complex<f64>]) -> Result<Vec<f64>, FftLogError> {
        if let Some(dc) = spectrum.first_mut() {
            dc.im = 0.0;
        }
        if self.len % 2 == 0 {
            if let Some(nyquist) = spectrum.last_mut() {
                nyquist.im = 0.0;
            }
        }

        let plan = &self.real_inverse;
        let mut out = plan.make_output_vec();
        let key = (self.len, Direction::Inverse, false);
        with_scratch(key, plan.get_scratch_len(), |scratch| {
            plan.process_with_scratch(spectrum, &mut out, scratch)
        })
        .map_err(|err| FftLogError::Fft(err.to_string()))?;

        let inv_n = 1.0 / self.len as f64;
        for v in &mut out {
            *v *= inv_n;
        }
        Ok(out)
    }

    /// In-place complex FFT; the inverse carries the `1/len` normalisation.
    pub(crate) fn complex_inplace(&self, values: &mut [Complex<f64>], direction: Direction) {
        let fft = complex_plan(self.len, direction);
        let key = (self.len, direction, true);
        with_scratch(key, fft.get_inplace_scratch_len(), |scratch| {
            fft.process_with_scratch(values, scratch)
        });

        if direction == Direction::Inverse {
            let inv_n = 1.0 / self.len as f64;
            for x in values {
                *x *= inv_n;
            }
        }
    }
}
