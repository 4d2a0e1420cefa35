//! Core domain types and the library-wide error type.

pub mod grid;
pub mod serialization;

pub use grid::{LogGrid, interpolate_loglog};
pub use serialization::{from_json, to_json_pretty};

/// Engine, kernel and transform errors surfaced by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FftLogError {
    /// Invalid grid, bias exponent or engine parameters.
    Configuration(String),
    /// Input array length does not match the engine grid.
    Shape { expected: usize, actual: usize },
    /// Kernel evaluation produced a non-finite transfer-function bin.
    NumericOverflow(String),
    /// The FFT backend rejected a buffer.
    Fft(String),
    /// A real result was requested from a transform with an imaginary phase.
    ComplexOutput,
    /// The requested transform has no implementation.
    Unsupported(String),
}

impl std::fmt::Display for FftLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::Shape { expected, actual } => {
                write!(f, "shape error: expected {expected} samples, got {actual}")
            }
            Self::NumericOverflow(msg) => write!(f, "numeric overflow: {msg}"),
            Self::Fft(msg) => write!(f, "fft error: {msg}"),
            Self::ComplexOutput => write!(
                f,
                "transform phase is imaginary; use apply_complex for the full result"
            ),
            Self::Unsupported(msg) => write!(f, "unsupported transform: {msg}"),
        }
    }
}

impl std::error::Error for FftLogError {}
