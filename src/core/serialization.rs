//! JSON payloads for engine and transform configuration.
//!
//! Grids, kernel selections and engine parameters are plain serde types so a
//! transform setup can be persisted next to the tables it was applied to.
//!
//! # Examples
//! ```rust
//! use fftlog::core::{LogGrid, from_json, to_json_pretty};
//! use fftlog::engines::fftlog::{FftLogParams, LowRing, Padding};
//!
//! let params = FftLogParams {
//!     lowring: LowRing::Offset,
//!     padding: Padding::Fold(2),
//!     ..FftLogParams::default()
//! };
//! let json = to_json_pretty(&params).expect("json serialization");
//! let decoded: FftLogParams = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, params);
//!
//! let grid = LogGrid::from_range(1e-4, 1e4, 256).unwrap();
//! let decoded: LogGrid = from_json(&to_json_pretty(&grid).unwrap()).unwrap();
//! assert_eq!(decoded, grid);
//! ```

use serde::de::DeserializeOwned;

/// Serializes any payload to pretty JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserializes any payload from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}
