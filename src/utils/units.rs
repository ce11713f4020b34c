//! Conversions from raw tenths storage to natural units.
//!
//! Raw integers are never modified; these helpers are applied only when
//! values leave the store (API responses) or after aggregation.

use crate::utils::constants::{MISSING_VALUE, TENTHS_MM_PER_CM, TENTHS_PER_UNIT};

/// Tenths of a degree Celsius to degrees Celsius.
pub fn tenths_to_celsius(raw: Option<i32>) -> Option<f64> {
    raw.filter(|&v| v != MISSING_VALUE)
        .map(|v| f64::from(v) / TENTHS_PER_UNIT)
}

/// Tenths of a millimetre to millimetres.
pub fn tenths_to_mm(raw: Option<i32>) -> Option<f64> {
    raw.filter(|&v| v != MISSING_VALUE)
        .map(|v| f64::from(v) / TENTHS_PER_UNIT)
}

/// Averaged tenths (already sentinel-free) to natural units.
pub fn mean_tenths_to_unit(mean: Option<f64>) -> Option<f64> {
    mean.map(|m| m / TENTHS_PER_UNIT)
}

/// Summed tenths of a millimetre (already sentinel-free) to centimetres.
pub fn total_tenths_mm_to_cm(sum: Option<i64>) -> Option<f64> {
    sum.map(|s| s as f64 / TENTHS_MM_PER_CM)
}
