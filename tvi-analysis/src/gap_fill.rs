//! Gap filling for per-period vegetation-index series.
//!
//! A yearly series holds one sample per bi-weekly period. Samples at or
//! below the validity cutoff count as missing (cloud cover, no usable
//! acquisition) and are replaced by Lagrange interpolation over all
//! period positions, with missing basis values substituted by their
//! nearest valid neighbors.

use std::fmt;

/// Errors that can occur while filling a series.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GapFillError {
    /// The series holds no valid sample, so no neighbor scan can succeed.
    InsufficientData,
}

impl fmt::Display for GapFillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapFillError::InsufficientData => {
                write!(f, "series holds no valid sample to interpolate from")
            }
        }
    }
}

impl std::error::Error for GapFillError {}

/// A sample is missing when it does not clear the cutoff. A cutoff of 0.0
/// treats exactly-zero samples (and negatives) as missing; NaN is always
/// missing.
fn is_missing(value: f64, cutoff: f64) -> bool {
    !(value > cutoff)
}

/// Scan circularly from `start` in `step` direction (+1 right, -1 left)
/// for the first valid sample. The series is periodic over the year, so
/// the scan wraps; one full cycle without a hit means the series has no
/// valid sample in it at all.
fn scan_for_valid(series: &[f64], cutoff: f64, start: usize, step: isize) -> Option<f64> {
    let n = series.len();
    let mut idx = start;
    for _ in 0..n {
        if !is_missing(series[idx], cutoff) {
            return Some(series[idx]);
        }
        idx = (idx as isize + step).rem_euclid(n as isize) as usize;
    }
    None
}

/// Substitute value for a missing basis point at `idx`.
///
/// The first and last index scan a single direction (inward); interior
/// indices scan both ways and settle between their neighbors: the smaller
/// of the two plus half their absolute difference.
fn fallback_value(series: &[f64], cutoff: f64, idx: usize) -> Result<f64, GapFillError> {
    let last = series.len() - 1;
    if idx == 0 {
        scan_for_valid(series, cutoff, idx, 1).ok_or(GapFillError::InsufficientData)
    } else if idx == last {
        scan_for_valid(series, cutoff, idx, -1).ok_or(GapFillError::InsufficientData)
    } else {
        let right = scan_for_valid(series, cutoff, idx, 1).ok_or(GapFillError::InsufficientData)?;
        let left = scan_for_valid(series, cutoff, idx, -1).ok_or(GapFillError::InsufficientData)?;
        let difference = (left - right).abs();
        Ok(left.min(right) + difference / 2.0)
    }
}

/// Lagrange interpolation value at `x` over all basis points
/// `(positions[k], series[k])`, substituting missing basis values with
/// their neighbor-scan fallback.
pub fn lagrange_value_at(
    x: f64,
    positions: &[f64],
    series: &[f64],
    cutoff: f64,
) -> Result<f64, GapFillError> {
    debug_assert_eq!(positions.len(), series.len());
    let mut sum = 0.0;
    for (k, &position) in positions.iter().enumerate() {
        let mut product = 1.0;
        for (j, &other) in positions.iter().enumerate() {
            if k != j {
                product *= (x - other) / (position - other);
            }
        }
        let basis_value = if is_missing(series[k], cutoff) {
            fallback_value(series, cutoff, k)?
        } else {
            series[k]
        };
        sum += product * basis_value;
    }
    Ok(sum)
}

/// Fill every missing sample of a yearly period series.
///
/// Originally-valid samples pass through unchanged; every missing index is
/// replaced by the Lagrange estimate at its period position, computed from
/// a snapshot of the input (fills never feed into later fills). Fails with
/// [`GapFillError::InsufficientData`] when the series has no valid sample
/// to interpolate from.
pub fn fill_gaps(series: &[f64], cutoff: f64) -> Result<Vec<f64>, GapFillError> {
    if series.is_empty() {
        return Ok(Vec::new());
    }
    let positions: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    let mut filled = series.to_vec();
    for (i, value) in series.iter().enumerate() {
        if is_missing(*value, cutoff) {
            filled[i] = lagrange_value_at(positions[i], &positions, series, cutoff)?;
        }
    }
    Ok(filled)
}
