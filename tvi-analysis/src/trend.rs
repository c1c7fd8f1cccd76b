//! Per-pixel long-term trend estimation over a stack of yearly rasters.
//!
//! Every pixel gets the ordinary-least-squares slope of its index value
//! against the year index, ignoring years where the pixel has no data.
//! The computation runs array-at-a-time over the flat cell buffers, one
//! pass per raster, so a 1000x1000 stack never loops per pixel per year.

use std::fmt;
use tvi_sentinel::raster::{Cell, Raster};

/// Errors that can occur while estimating a trend map.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TrendError {
    /// Fewer than two rasters in the stack carry any finite data.
    InsufficientYears,
    /// Rasters in the stack disagree on shape, or the year-index list does
    /// not match the stack length.
    ShapeMismatch,
}

impl fmt::Display for TrendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendError::InsufficientYears => {
                write!(f, "trend estimation needs data from at least two years")
            }
            TrendError::ShapeMismatch => {
                write!(f, "raster stack shapes or year indices do not line up")
            }
        }
    }
}

impl std::error::Error for TrendError {}

/// Compute the per-pixel OLS trend slope across a stack of yearly rasters.
///
/// `year_indices[t]` is the x coordinate of raster `t`. The denominator
/// `sum((x - mean_x)^2)` is shared by every pixel and computed once; the
/// per-pixel mean covers only that pixel's finite years. Pixels observed
/// in fewer than two years come back as `NoData`, as does every pixel
/// when the year indices are degenerate (zero denominator). Division by
/// zero is short-circuited, never raised.
pub fn compute_trend(stack: &[Raster], year_indices: &[i32]) -> Result<Raster, TrendError> {
    if year_indices.len() != stack.len() {
        return Err(TrendError::ShapeMismatch);
    }
    let usable_years = stack.iter().filter(|r| !r.is_all_no_data()).count();
    if usable_years < 2 {
        return Err(TrendError::InsufficientYears);
    }
    let (width, height) = stack[0].shape();
    if stack.iter().any(|r| r.shape() != (width, height)) {
        return Err(TrendError::ShapeMismatch);
    }

    let m = year_indices.len() as f64;
    let mean_x = year_indices.iter().map(|&x| f64::from(x)).sum::<f64>() / m;
    let denominator: f64 = year_indices
        .iter()
        .map(|&x| (f64::from(x) - mean_x).powi(2))
        .sum();

    let len = width * height;

    // first pass: per-pixel finite count and sum, for the masked mean
    let mut count = vec![0_u32; len];
    let mut sum_y = vec![0.0_f64; len];
    for raster in stack {
        for (i, cell) in raster.cells().iter().enumerate() {
            if let Cell::Valid(v) = cell {
                count[i] += 1;
                sum_y[i] += v;
            }
        }
    }

    // second pass: numerator sum((x - mean_x) * (y - mean_y)) over finite years
    let mut numerator = vec![0.0_f64; len];
    for (raster, &x) in stack.iter().zip(year_indices) {
        let dx = f64::from(x) - mean_x;
        for (i, cell) in raster.cells().iter().enumerate() {
            if let Cell::Valid(v) = cell {
                let mean_y = sum_y[i] / f64::from(count[i]);
                numerator[i] += dx * (v - mean_y);
            }
        }
    }

    let cells = count
        .iter()
        .zip(&numerator)
        .map(|(&n, &num)| {
            if n >= 2 && denominator != 0.0 {
                Cell::Valid(num / denominator)
            } else {
                Cell::NoData
            }
        })
        .collect();
    Raster::from_cells(width, height, cells).map_err(|_| TrendError::ShapeMismatch)
}

/// Symmetric color-scale limit for rendering a trend map: the 98th
/// percentile of the absolute values of all finite entries, or 1.0 when
/// the map is empty or entirely flat. Never fails.
pub fn display_limit(trend_map: &Raster) -> f64 {
    let mut magnitudes: Vec<f64> = trend_map.valid_values().map(f64::abs).collect();
    if magnitudes.is_empty() {
        return 1.0;
    }
    magnitudes.sort_by(|a, b| a.total_cmp(b));
    let limit = percentile_sorted(&magnitudes, 98.0);
    if limit == 0.0 {
        1.0
    } else {
        limit
    }
}

/// Percentile of a sorted sample with linear interpolation between the
/// two nearest order statistics.
fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_trend, display_limit, TrendError};
    use tvi_sentinel::raster::{Cell, Raster};

    const EPS: f64 = 1e-9;

    fn raster_2x2(values: [Option<f64>; 4]) -> Raster {
        let cells = values
            .iter()
            .map(|v| match v {
                Some(v) => Cell::Valid(*v),
                None => Cell::NoData,
            })
            .collect();
        Raster::from_cells(2, 2, cells).unwrap()
    }

    #[test]
    fn test_two_year_slope_is_difference() {
        let stack = vec![
            raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)]),
            raster_2x2([Some(0.6), Some(0.3), Some(0.9), Some(0.8)]),
        ];
        let trend = compute_trend(&stack, &[0, 1]).unwrap();
        // slope between two points one year apart is their difference
        assert!((trend.get(0, 0).unwrap().value().unwrap() - 0.4).abs() < EPS);
        assert!((trend.get(0, 1).unwrap().value().unwrap() - (-0.2)).abs() < EPS);
        assert!((trend.get(1, 0).unwrap().value().unwrap() - 0.0).abs() < EPS);
        assert!((trend.get(1, 1).unwrap().value().unwrap() - 0.4).abs() < EPS);
    }

    #[test]
    fn test_single_observation_pixel_is_masked() {
        let stack = vec![
            raster_2x2([Some(0.2), None, Some(0.1), Some(0.4)]),
            raster_2x2([Some(0.6), None, None, Some(0.8)]),
            raster_2x2([Some(1.0), Some(0.5), None, Some(1.2)]),
        ];
        let trend = compute_trend(&stack, &[0, 1, 2]).unwrap();
        // observed every year: exact line with slope 0.4
        assert!((trend.get(0, 0).unwrap().value().unwrap() - 0.4).abs() < EPS);
        // observed in a single year only
        assert_eq!(trend.get(0, 1), Some(Cell::NoData));
        assert_eq!(trend.get(1, 0), Some(Cell::NoData));
    }

    #[test]
    fn test_one_year_stack_fails() {
        let stack = vec![raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)])];
        assert_eq!(
            compute_trend(&stack, &[0]),
            Err(TrendError::InsufficientYears)
        );
    }

    #[test]
    fn test_all_no_data_years_do_not_count() {
        let stack = vec![
            raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)]),
            raster_2x2([None, None, None, None]),
            raster_2x2([None, None, None, None]),
        ];
        assert_eq!(
            compute_trend(&stack, &[0, 1, 2]),
            Err(TrendError::InsufficientYears)
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let small = Raster::from_cells(1, 1, vec![Cell::Valid(0.5)]).unwrap();
        let stack = vec![
            raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)]),
            small,
        ];
        assert_eq!(
            compute_trend(&stack, &[0, 1]),
            Err(TrendError::ShapeMismatch)
        );

        let stack = vec![
            raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)]),
            raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)]),
        ];
        assert_eq!(compute_trend(&stack, &[0]), Err(TrendError::ShapeMismatch));
    }

    #[test]
    fn test_degenerate_year_indices_mask_everything() {
        // same year index twice: zero denominator, recovered as NoData
        let stack = vec![
            raster_2x2([Some(0.2), Some(0.5), Some(0.9), Some(0.4)]),
            raster_2x2([Some(0.6), Some(0.3), Some(0.9), Some(0.8)]),
        ];
        let trend = compute_trend(&stack, &[1, 1]).unwrap();
        assert!(trend.is_all_no_data());
    }

    #[test]
    fn test_flat_stack_gives_zero_trend_and_unit_limit() {
        let flat = raster_2x2([Some(1.0), Some(1.0), Some(1.0), Some(1.0)]);
        let stack = vec![flat.clone(), flat.clone(), flat];
        let trend = compute_trend(&stack, &[0, 1, 2]).unwrap();
        for row in 0..2 {
            for col in 0..2 {
                assert!((trend.get(row, col).unwrap().value().unwrap()).abs() < EPS);
            }
        }
        assert_eq!(display_limit(&trend), 1.0);
    }

    #[test]
    fn test_display_limit_percentile() {
        // 51 magnitudes 0.0, 0.01, ..., 0.50: the 98th percentile sits at
        // rank 0.98 * 50 = 49, i.e. 0.49
        let cells: Vec<Cell> = (0..51).map(|i| Cell::Valid(i as f64 * 0.01)).collect();
        let map = Raster::from_cells(51, 1, cells).unwrap();
        assert!((display_limit(&map) - 0.49).abs() < EPS);
    }

    #[test]
    fn test_display_limit_empty_map() {
        assert_eq!(display_limit(&Raster::filled_no_data(4, 4)), 1.0);
    }

    #[test]
    fn test_display_limit_uses_absolute_values() {
        let cells = vec![Cell::Valid(-0.8), Cell::Valid(0.1), Cell::NoData];
        let map = Raster::from_cells(3, 1, cells).unwrap();
        // 98th percentile of |{-0.8, 0.1}| interpolates at rank 0.98
        let expected = 0.1 + 0.98 * (0.8 - 0.1);
        assert!((display_limit(&map) - expected).abs() < EPS);
    }
}
