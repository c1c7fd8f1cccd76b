//! Numerical post-processing for vegetation-index data.
//!
//! Two independent, stateless components over in-memory arrays:
//! gap-filling interpolation for per-period annual series, and per-pixel
//! long-term trend estimation over stacks of yearly rasters.

pub mod gap_fill;
pub mod trend;
