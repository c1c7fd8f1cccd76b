//! Core types for Trnava vegetation monitoring: green-space geometry,
//! vegetation-index evalscripts, rasters, and (feature `api`) the
//! Sentinel Hub Process API client.

pub mod config;
pub mod evalscript;
pub mod geometry;
pub mod green_space;
pub mod process;
pub mod raster;
