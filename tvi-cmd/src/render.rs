//! Trend map rendering: diverging red-white-green PNG, transparent where
//! the map has no data.

use anyhow::Context;
use image::{Rgba, RgbaImage};
use tvi_sentinel::raster::{Cell, Raster};

/// Color for pixels with no usable observations.
const NO_DATA_COLOR: Rgba<u8> = Rgba([128, 128, 128, 0]);

/// Map a trend value onto the symmetric red-white-green ramp.
///
/// `limit` is the positive half-width of the color scale: `-limit` is
/// fully red, `0.0` white, `+limit` fully green. Values beyond the limit
/// saturate.
fn ramp(value: f64, limit: f64) -> Rgba<u8> {
    let t = (value / limit).clamp(-1.0, 1.0);
    let channel = |fraction: f64| (255.0 * (1.0 - fraction)).round() as u8;
    if t < 0.0 {
        // white toward red: fade green and blue
        Rgba([255, channel(-t), channel(-t), 255])
    } else {
        // white toward green: fade red and blue
        Rgba([channel(t), 255, channel(t), 255])
    }
}

/// Render a trend map to an RGBA image with the given color-scale limit.
pub fn render_trend_map(trend_map: &Raster, limit: f64) -> RgbaImage {
    let (width, height) = trend_map.shape();
    let mut img = RgbaImage::new(width as u32, height as u32);
    for (i, cell) in trend_map.cells().iter().enumerate() {
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        let pixel = match cell {
            Cell::Valid(v) => ramp(*v, limit),
            Cell::NoData => NO_DATA_COLOR,
        };
        img.put_pixel(x, y, pixel);
    }
    img
}

/// Render a trend map and write it as a PNG.
pub fn write_trend_png(trend_map: &Raster, limit: f64, path: &str) -> anyhow::Result<()> {
    let img = render_trend_map(trend_map, limit);
    img.save(path)
        .with_context(|| format!("failed to write trend map to {}", path))
}

#[cfg(test)]
mod tests {
    use super::{ramp, render_trend_map, NO_DATA_COLOR};
    use image::Rgba;
    use tvi_sentinel::raster::{Cell, Raster};

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp(0.0, 1.0), Rgba([255, 255, 255, 255]));
        assert_eq!(ramp(1.0, 1.0), Rgba([0, 255, 0, 255]));
        assert_eq!(ramp(-1.0, 1.0), Rgba([255, 0, 0, 255]));
        // beyond the limit saturates
        assert_eq!(ramp(5.0, 1.0), Rgba([0, 255, 0, 255]));
        assert_eq!(ramp(-5.0, 1.0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_ramp_midpoints() {
        // halfway to green: red and blue half faded
        let Rgba([r, g, b, a]) = ramp(0.5, 1.0);
        assert_eq!((g, a), (255, 255));
        assert_eq!(r, b);
        assert!(r > 100 && r < 155);
    }

    #[test]
    fn test_render_trend_map_pixels() {
        let raster = Raster::from_cells(
            2,
            1,
            vec![Cell::Valid(0.0), Cell::NoData],
        )
        .unwrap();
        let img = render_trend_map(&raster, 1.0);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(1, 0), NO_DATA_COLOR);
    }
}
