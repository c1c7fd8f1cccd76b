/// One raster cell: a finite vegetation-index value or no observation.
///
/// An explicit tri-state instead of a NaN sentinel, so arithmetic on
/// missing cells is a compile-time impossibility rather than a silent NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Valid(f64),
    NoData,
}

impl Cell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Valid(v) => Some(*v),
            Cell::NoData => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Cell::Valid(_))
    }
}

/// A row-major 2-D grid of cells, one per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Raster {
    /// A raster with every cell set to `NoData`.
    pub fn filled_no_data(width: usize, height: usize) -> Raster {
        Raster {
            width,
            height,
            cells: vec![Cell::NoData; width * height],
        }
    }

    /// Build a raster from row-major cells. The cell count must match the
    /// declared shape.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> anyhow::Result<Raster> {
        anyhow::ensure!(
            cells.len() == width * height,
            "raster shape {}x{} does not match {} cells",
            width,
            height,
            cells.len()
        );
        Ok(Raster {
            width,
            height,
            cells,
        })
    }

    /// Build a raster from decoded FLOAT32 samples.
    ///
    /// Non-finite samples and the API's `0.0` no-data fill both map to
    /// `NoData`; everything else is carried as a valid value.
    pub fn from_f32_samples(
        width: usize,
        height: usize,
        samples: &[f32],
    ) -> anyhow::Result<Raster> {
        let cells = samples
            .iter()
            .map(|&sample| {
                if sample.is_finite() && sample != 0.0 {
                    Cell::Valid(f64::from(sample))
                } else {
                    Cell::NoData
                }
            })
            .collect();
        Raster::from_cells(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Iterator over the finite values of the raster.
    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(Cell::value)
    }

    pub fn count_valid(&self) -> usize {
        self.cells.iter().filter(|c| c.is_valid()).count()
    }

    pub fn is_all_no_data(&self) -> bool {
        self.count_valid() == 0
    }

    /// Area mean of the raster restricted to values strictly above `cutoff`.
    ///
    /// When no value clears the cutoff the mean of all valid values is used
    /// instead; a raster with no valid values at all yields `None`.
    pub fn mean_above(&self, cutoff: f64) -> Option<f64> {
        let (sum, count) = self
            .valid_values()
            .filter(|&v| v > cutoff)
            .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
        if count > 0 {
            return Some(sum / count as f64);
        }
        let (sum, count) = self
            .valid_values()
            .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
        if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Raster};

    #[test]
    fn test_from_f32_samples_maps_sentinels() {
        let samples = [0.5_f32, 0.0, f32::NAN, -0.2];
        let raster = Raster::from_f32_samples(2, 2, &samples).unwrap();
        assert_eq!(raster.get(0, 0), Some(Cell::Valid(0.5)));
        assert_eq!(raster.get(0, 1), Some(Cell::NoData));
        assert_eq!(raster.get(1, 0), Some(Cell::NoData));
        assert!(raster.get(1, 1).unwrap().is_valid());
        assert_eq!(raster.count_valid(), 2);
    }

    #[test]
    fn test_from_cells_shape_check() {
        assert!(Raster::from_cells(2, 2, vec![Cell::NoData; 3]).is_err());
        assert!(Raster::from_cells(2, 2, vec![Cell::NoData; 4]).is_ok());
    }

    #[test]
    fn test_mean_above_cutoff() {
        let raster = Raster::from_cells(
            2,
            2,
            vec![
                Cell::Valid(0.6),
                Cell::Valid(0.8),
                Cell::Valid(0.1),
                Cell::NoData,
            ],
        )
        .unwrap();
        let mean = raster.mean_above(0.4).unwrap();
        assert!((mean - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_mean_above_falls_back_to_all_valid() {
        let raster = Raster::from_cells(
            2,
            1,
            vec![Cell::Valid(0.1), Cell::Valid(0.3)],
        )
        .unwrap();
        // nothing clears the 0.4 cutoff, fall back to the plain valid mean
        let mean = raster.mean_above(0.4).unwrap();
        assert!((mean - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_mean_above_empty_raster() {
        let raster = Raster::filled_no_data(3, 3);
        assert!(raster.is_all_no_data());
        assert_eq!(raster.mean_above(0.4), None);
    }
}
