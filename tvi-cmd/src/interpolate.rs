//! Gap-filling pass over a raw comparison table.

use crate::chart;
use crate::table;
use log::{info, warn};
use tvi_analysis::gap_fill::fill_gaps;

/// Fill the gaps of every year column of a raw comparison table and write
/// the interpolated table, optionally with a yearly comparison chart.
///
/// A year whose column cannot be filled (no valid sample at all) keeps its
/// raw values and is reported, never aborts the run.
pub fn run_interpolate(
    input_csv: &str,
    output_csv: &str,
    cutoff: f64,
    chart_png: Option<&str>,
) -> anyhow::Result<()> {
    let mut result = table::read_table(input_csv)?;
    info!(
        "Interpolating {} year columns from {}",
        result.years.len(),
        input_csv
    );

    for year_idx in 0..result.years.len() {
        let column = result.year_column(year_idx);
        match fill_gaps(&column, cutoff) {
            Ok(filled) => result.set_year_column(year_idx, &filled),
            Err(e) => {
                warn!(
                    "Year {}: {}, keeping raw values",
                    result.years[year_idx], e
                );
            }
        }
    }

    table::write_table(output_csv, &result)?;
    info!("Interpolation complete. Output: {}", output_csv);

    if let Some(path) = chart_png {
        chart::render_comparison_chart(&result, path)?;
        info!("Comparison chart written to {}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_interpolate;
    use crate::table;
    use tvi_utils::periods::PERIOD_COUNT;

    #[test]
    fn test_interpolate_fills_zero_cells() {
        let dir = std::env::temp_dir();
        let input = dir.join("tvi_interp_in.csv");
        let output = dir.join("tvi_interp_out.csv");

        let mut raw = table::ComparisonTable::empty(vec![2023]);
        for i in 0..PERIOD_COUNT {
            // one gap at period 5, everything else valid
            if i != 5 {
                raw.set_value(i, 0, 0.5 + 0.01 * i as f64);
            }
        }
        table::write_table(input.to_str().unwrap(), &raw).unwrap();

        run_interpolate(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            0.4,
            None,
        )
        .unwrap();

        let filled = table::read_table(output.to_str().unwrap()).unwrap();
        assert!(filled.rows[5][0] > 0.4);
        assert!((filled.rows[0][0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_interpolate_keeps_unfillable_column() {
        let dir = std::env::temp_dir();
        let input = dir.join("tvi_interp_empty_in.csv");
        let output = dir.join("tvi_interp_empty_out.csv");

        let raw = table::ComparisonTable::empty(vec![2023]);
        table::write_table(input.to_str().unwrap(), &raw).unwrap();

        run_interpolate(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            0.4,
            None,
        )
        .unwrap();

        let result = table::read_table(output.to_str().unwrap()).unwrap();
        assert_eq!(result.year_column(0), vec![0.0; PERIOD_COUNT]);
    }
}
