//! Yearly comparison line chart over the period calendar.

use crate::table::ComparisonTable;
use plotters::prelude::*;
use tvi_utils::periods::{PERIOD_COUNT, PERIOD_LABELS};

const CHART_WIDTH: u32 = 1400;
const CHART_HEIGHT: u32 = 700;

/// Line colors cycled over the year series.
fn series_color(idx: usize) -> RGBColor {
    const PALETTE: [RGBColor; 6] = [
        RED,
        BLUE,
        GREEN,
        RGBColor(165, 42, 42),
        CYAN,
        MAGENTA,
    ];
    PALETTE[idx % PALETTE.len()]
}

/// Render one line per year over the twelve bi-weekly periods.
pub fn render_comparison_chart(table: &ComparisonTable, path: &str) -> anyhow::Result<()> {
    let backend_drawing_area =
        BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    backend_drawing_area
        .fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("failed to fill chart background: {}", e))?;

    let mut chart = ChartBuilder::on(&backend_drawing_area)
        .margin(20i32)
        .caption("Mean index per period", ("sans-serif", 30))
        .x_label_area_size(40u32)
        .y_label_area_size(50u32)
        .build_cartesian_2d(0usize..PERIOD_COUNT - 1, 0f64..1f64)
        .map_err(|e| anyhow::anyhow!("failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .x_labels(PERIOD_COUNT)
        .x_label_formatter(&|idx| {
            PERIOD_LABELS
                .get(*idx)
                .map(|label| label.to_string())
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| anyhow::anyhow!("failed to draw chart mesh: {}", e))?;

    for (year_idx, &year) in table.years.iter().enumerate() {
        let color = series_color(year_idx);
        let points: Vec<(usize, f64)> = table
            .year_column(year_idx)
            .into_iter()
            .enumerate()
            .collect();
        chart
            .draw_series(LineSeries::new(points, color))
            .map_err(|e| anyhow::anyhow!("failed to draw series for {}: {}", year, e))?
            .label(format!("{}", year))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow::anyhow!("failed to draw chart legend: {}", e))?;
    backend_drawing_area
        .present()
        .map_err(|e| anyhow::anyhow!("failed to write chart to {}: {}", path, e))?;
    Ok(())
}
