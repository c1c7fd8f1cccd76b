//! Full query implementation: per-period mean index values over a range
//! of years, written as a raw comparison table.

use crate::table::{self, ComparisonTable};
use log::{info, warn};
use tvi_sentinel::config::SentinelConfig;
use tvi_sentinel::evalscript::{MaskedAs, VegetationIndex};
use tvi_sentinel::green_space::GreenSpace;
use tvi_sentinel::process::{fetch_raster, fetch_token};
use tvi_utils::periods::{period_bounds, PERIOD_COUNT, PERIOD_LABELS};

const RASTER_WIDTH: usize = 1000;
const RASTER_HEIGHT: usize = 1000;

/// Run a full query of per-period mean index values.
///
/// For each year and each bi-weekly period, fetches one least-cloud-cover
/// raster for the green space and records its area mean restricted to
/// values above the cutoff. Periods with no usable acquisition stay at
/// `0.0`; the interpolate command fills them afterwards.
pub async fn run_query(
    output_csv: &str,
    green_space_slug: &str,
    start_year: i32,
    end_year: i32,
    index_name: &str,
    cutoff: f64,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        start_year <= end_year,
        "start year {} is after end year {}",
        start_year,
        end_year
    );
    let green_space = GreenSpace::find_by_slug(green_space_slug)
        .ok_or_else(|| anyhow::anyhow!("unknown green space '{}'", green_space_slug))?;
    let index: VegetationIndex = index_name.parse()?;

    let config = SentinelConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let token = fetch_token(&client, &config).await?;

    let years: Vec<i32> = (start_year..=end_year).collect();
    info!(
        "Querying {} {} over {} periods per year, {} to {}",
        green_space.name,
        index.as_str(),
        PERIOD_LABELS.len(),
        start_year,
        end_year
    );

    let mut result = ComparisonTable::empty(years.clone());
    for (year_idx, &year) in years.iter().enumerate() {
        for period_idx in 0..PERIOD_COUNT {
            let (start, end) = match period_bounds(year, period_idx) {
                Some(bounds) => bounds,
                None => continue,
            };
            let raster = fetch_raster(
                &client,
                &config,
                &token,
                &green_space,
                start,
                end,
                index,
                MaskedAs::Zero,
                RASTER_WIDTH,
                RASTER_HEIGHT,
            )
            .await;

            match raster.and_then(|r| r.mean_above(cutoff)) {
                Some(mean) => {
                    info!(
                        "{} {} to {}: mean {:.4}",
                        green_space.name, start, end, mean
                    );
                    result.set_value(period_idx, year_idx, mean);
                }
                None => {
                    warn!(
                        "{} {} to {}: no usable data, leaving 0.0",
                        green_space.name, start, end
                    );
                }
            }

            // Be polite to the Process API
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
    }

    table::write_table(output_csv, &result)?;
    info!("Query complete. Output: {}", output_csv);
    Ok(())
}
