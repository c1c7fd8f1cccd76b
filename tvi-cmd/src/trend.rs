//! Long-term trend command: fetch one seasonal raster per year, estimate
//! the per-pixel trend map, and render it.

use crate::render;
use log::{info, warn};
use tvi_analysis::trend::{compute_trend, display_limit};
use tvi_sentinel::config::SentinelConfig;
use tvi_sentinel::evalscript::{MaskedAs, VegetationIndex};
use tvi_sentinel::green_space::GreenSpace;
use tvi_sentinel::process::{fetch_raster, fetch_token};
use tvi_sentinel::raster::Raster;
use tvi_utils::season::Season;

/// Run a long-term trend analysis over a range of years.
///
/// Fetches one NaN-masked seasonal composite per year, skips years with no
/// usable data, and writes the per-pixel OLS trend map as a diverging PNG.
pub async fn run_trend(
    years: &[i32],
    season_name: &str,
    green_space_slug: &str,
    index_name: &str,
    output_png: &str,
    size: usize,
) -> anyhow::Result<()> {
    let season: Season = season_name.parse()?;
    let index: VegetationIndex = index_name.parse()?;
    let green_space = GreenSpace::find_by_slug(green_space_slug)
        .ok_or_else(|| anyhow::anyhow!("unknown green space '{}'", green_space_slug))?;

    let config = SentinelConfig::from_env()?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let token = fetch_token(&client, &config).await?;

    info!(
        "Trend analysis of {} {} over {} years ({} season)",
        green_space.name,
        index.as_str(),
        years.len(),
        season.as_str()
    );

    let mut stack: Vec<Raster> = Vec::new();
    let mut kept_years: Vec<i32> = Vec::new();
    for &year in years {
        let (start, end) = season.date_bounds(year);
        let raster = fetch_raster(
            &client,
            &config,
            &token,
            &green_space,
            start,
            end,
            index,
            MaskedAs::Nan,
            size,
            size,
        )
        .await;
        match raster {
            Some(raster) if !raster.is_all_no_data() => {
                info!(
                    "Year {}: {} of {} pixels valid",
                    year,
                    raster.count_valid(),
                    size * size
                );
                stack.push(raster);
                kept_years.push(year);
            }
            Some(_) => warn!("Year {}: raster has no valid pixels, skipping", year),
            None => warn!("Year {}: fetch failed, skipping", year),
        }
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }

    anyhow::ensure!(
        kept_years.len() >= 2,
        "only {} of {} years produced usable rasters, need at least 2",
        kept_years.len(),
        years.len()
    );

    let year_indices: Vec<i32> = (0..kept_years.len() as i32).collect();
    let trend_map = compute_trend(&stack, &year_indices)?;
    let limit = display_limit(&trend_map);
    info!(
        "Trend map over years {:?}: color scale limit {:.5}",
        kept_years, limit
    );

    render::write_trend_png(&trend_map, limit, output_png)?;
    info!("Trend analysis complete. Output: {}", output_png);
    Ok(())
}
