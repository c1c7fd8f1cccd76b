//! Command implementations for the TVI CLI.
//!
//! Provides subcommands for downloading per-period vegetation-index
//! values, gap-filling comparison tables, and rendering long-term trend
//! maps from Sentinel-2 data.

use clap::Subcommand;

pub mod chart;
pub mod interpolate;
pub mod query;
pub mod render;
pub mod table;
pub mod trend;

#[derive(Subcommand)]
pub enum Command {
    /// Download per-period mean index values and write the raw comparison table
    Query {
        /// Output path for the periods x years CSV table
        #[arg(short = 'o', long)]
        output_csv: String,

        /// Green space to analyze (slug from the embedded fixture)
        #[arg(short = 'g', long, default_value = "trnava")]
        green_space: String,

        /// First year of the comparison window
        #[arg(long)]
        start_year: i32,

        /// Last year of the comparison window (inclusive)
        #[arg(long)]
        end_year: i32,

        /// Vegetation index to compute (ndvi, lci, mcari, osavi)
        #[arg(long, default_value = "ndvi")]
        index: String,

        /// Validity cutoff for the area mean
        #[arg(long, default_value_t = 0.4)]
        cutoff: f64,
    },

    /// Fill gaps in a raw comparison table and write the interpolated table
    Interpolate {
        /// Path to the raw periods x years CSV table
        #[arg(short = 'i', long)]
        input_csv: String,

        /// Output path for the interpolated CSV table
        #[arg(short = 'o', long)]
        output_csv: String,

        /// Samples at or below this value count as missing
        #[arg(long, default_value_t = 0.4)]
        cutoff: f64,

        /// Optional output path for a yearly comparison line chart PNG
        #[arg(long)]
        chart_png: Option<String>,
    },

    /// Estimate the per-pixel trend map over a range of years and render it
    Trend {
        /// Years to analyze, e.g. --years 2022 2023 2024 (at least two)
        #[arg(long, num_args = 2.., required = true)]
        years: Vec<i32>,

        /// Season window within each year (early_spring, mid_spring, late_spring, year)
        #[arg(long, default_value = "late_spring")]
        season: String,

        /// Green space to analyze (slug from the embedded fixture)
        #[arg(short = 'g', long, default_value = "trnava")]
        green_space: String,

        /// Vegetation index to compute (ndvi, lci, mcari, osavi)
        #[arg(long, default_value = "ndvi")]
        index: String,

        /// Output path for the rendered trend map PNG
        #[arg(short = 'o', long)]
        output_png: String,

        /// Raster width and height in pixels
        #[arg(long, default_value_t = 500)]
        size: usize,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Query {
            output_csv,
            green_space,
            start_year,
            end_year,
            index,
            cutoff,
        } => {
            query::run_query(&output_csv, &green_space, start_year, end_year, &index, cutoff).await
        }
        Command::Interpolate {
            input_csv,
            output_csv,
            cutoff,
            chart_png,
        } => interpolate::run_interpolate(&input_csv, &output_csv, cutoff, chart_png.as_deref()),
        Command::Trend {
            years,
            season,
            green_space,
            index,
            output_png,
            size,
        } => trend::run_trend(&years, &season, &green_space, &index, &output_png, size).await,
    }
}
