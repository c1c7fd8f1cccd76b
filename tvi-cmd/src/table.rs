//! The periods-by-years comparison table, in memory and as CSV.
//!
//! One row per bi-weekly period, one column per year, a `Period` label
//! column first. Missing observations are carried as `0.0`, which the
//! analysis layer treats as below any positive cutoff.

use anyhow::Context;
use tvi_utils::periods::{PERIOD_COUNT, PERIOD_LABELS};

/// A periods-by-years table of mean index values.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub years: Vec<i32>,
    /// `PERIOD_COUNT` rows, each holding one value per year.
    pub rows: Vec<Vec<f64>>,
}

impl ComparisonTable {
    /// A table over the given years with every value zeroed.
    pub fn empty(years: Vec<i32>) -> ComparisonTable {
        let width = years.len();
        ComparisonTable {
            years,
            rows: vec![vec![0.0; width]; PERIOD_COUNT],
        }
    }

    /// The full period series for the year at `year_idx`.
    pub fn year_column(&self, year_idx: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[year_idx]).collect()
    }

    pub fn set_value(&mut self, period_idx: usize, year_idx: usize, value: f64) {
        self.rows[period_idx][year_idx] = value;
    }

    pub fn set_year_column(&mut self, year_idx: usize, column: &[f64]) {
        for (row, &value) in self.rows.iter_mut().zip(column) {
            row[year_idx] = value;
        }
    }
}

/// Parse a comparison table from CSV text.
///
/// The header is `Period,Year {y},...`; every following row carries the
/// period label then one value per year. Empty and unparseable cells
/// come back as `0.0`, so a hand-edited table never aborts a run.
pub fn parse_table(csv_text: &str) -> anyhow::Result<ComparisonTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = rdr.headers().context("comparison table has no header")?;
    let mut years = Vec::new();
    for header in headers.iter().skip(1) {
        let year: i32 = header
            .trim()
            .trim_start_matches("Year")
            .trim()
            .parse()
            .with_context(|| format!("bad year column header '{}'", header))?;
        years.push(year);
    }
    anyhow::ensure!(!years.is_empty(), "comparison table has no year columns");

    let mut table = ComparisonTable::empty(years);
    let mut period_idx = 0;
    for result in rdr.records() {
        let record = result.context("failed to read comparison table row")?;
        anyhow::ensure!(
            period_idx < PERIOD_COUNT,
            "comparison table has more than {} period rows",
            PERIOD_COUNT
        );
        for (year_idx, cell) in record.iter().skip(1).enumerate() {
            if year_idx >= table.years.len() {
                break;
            }
            let value = cell.trim().parse().unwrap_or(0.0);
            table.rows[period_idx][year_idx] = value;
        }
        period_idx += 1;
    }
    anyhow::ensure!(
        period_idx == PERIOD_COUNT,
        "comparison table has {} period rows, expected {}",
        period_idx,
        PERIOD_COUNT
    );
    Ok(table)
}

/// Format a comparison table as CSV text.
pub fn format_table(table: &ComparisonTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Period".to_string()];
    header.extend(table.years.iter().map(|y| format!("Year {}", y)));
    wtr.write_record(&header)?;

    for (label, row) in PERIOD_LABELS.iter().zip(&table.rows) {
        let mut record = vec![label.to_string()];
        record.extend(row.iter().map(|v| format!("{:.4}", v)));
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().context("failed to flush table writer")?;
    Ok(String::from_utf8(bytes)?)
}

/// Read a comparison table from a CSV file.
pub fn read_table(path: &str) -> anyhow::Result<ComparisonTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table from {}", path))?;
    parse_table(&text)
}

/// Write a comparison table to a CSV file.
pub fn write_table(path: &str, table: &ComparisonTable) -> anyhow::Result<()> {
    let text = format_table(table)?;
    std::fs::write(path, text).with_context(|| format!("failed to write table to {}", path))
}
