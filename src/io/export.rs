//! CSV export for analysed trendlines.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::timeline::is_forecast_label;
use crate::trend::TrendAnalysis;

/// Column header for trendline CSV export.
const HEADER: &str = "index,label,trend,forecast";

/// Exports an analysed trendline to a CSV file at the given path.
///
/// Writes a header row followed by one row per trendline point, forecast
/// points included. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns a `csv::Error` if file creation or writing fails.
pub fn export_csv(analysis: &TrendAnalysis, path: &Path) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(analysis, buf)
}

/// Writes an analysed trendline as CSV to any writer.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_csv(analysis: &TrendAnalysis, writer: impl Write) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (i, (value, label)) in analysis
        .trendline
        .iter()
        .zip(&analysis.labels)
        .enumerate()
    {
        wtr.write_record(&[
            i.to_string(),
            label.clone(),
            format!("{value:.4}"),
            is_forecast_label(label).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
