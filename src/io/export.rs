//! CSV export for per-hour day-summary rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::summary::DaySummary;

/// Column header for the day-summary CSV export.
const HEADER: &str = "hour,delivered_kwh,unmet_kwh,wasted_kwh,allocations";

/// Exports the day summary to a CSV file at the given path.
///
/// Writes a header row followed by one data row per closed hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(summary: &DaySummary, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(summary, buf)
}

/// Writes the day summary as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(summary: &DaySummary, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for row in summary.hours() {
        wtr.write_record(&[
            row.hour.to_string(),
            format!("{:.4}", row.delivered_kwh),
            format!("{:.4}", row.unmet_kwh),
            format!("{:.4}", row.wasted_kwh),
            row.allocation_count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
