//! CSV export for per-step run telemetry.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepRecord;

/// Column header for CSV telemetry export.
const HEADER: &str = "step,time_hr,sunlight_wm2,wind_ms,consumption_kwh,\
                      generated_kwh,net_kwh,cost_usd";

/// Exports step records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Step records from a finished run
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes step records as CSV to any writer.
///
/// # Arguments
///
/// * `records` - Step records from a finished run
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        let report = &r.report;
        wtr.write_record(&[
            r.step.to_string(),
            format!("{:.2}", r.time_hr),
            format!("{:.2}", r.inputs.sunlight_intensity_wm2),
            format!("{:.3}", r.inputs.wind_speed_ms),
            format!("{:.6}", report.total_consumption_kwh),
            format!("{:.6}", report.total_generated_kwh),
            format!("{:.6}", report.net_consumption_kwh),
            format!("{:.6}", report.cost_usd),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
