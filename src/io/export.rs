//! CSV export for rate previews.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::preview::PreviewRow;

/// Column header for preview CSV export.
const HEADER: &str = "category,local_time,season,weekend,base_rate,rate";

/// Exports preview rows to a CSV file at the given path.
///
/// # Arguments
///
/// * `rows` - Preview rows, written in order
/// * `path` - Output file path (created or truncated)
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[PreviewRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes preview rows as CSV to any writer.
///
/// Local times are RFC 3339 with their UTC offset; rates keep two decimals.
///
/// # Arguments
///
/// * `rows` - Preview rows, written in order
/// * `writer` - Destination for the header and one record per row
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[PreviewRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in rows {
        wtr.write_record(&[
            r.category.to_string(),
            r.local_time.to_rfc3339(),
            r.season.to_string(),
            r.weekend.to_string(),
            format!("{:.2}", r.base_rate),
            format!("{:.2}", r.rate),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
