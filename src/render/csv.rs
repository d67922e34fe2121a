//! CSV serialization of extracted rows.

use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::Result;
use crate::model::RowSet;

/// MIME type of the serialized output.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Serialize rows to UTF-8 CSV bytes.
///
/// No header row or index column is written. Rows keep their own width,
/// and missing cells become empty fields.
pub fn to_csv(rows: &RowSet) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

/// Serialize rows as CSV into a writer.
pub fn write_csv<W: Write>(rows: &RowSet, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for row in rows {
        wtr.write_record(row.values())?;
    }
    wtr.flush()?;

    log::debug!("Wrote {} CSV records", rows.len());
    Ok(())
}

/// Derive the CSV file name from the uploaded document's name.
///
/// Only the final path component is used. A trailing `.pdf` (exact case)
/// is replaced with `.csv`; any other name gets `.csv` appended.
pub fn output_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = base.strip_suffix(".pdf").unwrap_or(&base);
    if stem.is_empty() {
        return "output.csv".to_string();
    }
    format!("{}.csv", stem)
}
