//! # pdf2csv
//!
//! Convert the tables of a PDF document into CSV.
//!
//! Every page is scanned for tables using text alignment. Table rows are
//! emitted in page order; a page without tables contributes its text, one
//! single-cell row per non-blank line. The rows are written as header-less
//! UTF-8 CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2csv::convert_file;
//!
//! fn main() -> pdf2csv::Result<()> {
//!     let conversion = convert_file("report.pdf")?;
//!
//!     println!("{}", conversion.preview_table(10));
//!     println!("{} rows", conversion.row_count());
//!     conversion.save(&conversion.file_name)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failures
//!
//! Two failures are expected in normal use and are told apart with
//! [`Error::kind`]:
//!
//! - [`ErrorKind::DocumentRead`]: the bytes are not a readable PDF
//!   (corrupted, truncated, encrypted or empty).
//! - [`ErrorKind::NoDataExtracted`]: the PDF opened but no page held any
//!   table or text, as with scanned or blank documents.
//!
//! [`Error::user_message`] gives the text to show for either.

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{Conversion, Converter};
pub use detect::{detect_pdf_version, is_pdf_bytes};
pub use error::{Error, ErrorKind, Result};
pub use model::{Cell, ExtractionStats, PageContent, PageKind, Row, RowOrigin, RowSet, Table};
pub use parser::{ErrorMode, ExtractOptions, PdfExtractor, TableDetectorConfig};

use std::path::Path;

/// Convert an in-memory PDF to CSV with default options.
///
/// `name` is the uploaded document's file name; the CSV name is derived
/// from it.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("invoice.pdf").unwrap();
/// let conversion = pdf2csv::convert_bytes(&data, "invoice.pdf").unwrap();
/// assert_eq!(conversion.file_name, "invoice.csv");
/// ```
pub fn convert_bytes(data: &[u8], name: &str) -> Result<Conversion> {
    Converter::new().convert_bytes(data, name)
}

/// Convert a PDF file to CSV with default options.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Conversion> {
    Converter::new().convert_file(path)
}

/// Extract rows from an in-memory PDF without serializing them.
///
/// Fails with [`Error::NoDataExtracted`] when the document yields no rows.
pub fn extract_rows(data: &[u8]) -> Result<RowSet> {
    Converter::new().extract_rows(data)
}
