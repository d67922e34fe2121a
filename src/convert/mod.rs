//! End-to-end conversion of a PDF document into CSV.
//!
//! A [`Converter`] runs the whole pipeline for one document: extraction,
//! validation of the row set and serialization. Nothing is returned until
//! every step has succeeded, so a failed conversion never leaves partial
//! CSV behind.
//!
//! # Example
//!
//! ```no_run
//! use pdf2csv::{Converter, ExtractOptions};
//!
//! fn main() -> pdf2csv::Result<()> {
//!     let converter = Converter::new().with_options(ExtractOptions::new().lenient());
//!     let conversion = converter.convert_file("statement.pdf")?;
//!     std::fs::write(&conversion.file_name, &conversion.csv)?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Row, RowSet};
use crate::parser::{ExtractOptions, PdfExtractor};
use crate::render::{output_file_name, preview_table, to_csv, CSV_MIME_TYPE};

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Suggested name for the CSV file
    pub file_name: String,

    /// MIME type of `csv`
    pub mime_type: &'static str,

    /// Serialized CSV bytes (UTF-8)
    pub csv: Vec<u8>,

    /// Rows the CSV was built from
    pub rows: RowSet,

    /// Number of pages in the source document
    pub page_count: u32,
}

impl Conversion {
    /// The first `n` rows.
    pub fn preview(&self, n: usize) -> &[Row] {
        self.rows.preview(n)
    }

    /// The first `n` rows as a fixed-width text table.
    pub fn preview_table(&self, n: usize) -> String {
        preview_table(&self.rows, n)
    }

    /// Total number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Write the CSV bytes to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.csv)?;
        Ok(())
    }
}

/// Converts PDF documents to CSV.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ExtractOptions,
}

impl Converter {
    /// Create a converter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Extraction options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Convert an in-memory PDF. `name` is the document's original file
    /// name, used to derive [`Conversion::file_name`].
    pub fn convert_bytes(&self, data: &[u8], name: &str) -> Result<Conversion> {
        let (rows, page_count) = catch_panics(|| {
            let extractor = PdfExtractor::from_bytes_with_options(data, self.options.clone())?;
            Ok((extractor.extract()?.validate()?, extractor.page_count()))
        })?;
        let csv = to_csv(&rows)?;
        let file_name = output_file_name(name);

        log::info!(
            "Converted {} ({} pages) to {}: {} rows, {} bytes",
            name,
            page_count,
            file_name,
            rows.len(),
            csv.len()
        );

        Ok(Conversion {
            file_name,
            mime_type: CSV_MIME_TYPE,
            csv,
            rows,
            page_count,
        })
    }

    /// Convert a PDF file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<Conversion> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.convert_bytes(&data, &name)
    }

    /// Extract and validate rows without serializing them.
    pub fn extract_rows(&self, data: &[u8]) -> Result<RowSet> {
        catch_panics(|| {
            PdfExtractor::from_bytes_with_options(data, self.options.clone())?
                .extract()?
                .validate()
        })
    }
}

/// Run a pipeline step, reporting a panic inside the PDF stack as
/// [`Error::Other`] instead of unwinding into the caller.
fn catch_panics<T>(step: impl FnOnce() -> Result<T>) -> Result<T> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(step)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        log::error!("PDF processing panicked: {}", detail);
        Err(Error::Other(format!(
            "PDF processing failed unexpectedly: {}",
            detail
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_converter_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
        assert_send_sync::<Conversion>();
    }

    #[test]
    fn test_non_pdf_is_document_read_error() {
        let err = Converter::new()
            .convert_bytes(b"PK\x03\x04 not a pdf", "report.pdf")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DocumentRead);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Converter::new()
            .convert_file("/nonexistent/dir/report.pdf")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_panic_becomes_error() {
        let result: Result<()> = catch_panics(|| panic!("object.rs assertion"));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(
            err.user_message(),
            "An error occurred: PDF processing failed unexpectedly: object.rs assertion"
        );
    }

    #[test]
    fn test_step_result_passes_through() {
        assert_eq!(catch_panics(|| Ok(7)).unwrap(), 7);
        assert!(matches!(
            catch_panics::<()>(|| Err(Error::NoDataExtracted)),
            Err(Error::NoDataExtracted)
        ));
    }

    #[test]
    fn test_with_options() {
        let converter = Converter::new().with_options(ExtractOptions::new().text_only());
        assert!(!converter.options().detect_tables);
    }
}
