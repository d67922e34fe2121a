//! Page-by-page row extraction.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{PageContent, RowSet};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::layout::{page_text, SpanExtractor};
use super::options::{ErrorMode, ExtractOptions};
use super::table_detector::TableDetector;

/// Extracts tables, or failing that text lines, from every page of a PDF.
pub struct PdfExtractor<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ExtractOptions,
}

impl PdfExtractor<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        log::debug!("PdfExtractor: loaded PDF {}", backend.version());
        Ok(Self::with_backend(backend, options))
    }
}

impl<B: PdfBackend> PdfExtractor<B> {
    /// Create an extractor over an already opened backend.
    pub fn with_backend(backend: B, options: ExtractOptions) -> Self {
        Self { backend, options }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Extraction options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract every page in document order and flatten the results.
    ///
    /// The returned set may be empty; see [`RowSet::validate`].
    pub fn extract(&self) -> Result<RowSet> {
        let pages = self.backend.pages();
        log::info!("Extracting {} pages", pages.len());

        let mut rows = RowSet::new();
        for (number, page_id) in pages {
            match self.extract_page(number, page_id) {
                Ok(content) => rows.push_page(content),
                Err(e) => match self.options.error_mode {
                    ErrorMode::Strict => return Err(page_error(number, e)),
                    ErrorMode::Lenient => {
                        log::warn!("Skipping page {}: {}", number, e);
                        rows.push_page(PageContent::empty(number));
                    }
                },
            }
        }

        log::info!("Extracted {}", rows.stats());
        Ok(rows)
    }

    /// Extract a single page: its tables if any are found, else its text.
    pub fn extract_page(&self, number: u32, page: PageId) -> Result<PageContent> {
        let spans = SpanExtractor::new(&self.backend).extract_page_spans(page)?;
        if spans.is_empty() {
            return Ok(PageContent::empty(number));
        }

        let spans = if self.options.detect_tables {
            let detector = TableDetector::with_config(self.options.table_config.clone());
            let (tables, remaining) = detector.detect(spans);
            if !tables.is_empty() {
                log::debug!(
                    "Page {}: {} tables, {} spans outside tables dropped",
                    number,
                    tables.len(),
                    remaining.len()
                );
                return Ok(PageContent::tables(number, tables));
            }
            remaining
        } else {
            spans
        };

        Ok(PageContent::text(number, page_text(spans)))
    }
}

/// Attach the page number to a per-page extraction failure.
fn page_error(number: u32, err: Error) -> Error {
    match err {
        Error::Extraction(msg) => Error::Extraction(format!("Page {}: {}", number, msg)),
        other => other,
    }
}
