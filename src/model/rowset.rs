//! Row accumulation across pages.

use std::fmt;

use crate::error::{Error, Result};

use super::{PageContent, PageKind, Row, RowOrigin};

/// Statistics collected while flattening pages into rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Pages that produced at least one table
    pub table_pages: u32,

    /// Pages that fell back to text lines
    pub text_pages: u32,

    /// Pages that contributed nothing
    pub empty_pages: u32,

    /// Number of tables extracted
    pub table_count: u32,

    /// Number of rows extracted
    pub row_count: usize,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows from {} pages ({} tables on {} pages, {} text pages, {} empty)",
            self.row_count,
            self.page_count,
            self.table_count,
            self.table_pages,
            self.text_pages,
            self.empty_pages
        )
    }
}

/// All rows extracted from a document, in page, table, then row order.
///
/// Row widths are not normalized: table rows keep their column count and
/// text rows always have one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vec<Row>,
    stats: ExtractionStats,
}

impl RowSet {
    /// Create an empty row set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten one page's content and append its rows.
    ///
    /// Table rows are appended table by table. Text is split on line breaks
    /// and every line that is not blank becomes a one-cell row.
    pub fn push_page(&mut self, page: PageContent) {
        self.stats.page_count += 1;
        let before = self.rows.len();

        match page.kind {
            PageKind::Tables(tables) => {
                self.stats.table_pages += 1;
                self.stats.table_count += tables.len() as u32;
                for (table_idx, table) in tables.into_iter().enumerate() {
                    let origin = RowOrigin::Table {
                        page: page.number,
                        table: table_idx,
                    };
                    self.rows
                        .extend(table.rows.into_iter().map(|cells| Row::new(cells, origin)));
                }
            }
            PageKind::Text(text) => {
                self.stats.text_pages += 1;
                self.rows.extend(
                    text.lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(|line| Row::text_line(line, page.number)),
                );
            }
            PageKind::Empty => {
                self.stats.empty_pages += 1;
            }
        }

        self.stats.row_count = self.rows.len();
        log::debug!(
            "RowSet: page {} contributed {} rows",
            page.number,
            self.rows.len() - before
        );
    }

    /// Append a single row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
        self.stats.row_count = self.rows.len();
    }

    /// Accept the row set for serialization.
    ///
    /// Returns [`Error::NoDataExtracted`] when no page produced any row.
    pub fn validate(self) -> Result<Self> {
        if self.rows.is_empty() {
            return Err(Error::NoDataExtracted);
        }
        Ok(self)
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were extracted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The first `n` rows (or all of them, if fewer).
    pub fn preview(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Width of the widest row.
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Row::width).max().unwrap_or(0)
    }

    /// Extraction statistics.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Consume the set, returning its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<PageContent> for RowSet {
    fn from_iter<I: IntoIterator<Item = PageContent>>(iter: I) -> Self {
        let mut set = RowSet::new();
        for page in iter {
            set.push_page(page);
        }
        set
    }
}
