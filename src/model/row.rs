//! Row and cell types.

/// A single cell value. `None` is a missing cell (no text in that column).
pub type Cell = Option<String>;

/// Where a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// A row of a detected table. `table` is the 0-based table index on the page.
    Table { page: u32, table: usize },
    /// A line of text from a page without tables.
    Text { page: u32 },
}

impl RowOrigin {
    /// Page number (1-indexed) the row was extracted from.
    pub fn page(&self) -> u32 {
        match *self {
            RowOrigin::Table { page, .. } | RowOrigin::Text { page } => page,
        }
    }
}

/// An ordered sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cells in column order
    pub cells: Vec<Cell>,

    /// Source of this row
    pub origin: RowOrigin,
}

impl Row {
    /// Create a row from cells.
    pub fn new(cells: Vec<Cell>, origin: RowOrigin) -> Self {
        Self { cells, origin }
    }

    /// Create a one-cell row from a line of text.
    pub fn text_line(line: impl Into<String>, page: u32) -> Self {
        Self {
            cells: vec![Some(line.into())],
            origin: RowOrigin::Text { page },
        }
    }

    /// Number of cells in the row.
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Whether this row came from the text fallback.
    pub fn is_text(&self) -> bool {
        matches!(self.origin, RowOrigin::Text { .. })
    }

    /// Cell values with missing cells as empty strings.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.as_deref().unwrap_or(""))
    }
}
