//! Page-level extraction results.

use super::Table;

/// What was extracted from a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Extracted content
    pub kind: PageKind,
}

/// Content found on a page: tables take precedence over text.
#[derive(Debug, Clone, PartialEq)]
pub enum PageKind {
    /// One or more tables, top to bottom
    Tables(Vec<Table>),
    /// Page text, one line per `\n`
    Text(String),
    /// Neither tables nor text (blank or image-only page)
    Empty,
}

impl PageContent {
    /// Page with detected tables. An empty table list yields an empty page.
    pub fn tables(number: u32, tables: Vec<Table>) -> Self {
        let tables: Vec<Table> = tables.into_iter().filter(|t| !t.is_empty()).collect();
        let kind = if tables.is_empty() {
            PageKind::Empty
        } else {
            PageKind::Tables(tables)
        };
        Self { number, kind }
    }

    /// Page with fallback text. Whitespace-only text yields an empty page.
    pub fn text(number: u32, text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = if text.trim().is_empty() {
            PageKind::Empty
        } else {
            PageKind::Text(text)
        };
        Self { number, kind }
    }

    /// Page that contributed nothing.
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            kind: PageKind::Empty,
        }
    }

    /// Check if the page has no content.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, PageKind::Empty)
    }
}
