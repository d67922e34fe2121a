//! Row model for extracted PDF content.
//!
//! This module defines the intermediate representation between the PDF
//! extractor and the CSV serializer: tables and text found on each page,
//! and the flattened [`RowSet`] built from them.

mod page;
mod row;
mod rowset;
mod table;

pub use page::{PageContent, PageKind};
pub use row::{Cell, Row, RowOrigin};
pub use rowset::{ExtractionStats, RowSet};
pub use table::Table;
