//! Rendering module for turning extracted rows into CSV and previews.

mod csv;
mod preview;

pub use self::csv::{output_file_name, to_csv, write_csv, CSV_MIME_TYPE};
pub use self::preview::preview_table;
