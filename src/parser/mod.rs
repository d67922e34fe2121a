//! PDF parsing module.

mod backend;
mod extractor;
mod layout;
mod options;
mod table_detector;

pub use backend::{
    decode_text_simple, ContentOp, FormXObject, LopdfBackend, ObjectId, PageId, PdfBackend,
    PdfValue, ResourceScope,
};
pub use extractor::PdfExtractor;
pub use layout::{group_spans_into_lines, page_text, SpanExtractor, TextLine, TextSpan};
pub use options::{ErrorMode, ExtractOptions};
pub use table_detector::{TableDetector, TableDetectorConfig};
