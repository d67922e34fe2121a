//! Error types for pdf2csv library.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2csv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF to CSV conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input could not be parsed as a PDF (corrupted, truncated, empty, not a PDF).
    #[error("Could not read the PDF: {0}")]
    DocumentRead(String),

    /// The PDF document is encrypted and no usable credentials were supplied.
    #[error("Could not read the PDF: document is encrypted")]
    Encrypted,

    /// The document parsed, but no rows were extracted from any page.
    #[error("No data extracted from PDF. The PDF might be empty or contain only images.")]
    NoDataExtracted,

    /// A page could not be processed after the document was opened.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Error writing CSV output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Caller-facing category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is not a readable PDF.
    DocumentRead,
    /// The PDF was readable but contained nothing to convert.
    NoDataExtracted,
    /// Anything else that went wrong while extracting or serializing.
    Other,
}

impl Error {
    /// Classify the error for presentation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DocumentRead(_) | Error::Encrypted => ErrorKind::DocumentRead,
            Error::NoDataExtracted => ErrorKind::NoDataExtracted,
            _ => ErrorKind::Other,
        }
    }

    /// Single human-readable message to show to the user.
    ///
    /// `NoDataExtracted` is informational; everything else reads as a failure.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::DocumentRead | ErrorKind::NoDataExtracted => self.to_string(),
            ErrorKind::Other => format!("An error occurred: {}", self),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::DocumentRead(err.to_string()),
        }
    }
}
