//! PDF header detection.
//!
//! Rejects empty and non-PDF input before it reaches the parser, so that
//! garbage bytes fail fast with a readable message.

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Check that `data` starts with a `%PDF-x.y` header and return the version.
///
/// # Returns
/// * `Ok(version)` if the data starts with a valid PDF header
/// * `Err(Error::DocumentRead)` otherwise
pub fn detect_pdf_version(data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Err(Error::DocumentRead("file is empty".into()));
    }

    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::DocumentRead("not a PDF file".into()));
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::DocumentRead(format!(
            "unsupported PDF version: {}",
            version
        )));
    }

    Ok(version)
}

/// Check if bytes begin with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_pdf_version(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_pdf_version(data).unwrap(), "1.7");
    }

    #[test]
    fn test_detect_pdf_2_0() {
        assert_eq!(detect_pdf_version(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_detect_empty_input() {
        let err = detect_pdf_version(b"").unwrap_err();
        assert!(matches!(err, Error::DocumentRead(ref msg) if msg == "file is empty"));
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_pdf_version(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::DocumentRead(_))));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(detect_pdf_version(b"%PDF").is_err());
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
        assert!(!is_pdf_bytes(b"%PDF-x.y\n"));
    }
}
