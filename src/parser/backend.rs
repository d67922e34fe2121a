//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the few PDF operations the
//! extractor needs, isolating the concrete PDF library (lopdf) from the
//! span interpretation and table detection logic.

use std::collections::BTreeMap;

use crate::detect::detect_pdf_version;
use crate::error::{Error, Result};

/// Object identifier: (object number, generation number).
pub type ObjectId = (u32, u16);

/// Page identifier.
pub type PageId = ObjectId;

/// Resource dictionary that a content stream resolves fonts and XObjects in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    /// The page's resources, inherited entries included.
    Page(PageId),
    /// A form XObject's own `/Resources`, falling back to its page's.
    Form { page: PageId, form: ObjectId },
}

impl ResourceScope {
    /// Page the content stream is drawn on.
    pub fn page(&self) -> PageId {
        match *self {
            ResourceScope::Page(page) | ResourceScope::Form { page, .. } => page,
        }
    }
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// A form XObject: a reusable content stream drawn by the `Do` operator.
#[derive(Debug, Clone, PartialEq)]
pub struct FormXObject {
    pub id: ObjectId,
    /// Form space to user space, `[a b c d e f]`
    pub matrix: [f32; 6],
    pub operations: Vec<ContentOp>,
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, content stream decoding and
/// text decoding without exposing any concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId), in document order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the page's content stream as a sequence of operations.
    ///
    /// A page without a `/Contents` entry yields no operations.
    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the encoding of the named font.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, scope: ResourceScope, font_name: &[u8], bytes: &[u8]) -> String;

    /// Resolve a named XObject to a form.
    ///
    /// Images and unknown names yield `Ok(None)`.
    fn form_xobject(&self, _scope: ResourceScope, _name: &[u8]) -> Result<Option<FormXObject>> {
        Ok(None)
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice.
    ///
    /// Encrypted documents are opened with the empty user password, which
    /// covers files restricted by an owner password only.
    ///
    /// Fails with a document-read error for empty, non-PDF, corrupted input
    /// and for encrypted input that needs a password.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let version = detect_pdf_version(data)?;
        log::debug!("LopdfBackend: loading PDF {} ({} bytes)", version, data.len());

        let mut doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::IO(io) => Error::DocumentRead(io.to_string()),
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                log::debug!("LopdfBackend: empty password rejected: {}", e);
                Error::Encrypted
            })?;
            log::debug!("LopdfBackend: decrypted with the empty user password");
        }

        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Raw (decompressed) content bytes of a page, all streams concatenated.
    ///
    /// Uncompressed streams are passed through as-is; a page without
    /// `/Contents` yields no bytes.
    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        self.doc
            .get_page_content(page_id)
            .map_err(|e| Error::Extraction(e.to_string()))
    }

    /// Resource dictionaries visible from a scope, innermost first.
    fn resource_dicts(&self, scope: ResourceScope) -> Vec<&Dictionary> {
        let mut dicts = Vec::new();

        if let ResourceScope::Form { form, .. } = scope {
            let own = self
                .doc
                .get_object(form)
                .and_then(Object::as_stream)
                .and_then(|stream| stream.dict.get_deref(b"Resources", &self.doc))
                .and_then(Object::as_dict);
            if let Ok(resources) = own {
                dicts.push(resources);
            }
        }

        if let Ok((direct, inherited)) = self.doc.get_page_resources(scope.page()) {
            dicts.extend(direct);
            dicts.extend(
                inherited
                    .into_iter()
                    .filter_map(|id| self.doc.get_dictionary(id).ok()),
            );
        }

        dicts
    }

    /// Look up `name` in the `category` subdictionary (`/Font`, `/XObject`)
    /// of the scope's resources. Returns the object and, for indirect
    /// objects, its id.
    fn resource(
        &self,
        scope: ResourceScope,
        category: &[u8],
        name: &[u8],
    ) -> Option<(Option<ObjectId>, &Object)> {
        self.resource_dicts(scope).into_iter().find_map(|resources| {
            let entries = resources
                .get_deref(category, &self.doc)
                .and_then(Object::as_dict)
                .ok()?;
            self.doc.dereference(entries.get(name).ok()?).ok()
        })
    }
}

/// Parse a content stream into operations.
fn decode_operations(data: &[u8]) -> Result<Vec<ContentOp>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let content =
        lopdf::content::Content::decode(data).map_err(|e| Error::Extraction(e.to_string()))?;

    Ok(content
        .operations
        .into_iter()
        .map(|op| ContentOp {
            operands: op.operands.iter().map(convert_object).collect(),
            operator: op.operator,
        })
        .collect())
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>> {
        decode_operations(&self.page_content(page)?)
    }

    fn decode_text(&self, scope: ResourceScope, font_name: &[u8], bytes: &[u8]) -> String {
        if let Some((_, Object::Dictionary(font))) = self.resource(scope, b"Font", font_name) {
            // get_font_encoding asserts on dictionaries without /Type /Font
            if font.type_is(b"Font") {
                if let Ok(enc) = font.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            } else {
                log::debug!(
                    "LopdfBackend: font /{} has no /Type /Font",
                    String::from_utf8_lossy(font_name)
                );
            }
        }
        decode_text_simple(bytes)
    }

    fn form_xobject(&self, scope: ResourceScope, name: &[u8]) -> Result<Option<FormXObject>> {
        let (id, stream) = match self.resource(scope, b"XObject", name) {
            Some((Some(id), Object::Stream(stream))) => (id, stream),
            _ => return Ok(None),
        };
        if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(&b"Form"[..]) {
            return Ok(None);
        }

        let matrix = match stream.dict.get(b"Matrix").and_then(Object::as_array) {
            Ok(values) if values.len() == 6 => {
                let mut matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                for (slot, value) in matrix.iter_mut().zip(values) {
                    *slot = value.as_float().unwrap_or(*slot);
                }
                matrix
            }
            _ => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        };

        let data = stream
            .get_plain_content()
            .unwrap_or_else(|_| stream.content.clone());

        Ok(Some(FormXObject {
            id,
            matrix,
            operations: decode_operations(&data)?,
        }))
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_get_number_from_value() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(2.5)), Some(2.5));
        assert_eq!(get_number_from_value(&PdfValue::Other), None);
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"hello, world"),
            Err(Error::DocumentRead(_))
        ));
        assert!(matches!(
            LopdfBackend::load_bytes(&[]),
            Err(Error::DocumentRead(_))
        ));
    }

    #[test]
    fn test_load_rejects_truncated_pdf() {
        let result = LopdfBackend::load_bytes(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog");
        assert!(matches!(result, Err(ref e) if e.kind() == crate::error::ErrorKind::DocumentRead));
    }
}
