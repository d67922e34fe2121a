//! In-memory PDF fixtures shared by the integration tests.

#![allow(dead_code)]

use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// Content of one test page.
pub enum PageSpec {
    /// A content stream, stored uncompressed
    Content(Vec<u8>),
    /// A content stream, stored with FlateDecode
    Compressed(Vec<u8>),
    /// A page dictionary without `/Contents`
    NoContents,
}

/// Content stream that shows each `(text, x, y)` at 12pt.
pub fn text_ops(items: &[(&str, f32, f32)]) -> Vec<u8> {
    let mut out = String::new();
    for (text, x, y) in items {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        out.push_str(&format!("BT /F1 12 Tf {} {} Td ({}) Tj ET\n", x, y, escaped));
    }
    out.into_bytes()
}

/// Content stream laying out `rows` as a grid: one column every 128pt,
/// one row every 15pt, starting at (72, 700).
pub fn grid_ops(rows: &[&[&str]]) -> Vec<u8> {
    let mut items = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            items.push((*text, 72.0 + 128.0 * c as f32, 700.0 - 15.0 * r as f32));
        }
    }
    text_ops(&items)
}

/// Content stream placing each `(text, x, y)` with `cm` inside `q … Q`,
/// the text itself drawn at the text-space origin.
pub fn cm_ops(items: &[(&str, f32, f32)]) -> Vec<u8> {
    let mut out = String::new();
    for (text, x, y) in items {
        out.push_str(&format!(
            "q 1 0 0 1 {} {} cm BT /F1 12 Tf ({}) Tj ET Q\n",
            x, y, text
        ));
    }
    out.into_bytes()
}

/// A form XObject registered in every page's `/XObject` resources.
pub struct FormSpec {
    pub name: &'static str,
    pub content: Vec<u8>,
    pub matrix: Option<[f32; 6]>,
}

/// The Helvetica font every fixture page refers to as `/F1`.
pub fn standard_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Build a PDF with one page per spec.
pub fn build_pdf(pages: Vec<PageSpec>) -> Vec<u8> {
    save(build_document(standard_font(), Vec::new(), pages))
}

/// Build an unsaved document whose pages share `font` as `/F1` and
/// `forms` as XObjects.
pub fn build_document(font: Dictionary, forms: Vec<FormSpec>, pages: Vec<PageSpec>) -> Document {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(font);
    let pages_id = doc.new_object_id();

    let mut xobjects = Dictionary::new();
    for form in forms {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        };
        if let Some(matrix) = form.matrix {
            dict.set(
                "Matrix",
                matrix.iter().map(|&n| Object::Real(n)).collect::<Vec<_>>(),
            );
        }
        let form_id = doc.add_object(Stream::new(dict, form.content));
        xobjects.set(form.name, Object::Reference(form_id));
    }

    let mut kids = Vec::new();
    for spec in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
                "XObject" => xobjects.clone(),
            },
        };

        let content = match spec {
            PageSpec::Content(bytes) => Some(Stream::new(dictionary! {}, bytes)),
            PageSpec::Compressed(bytes) => {
                let mut stream = Stream::new(dictionary! {}, bytes);
                stream.compress().unwrap();
                Some(stream)
            }
            PageSpec::NoContents => None,
        };
        if let Some(stream) = content {
            let content_id = doc.add_object(stream);
            page.set("Contents", Object::Reference(content_id));
        }

        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

pub fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Encrypt every stream with 40-bit RC4 (standard handler, revision 2).
///
/// `user_check` becomes the `/U` entry. Without it lopdf skips the password
/// check, so the empty user password opens the file, as it does for files
/// restricted by an owner password only.
pub fn encrypt(mut doc: Document, user_check: Option<Vec<u8>>) -> Vec<u8> {
    let mut handler = dictionary! {
        "Filter" => "Standard",
        "V" => Object::Integer(1),
        "R" => Object::Integer(2),
        "Length" => Object::Integer(40),
        "O" => Object::string_literal(vec![0x5A; 32]),
        "P" => Object::Integer(-4),
    };
    if let Some(u) = user_check {
        handler.set("U", Object::string_literal(u));
    }
    let handler_id = doc.add_object(handler);
    doc.trailer.set("Encrypt", Object::Reference(handler_id));
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(b"pdf2csv-fixture-id".to_vec()),
            Object::string_literal(b"pdf2csv-fixture-id".to_vec()),
        ],
    );

    let key = lopdf::encryption::get_encryption_key(&doc, "", false).unwrap();
    for (&id, object) in doc.objects.iter_mut() {
        if id == handler_id {
            continue;
        }
        // RC4 is symmetric: decrypting plaintext encrypts it
        if let Ok(encrypted) = lopdf::encryption::decrypt_object(&key, id, &*object) {
            if let Object::Stream(stream) = object {
                stream.set_content(encrypted);
            }
        }
    }

    save(doc)
}

/// Two pages: a 3x2 table, then a page holding only "Total: 6".
pub fn scenario_pdf() -> Vec<u8> {
    build_pdf(vec![
        PageSpec::Content(grid_ops(&[&["A", "1"], &["B", "2"], &["C", "3"]])),
        PageSpec::Content(text_ops(&[("Total: 6", 72.0, 700.0)])),
    ])
}

/// One page of single-column text lines, 15pt apart.
pub fn text_pdf(lines: &[&str]) -> Vec<u8> {
    let items: Vec<(&str, f32, f32)> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| (*line, 72.0, 700.0 - 15.0 * i as f32))
        .collect();
    build_pdf(vec![PageSpec::Content(text_ops(&items))])
}

/// A structurally valid PDF whose page tree has no pages.
pub fn zero_page_pdf() -> Vec<u8> {
    build_pdf(vec![])
}
