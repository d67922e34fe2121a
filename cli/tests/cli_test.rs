//! Integration tests for the pdf2csv binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("pdf2csv").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Build a PDF with one page per content stream; `None` pages have no
/// `/Contents`.
fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    use lopdf::{dictionary, Object, Stream};

    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for content in pages {
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
            },
        };
        if let Some(content) = content {
            let stream = Stream::new(dictionary! {}, content.as_bytes().to_vec());
            page.set("Contents", Object::Reference(doc.add_object(stream)));
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

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Page 1: a 3x2 table. Page 2: "Total: 6".
fn scenario_pdf() -> Vec<u8> {
    build_pdf(&[
        Some(
            "BT /F1 12 Tf 72 700 Td (A) Tj ET BT /F1 12 Tf 200 700 Td (1) Tj ET \
             BT /F1 12 Tf 72 685 Td (B) Tj ET BT /F1 12 Tf 200 685 Td (2) Tj ET \
             BT /F1 12 Tf 72 670 Td (C) Tj ET BT /F1 12 Tf 200 670 Td (3) Tj ET",
        ),
        Some("BT /F1 12 Tf 72 700 Td (Total: 6) Tj ET"),
    ])
}

fn write_input(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn convert_writes_csv_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "report.pdf", &scenario_pdf());

    cmd()
        .arg("convert")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total rows extracted: 4"))
        .stdout(predicate::str::contains("Total: 6"))
        .stdout(predicate::str::contains("report.csv"));

    let csv = std::fs::read_to_string(dir.path().join("report.csv")).unwrap();
    assert_eq!(csv, "A,1\nB,2\nC,3\nTotal: 6\n");
}

#[test]
fn bare_file_argument_converts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "report.pdf", &scenario_pdf());
    let output = dir.path().join("out.csv");

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        std::fs::read_to_string(output).unwrap(),
        "A,1\nB,2\nC,3\nTotal: 6\n"
    );
}

#[test]
fn stdout_flag_prints_only_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "report.pdf", &scenario_pdf());

    cmd()
        .args(["convert", "--stdout"])
        .arg(&input)
        .assert()
        .success()
        .stdout("A,1\nB,2\nC,3\nTotal: 6\n");

    assert!(!dir.path().join("report.csv").exists());
}

#[test]
fn preview_limits_rows_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "report.pdf", &scenario_pdf());

    cmd()
        .args(["preview", "--rows", "2"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("B"))
        .stdout(predicate::str::contains("Total: 6").not())
        .stdout(predicate::str::contains("Total rows extracted: 4"));

    assert!(!dir.path().join("report.csv").exists());
}

#[test]
fn blank_pdf_is_a_notice_with_exit_code_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "scan.pdf", &build_pdf(&[None]));

    cmd()
        .arg("convert")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No data extracted from PDF"));

    assert!(!dir.path().join("scan.csv").exists());
}

#[test]
fn corrupted_pdf_is_an_error_with_exit_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = scenario_pdf();
    let input = write_input(dir.path(), "broken.pdf", &pdf[..pdf.len() / 3]);

    cmd()
        .arg("convert")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not read the PDF"))
        .stderr(predicate::str::contains("not corrupted"));

    assert!(!dir.path().join("broken.csv").exists());
}

#[test]
fn missing_file_fails() {
    cmd()
        .args(["convert", "/nonexistent/input.pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn version_subcommand() {
    cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf2csv"));
}
