//! End-to-end tests driving the `indexsplit` binary.

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, StringFormat, Stream};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn indexsplit() -> Command {
    Command::new(env!("CARGO_BIN_EXE_indexsplit"))
}

/// Write a PDF with `num_pages` pages, each showing "Page N".
fn write_pdf(dir: &Path, num_pages: u32) -> PathBuf {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let path = dir.join("book.pdf");
    doc.save(&path).unwrap();
    path
}

fn page_count(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}

fn pdf_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".pdf"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_help() {
    indexsplit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_split_requires_path() {
    indexsplit()
        .arg("split")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_missing_pdf_is_usage_error() {
    indexsplit()
        .args(["split", "/nonexistent/book.pdf", "--anchor-page", "1"])
        .write_stdin("Intro\t1\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PDF file not found"));
}

#[test]
fn test_split_with_front_matter() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 20);
    let out = dir.path().join("out");

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "5", "-o"])
        .arg(&out)
        .write_stdin("PDF File Name\tPDF Page\nFront\ti\nCh1\t1\nCh2\t10\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created: 02 Ch1.pdf \"Ch1\" (pages 5-13)"))
        .stdout(predicate::str::contains("Split into 3 file(s)"))
        .stdout(predicate::str::contains("  - 03 Ch2.pdf"));

    assert_eq!(
        pdf_files(&out),
        vec!["01 Front.pdf", "02 Ch1.pdf", "03 Ch2.pdf"]
    );
    assert_eq!(page_count(&out.join("01 Front.pdf")), 4);
    assert_eq!(page_count(&out.join("02 Ch1.pdf")), 9);
    assert_eq!(page_count(&out.join("03 Ch2.pdf")), 7);
    // source untouched
    assert_eq!(page_count(&pdf), 20);
}

#[test]
fn test_interactive_anchor_prompt() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 10);
    let index = dir.path().join("index.tsv");
    std::fs::write(&index, "Preface\ti\nOne\t1\n").unwrap();

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .arg("--index")
        .arg(&index)
        .arg("-o")
        .arg(dir.path())
        .write_stdin("zero\n3\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("\"One\" (printed page 1)"))
        .stderr(predicate::str::contains("\"zero\" is not a page number"));

    assert_eq!(page_count(&dir.path().join("01 Preface.pdf")), 2);
    assert_eq!(page_count(&dir.path().join("02 One.pdf")), 8);
}

#[test]
fn test_single_page_document() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 1);
    let out = dir.path().join("out");

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "1", "-o"])
        .arg(&out)
        .write_stdin("Only\t1\n")
        .assert()
        .success();

    assert_eq!(pdf_files(&out), vec!["01 Only.pdf"]);
    assert_eq!(page_count(&out.join("01 Only.pdf")), 1);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 12);
    let runs = [dir.path().join("a"), dir.path().join("b")];

    for out in &runs {
        indexsplit()
            .arg("split")
            .arg(&pdf)
            .args(["--anchor-page", "3", "-o"])
            .arg(out)
            .write_stdin("Front\ti\nCh1\t1\nCh2\t6\n")
            .assert()
            .success();
    }

    let names = pdf_files(&runs[0]);
    assert_eq!(names, pdf_files(&runs[1]));
    for name in names {
        assert_eq!(
            std::fs::read(runs[0].join(&name)).unwrap(),
            std::fs::read(runs[1].join(&name)).unwrap(),
            "{} differs",
            name
        );
    }
}

#[test]
fn test_parse_error_exit_code() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 5);

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "1", "-o"])
        .arg(dir.path())
        .write_stdin("Intro\t1\nBroken\t12b\n")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("line 2"));

    assert_eq!(pdf_files(dir.path()), vec!["book.pdf"]);
}

#[test]
fn test_skip_invalid_lines() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 8);
    let out = dir.path().join("out");

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "1", "--skip-invalid", "-o"])
        .arg(&out)
        .write_stdin("Intro\t1\nBroken\t12b\nEnd\t5\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping line 2"));

    assert_eq!(pdf_files(&out), vec!["01 Intro.pdf", "02 End.pdf"]);
    assert_eq!(page_count(&out.join("02 End.pdf")), 4);
}

#[test]
fn test_roman_only_index_is_resolution_error() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 5);
    let out = dir.path().join("out");

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "1", "-o"])
        .arg(&out)
        .write_stdin("Preface\ti\nForeword\tiii\n")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("no decimal page numbers"));

    assert!(!out.exists());
}

#[test]
fn test_out_of_order_index_is_range_error() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 40);
    let out = dir.path().join("out");

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "5", "-o"])
        .arg(&out)
        .write_stdin("A\txiii\nB\t1\nC\t19\n")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("physical page order"));

    assert!(!out.exists());
}

#[test]
fn test_unwritable_output_is_split_error() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 4);
    // a regular file where the output directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "1", "-o"])
        .arg(&blocker)
        .write_stdin("A\t1\nB\t3\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create directory"));
}

#[test]
fn test_plan_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 20);
    let out = dir.path().join("out");

    indexsplit()
        .arg("plan")
        .arg(&pdf)
        .args(["--anchor-page", "5", "-o"])
        .arg(&out)
        .write_stdin("Front\ti\nCh1\t1\nCh2\t10\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("offset +4"))
        .stdout(predicate::str::contains("03 Ch2.pdf  \"Ch2\" (pages 14-20, 7 page(s))"));

    assert!(!out.exists());
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 6);

    let output = indexsplit()
        .arg("split")
        .arg(&pdf)
        .args(["--anchor-page", "1", "--json", "--separator", "_", "-o"])
        .arg(dir.path())
        .write_stdin("Part 1: Start\t1\nPart 2\t4\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["plan"]["offset"], 0);
    assert_eq!(json["report"]["created"][0]["file"], "01_Part 1_ Start.pdf");
    assert_eq!(json["report"]["created"][1]["start"], 4);
    assert_eq!(json["report"]["failed"].as_array().unwrap().len(), 0);
}

#[test]
fn test_info() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 3);

    indexsplit()
        .arg("info")
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages: 3"))
        .stdout(predicate::str::contains("Page labels: none"));
}

#[test]
fn test_page_labels_without_labels() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), 2);

    indexsplit()
        .arg("page-labels")
        .arg(&pdf)
        .assert()
        .success()
        .stdout("1: 1\n2: 2\n");
}
