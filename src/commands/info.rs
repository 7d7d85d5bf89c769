use crate::pdf::page_labels::{has_page_labels, suggest_page};
use lopdf::Document;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();

    println!("File: {}", path.as_ref().display());
    println!("Pages: {}", info.page_count);

    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", name, value);
        }
    }
    if let Some(date) = &info.creation_date {
        println!("Created: {}", format_pdf_date(date));
    }
    if let Some(date) = &info.mod_date {
        println!("Modified: {}", format_pdf_date(date));
    }

    for line in label_summary(&doc.doc) {
        println!("{}", line);
    }

    Ok(())
}

fn label_summary(doc: &Document) -> Vec<String> {
    if !has_page_labels(doc) {
        return vec!["Page labels: none".to_string()];
    }
    let mut lines = vec!["Page labels: present".to_string()];
    // Where printed page 1 sits, when the labels say so
    if let Some(page) = suggest_page(doc, "1") {
        lines.push(format!("Printed page 1: PDF page {}", page));
    }
    lines
}

fn format_pdf_date(date: &str) -> String {
    // D:YYYYMMDDHHmmSSOHH'mm
    let Some(d) = date.strip_prefix("D:") else {
        return date.to_string();
    };
    if d.len() < 8 || !d.is_ascii() {
        return date.to_string();
    }

    let time = if d.len() >= 14 {
        format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14])
    } else {
        String::new()
    };
    format!("{}-{}-{}{}", &d[0..4], &d[4..6], &d[6..8], time)
}
