use super::decode_pdf_string;
use crate::numbering::{to_roman, MAX_ROMAN};
use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLabel {
    pub physical_page: u32,
    pub logical_label: String,
}

#[derive(Debug, Clone)]
struct PageLabelRange {
    start_page: u32,   // 0-indexed physical page where this range starts
    style: LabelStyle, // Numbering style
    prefix: String,    // Optional prefix
    start_value: u32,  // Starting value for this range
}

#[derive(Debug, Clone, Copy)]
enum LabelStyle {
    Decimal,    // D: 1, 2, 3, ...
    LowerRoman, // r: i, ii, iii, iv, ...
    UpperRoman, // R: I, II, III, IV, ...
    LowerAlpha, // a: a, b, c, ... z, aa, ab, ...
    UpperAlpha, // A: A, B, C, ... Z, AA, AB, ...
    None,       // No numbering, just prefix
}

/// Extract page label mapping from a PDF
pub fn extract_page_labels<P: AsRef<Path>>(path: P) -> Result<Vec<PageLabel>> {
    let path = path.as_ref();
    let doc =
        Document::load(path).with_context(|| format!("Failed to open PDF: {}", path.display()))?;

    extract_page_labels_from_doc(&doc)
}

/// Labels for every physical page. Documents without a `/PageLabels` tree
/// get plain decimal labels.
pub fn extract_page_labels_from_doc(doc: &Document) -> Result<Vec<PageLabel>> {
    let total_pages = doc.get_pages().len() as u32;
    let ranges = read_label_ranges(doc)?.unwrap_or_default();

    Ok((1..=total_pages)
        .map(|physical_page| PageLabel {
            physical_page,
            // ranges use 0-indexed pages
            logical_label: compute_label(&ranges, physical_page - 1)
                .unwrap_or_else(|| physical_page.to_string()),
        })
        .collect())
}

/// First physical page whose label equals `printed` (case-insensitive).
///
/// Returns `None` when the document carries no `/PageLabels`, since plain
/// page numbers say nothing about where the printed pagination starts.
pub fn suggest_page(doc: &Document, printed: &str) -> Option<u32> {
    let ranges = match read_label_ranges(doc) {
        Ok(Some(ranges)) if !ranges.is_empty() => ranges,
        Ok(_) => return None,
        Err(e) => {
            debug!("ignoring unreadable page labels: {:#}", e);
            return None;
        }
    };

    let printed = printed.trim();
    let total_pages = doc.get_pages().len() as u32;
    (1..=total_pages).find(|&page| {
        compute_label(&ranges, page - 1).is_some_and(|label| label.eq_ignore_ascii_case(printed))
    })
}

/// Whether the document carries a readable `/PageLabels` tree.
pub fn has_page_labels(doc: &Document) -> bool {
    matches!(read_label_ranges(doc), Ok(Some(ranges)) if !ranges.is_empty())
}

fn read_label_ranges(doc: &Document) -> Result<Option<Vec<PageLabelRange>>> {
    let catalog = doc.catalog().context("Failed to get document catalog")?;

    let page_labels_dict = match catalog.get(b"PageLabels") {
        Ok(Object::Reference(r)) => match doc.get_dictionary(*r) {
            Ok(d) => d,
            _ => return Ok(None),
        },
        Ok(Object::Dictionary(d)) => d,
        _ => return Ok(None),
    };

    // PageLabels uses a number tree structure
    parse_number_tree(doc, page_labels_dict).map(Some)
}

fn parse_number_tree(doc: &Document, dict: &Dictionary) -> Result<Vec<PageLabelRange>> {
    let mut ranges = Vec::new();

    // Leaf node
    if let Ok(Object::Array(nums)) = dict.get(b"Nums") {
        parse_nums_array(doc, nums, &mut ranges);
    }

    // Intermediate node
    if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
        for kid in kids {
            if let Object::Reference(kid_ref) = kid {
                if let Ok(kid_dict) = doc.get_dictionary(*kid_ref) {
                    ranges.extend(parse_number_tree(doc, kid_dict)?);
                }
            }
        }
    }

    ranges.sort_by_key(|r| r.start_page);
    Ok(ranges)
}

fn parse_nums_array(doc: &Document, nums: &[Object], ranges: &mut Vec<PageLabelRange>) {
    // Nums array format: [page_index, label_dict, page_index, label_dict, ...]
    for chunk in nums.chunks(2) {
        if chunk.len() != 2 {
            continue;
        }

        let start_page = match &chunk[0] {
            Object::Integer(n) => match u32::try_from(*n) {
                Ok(page) => page,
                Err(_) => continue,
            },
            _ => continue,
        };

        let label_dict = match &chunk[1] {
            Object::Dictionary(d) => d,
            Object::Reference(r) => match doc.get_dictionary(*r) {
                Ok(d) => d,
                _ => continue,
            },
            _ => continue,
        };

        let style = match label_dict.get(b"S") {
            Ok(Object::Name(name)) => match name.as_slice() {
                b"D" => LabelStyle::Decimal,
                b"r" => LabelStyle::LowerRoman,
                b"R" => LabelStyle::UpperRoman,
                b"a" => LabelStyle::LowerAlpha,
                b"A" => LabelStyle::UpperAlpha,
                _ => LabelStyle::Decimal,
            },
            _ => LabelStyle::None,
        };

        let prefix = match label_dict.get(b"P") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => String::new(),
        };

        let start_value = match label_dict.get(b"St") {
            Ok(Object::Integer(n)) if *n >= 1 => match u32::try_from(*n) {
                Ok(value) => value,
                Err(_) => {
                    debug!(start = n, "skipping page label range with oversized /St");
                    continue;
                }
            },
            _ => 1,
        };

        ranges.push(PageLabelRange {
            start_page,
            style,
            prefix,
            start_value,
        });
    }
}

/// Label for a 0-indexed page. `None` when the numbering overflows or a roman
/// value has no standard spelling.
fn compute_label(ranges: &[PageLabelRange], page_index: u32) -> Option<String> {
    let range = ranges
        .iter()
        .rev()
        .find(|r| r.start_page <= page_index)
        .cloned()
        .unwrap_or(PageLabelRange {
            start_page: 0,
            style: LabelStyle::Decimal,
            prefix: String::new(),
            start_value: 1,
        });

    let value = range
        .start_value
        .checked_add(page_index - range.start_page)?;

    let number_part = match range.style {
        LabelStyle::Decimal => value.to_string(),
        LabelStyle::LowerRoman | LabelStyle::UpperRoman if value > MAX_ROMAN => return None,
        LabelStyle::LowerRoman => to_roman(value).to_lowercase(),
        LabelStyle::UpperRoman => to_roman(value),
        LabelStyle::LowerAlpha => to_alpha(value).to_lowercase(),
        LabelStyle::UpperAlpha => to_alpha(value),
        LabelStyle::None => String::new(),
    };

    Some(format!("{}{}", range.prefix, number_part))
}

fn to_alpha(n: u32) -> String {
    if n == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut remaining = n - 1; // Convert to 0-indexed

    loop {
        let letter = ((remaining % 26) as u8 + b'A') as char;
        result.insert(0, letter);
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::build_pdf;

    fn labels_of(doc: &Document) -> Vec<String> {
        extract_page_labels_from_doc(doc)
            .unwrap()
            .into_iter()
            .map(|l| l.logical_label)
            .collect()
    }

    #[test]
    fn test_to_alpha() {
        assert_eq!(to_alpha(1), "A");
        assert_eq!(to_alpha(26), "Z");
        assert_eq!(to_alpha(27), "AA");
        assert_eq!(to_alpha(28), "AB");
    }

    #[test]
    fn test_front_matter_labels() {
        let doc = Document::load_mem(&build_pdf(6, Some(&[(0, "r"), (3, "D")]))).unwrap();
        assert_eq!(labels_of(&doc), vec!["i", "ii", "iii", "1", "2", "3"]);
    }

    #[test]
    fn test_unlabelled_document() {
        let doc = Document::load_mem(&build_pdf(3, None)).unwrap();
        assert_eq!(labels_of(&doc), vec!["1", "2", "3"]);
        assert_eq!(suggest_page(&doc, "1"), None);
    }

    #[test]
    fn test_has_page_labels() {
        let roman_only = Document::load_mem(&build_pdf(3, Some(&[(0, "r")]))).unwrap();
        assert!(has_page_labels(&roman_only));
        assert_eq!(suggest_page(&roman_only, "1"), None);

        let plain = Document::load_mem(&build_pdf(3, None)).unwrap();
        assert!(!has_page_labels(&plain));
    }

    #[test]
    fn test_start_value_at_u32_limit() {
        let bytes = build_pdf_with_start(3, "D", u32::MAX as i64);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(suggest_page(&doc, "1"), None);
        assert_eq!(suggest_page(&doc, "4294967295"), Some(1));
        assert_eq!(labels_of(&doc), vec!["4294967295", "2", "3"]);
    }

    #[test]
    fn test_start_value_past_u32_is_ignored() {
        let bytes = build_pdf_with_start(2, "D", u32::MAX as i64 + 10);
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(!has_page_labels(&doc));
        assert_eq!(labels_of(&doc), vec!["1", "2"]);
    }

    #[test]
    fn test_huge_roman_start_has_no_label() {
        let bytes = build_pdf_with_start(2, "r", 2_000_000_000);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(suggest_page(&doc, "i"), None);
        assert_eq!(labels_of(&doc), vec!["1", "2"]);
    }

    fn build_pdf_with_start(num_pages: u32, style: &str, start: i64) -> Vec<u8> {
        let mut doc = Document::load_mem(&build_pdf(num_pages, None)).unwrap();
        let label = Dictionary::from_iter(vec![
            ("S", Object::Name(style.as_bytes().to_vec())),
            ("St", Object::Integer(start)),
        ]);
        let labels = Dictionary::from_iter(vec![(
            "Nums",
            Object::Array(vec![Object::Integer(0), Object::Dictionary(label)]),
        )]);
        doc.catalog_mut()
            .unwrap()
            .set("PageLabels", Object::Dictionary(labels));
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_suggest_page() {
        let doc = Document::load_mem(&build_pdf(8, Some(&[(0, "r"), (4, "D")]))).unwrap();
        assert_eq!(suggest_page(&doc, "1"), Some(5));
        assert_eq!(suggest_page(&doc, "3"), Some(7));
        assert_eq!(suggest_page(&doc, "III"), Some(3));
        assert_eq!(suggest_page(&doc, "9"), None);
    }
}
