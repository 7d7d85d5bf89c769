use crate::resolve::ResolvedEntry;
use serde::Serialize;
use thiserror::Error;

/// Inclusive, 1-based span of physical pages assigned to one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub sequence: usize,
    pub title: String,
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("the document has no pages")]
    EmptyDocument,

    #[error("\"{title}\" starts on page {start}, past the last page ({total})")]
    PastEnd { title: String, start: u32, total: u32 },

    #[error(
        "\"{title}\" starts on page {start} but the next entry starts on page {next}; \
         index entries must be in physical page order"
    )]
    Inverted { title: String, start: u32, next: u32 },
}

/// Build one range per entry. Each range ends the page before the next entry
/// starts; the last one ends on `total_pages`.
pub fn build_ranges(
    entries: &[ResolvedEntry],
    total_pages: u32,
) -> Result<Vec<PageRange>, RangeError> {
    if total_pages == 0 {
        return Err(RangeError::EmptyDocument);
    }

    let mut ranges = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let start = entry.pdf_page;
        if start > total_pages {
            return Err(RangeError::PastEnd {
                title: entry.title().to_string(),
                start,
                total: total_pages,
            });
        }

        let end = match entries.get(idx + 1) {
            Some(next) if next.pdf_page <= start => {
                return Err(RangeError::Inverted {
                    title: entry.title().to_string(),
                    start,
                    next: next.pdf_page,
                });
            }
            Some(next) => (next.pdf_page - 1).min(total_pages),
            None => total_pages,
        };

        ranges.push(PageRange {
            sequence: idx + 1,
            title: entry.title().to_string(),
            start,
            end,
        });
    }

    Ok(ranges)
}

/// Check ranges against a document's page count before any output is written.
pub fn validate_ranges(ranges: &[PageRange], total_pages: u32) -> Result<(), RangeError> {
    if total_pages == 0 {
        return Err(RangeError::EmptyDocument);
    }
    for range in ranges {
        if range.start == 0 || range.start > total_pages || range.end > total_pages {
            return Err(RangeError::PastEnd {
                title: range.title.clone(),
                start: range.start,
                total: total_pages,
            });
        }
        if range.start > range.end {
            return Err(RangeError::Inverted {
                title: range.title.clone(),
                start: range.start,
                next: range.end + 1,
            });
        }
    }
    Ok(())
}
