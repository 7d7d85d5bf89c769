//! Mapping printed page numbers onto physical PDF pages.

use crate::index::ParsedEntry;
use crate::numbering::Numbering;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("the index has no decimal page numbers, so no offset can be computed")]
    NoAnchor,

    #[error("\"{title}\" would start on PDF page {page}, which is before the first page")]
    NonPositivePage { title: String, page: i64 },

    #[error("anchor page {page} is out of range (1-{total})")]
    AnchorOutOfRange { page: u32, total: u32 },

    #[error("no anchor page was given for \"{0}\"")]
    NoAnswer(String),

    #[error("failed to read the anchor page: {0}")]
    Prompt(#[from] std::io::Error),
}

/// What the operator is asked about the anchor entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorQuery {
    pub title: String,
    pub printed_page: String,
    pub value: u32,
    pub total_pages: u32,
    /// Physical page whose page label matches the printed page, if known.
    pub suggestion: Option<u32>,
}

/// Supplies the actual PDF page on which the anchor entry begins.
pub trait AnchorResolver {
    fn resolve_anchor(&mut self, query: &AnchorQuery) -> Result<u32, ResolutionError>;

    /// Whether `AnchorQuery::suggestion` is read. When false the page-label
    /// lookup is skipped.
    fn uses_suggestion(&self) -> bool {
        true
    }
}

impl<F> AnchorResolver for F
where
    F: FnMut(&AnchorQuery) -> Result<u32, ResolutionError>,
{
    fn resolve_anchor(&mut self, query: &AnchorQuery) -> Result<u32, ResolutionError> {
        self(query)
    }
}

/// Answers with a page known up front (`--anchor-page`, MCP, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnchor(pub u32);

impl AnchorResolver for FixedAnchor {
    fn resolve_anchor(&mut self, _query: &AnchorQuery) -> Result<u32, ResolutionError> {
        Ok(self.0)
    }

    fn uses_suggestion(&self) -> bool {
        false
    }
}

/// Uses the page-label suggestion, failing when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelAnchor;

impl AnchorResolver for LabelAnchor {
    fn resolve_anchor(&mut self, query: &AnchorQuery) -> Result<u32, ResolutionError> {
        query
            .suggestion
            .ok_or_else(|| ResolutionError::NoAnswer(query.title.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub parsed: ParsedEntry,
    pub pdf_page: u32,
}

impl ResolvedEntry {
    pub fn title(&self) -> &str {
        self.parsed.title()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Index of the anchor entry in `entries`.
    pub anchor: usize,
    pub anchor_page: u32,
    pub offset: i64,
    pub front_matter_offset: i64,
    pub entries: Vec<ResolvedEntry>,
}

/// The anchor is the first entry with a decimal printed page.
pub fn find_anchor(entries: &[ParsedEntry]) -> Option<usize> {
    entries
        .iter()
        .position(|e| matches!(e.numbering, Numbering::Decimal(_)))
}

/// Resolve every entry to a physical page.
///
/// The resolver is queried exactly once. Decimal entries are shifted by
/// `actual - anchor`; roman entries are shifted by `front_matter_offset`
/// (zero when front matter starts on the first physical page).
pub fn resolve_pages<R: AnchorResolver + ?Sized>(
    entries: Vec<ParsedEntry>,
    total_pages: u32,
    front_matter_offset: i64,
    suggest: impl FnOnce(&str) -> Option<u32>,
    resolver: &mut R,
) -> Result<Resolution, ResolutionError> {
    let anchor = find_anchor(&entries).ok_or(ResolutionError::NoAnchor)?;
    let anchor_entry = &entries[anchor];

    let query = AnchorQuery {
        title: anchor_entry.entry.title.clone(),
        printed_page: anchor_entry.entry.printed_page.clone(),
        value: anchor_entry.numbering.value(),
        total_pages,
        suggestion: if resolver.uses_suggestion() {
            suggest(&anchor_entry.entry.printed_page)
        } else {
            None
        },
    };
    let anchor_page = resolver.resolve_anchor(&query)?;
    if anchor_page == 0 || anchor_page > total_pages {
        return Err(ResolutionError::AnchorOutOfRange {
            page: anchor_page,
            total: total_pages,
        });
    }

    let offset = i64::from(anchor_page) - i64::from(query.value);
    info!(
        anchor = %query.title,
        printed = %query.printed_page,
        anchor_page,
        offset,
        "resolved anchor"
    );

    let entries = entries
        .into_iter()
        .map(|parsed| {
            let shift = match parsed.numbering {
                Numbering::Decimal(_) => offset,
                Numbering::Roman(_) => front_matter_offset,
            };
            let page = i64::from(parsed.numbering.value()) + shift;
            let pdf_page = u32::try_from(page)
                .ok()
                .filter(|&p| p >= 1)
                .ok_or_else(|| ResolutionError::NonPositivePage {
                    title: parsed.entry.title.clone(),
                    page,
                })?;
            Ok(ResolvedEntry { parsed, pdf_page })
        })
        .collect::<Result<Vec<_>, ResolutionError>>()?;

    Ok(Resolution {
        anchor,
        anchor_page,
        offset,
        front_matter_offset,
        entries,
    })
}
