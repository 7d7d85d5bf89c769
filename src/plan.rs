//! Index text to a list of output files, without touching any PDF.

use crate::error::SplitError;
use crate::index::{
    classify_entries, classify_entry, parse_index, parse_lines, HeaderTokens, ParseError,
    ParsedEntry,
};
use crate::naming::{file_name, sequence_width, SanitizeMode};
use crate::ranges::{build_ranges, PageRange};
use crate::resolve::{resolve_pages, AnchorResolver};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub output_dir: PathBuf,
    pub separator: String,
    /// Minimum width of the zero-padded sequence number
    pub min_width: usize,
    pub sanitize: SanitizeMode,
    pub header_tokens: HeaderTokens,
    /// Shift applied to roman-numbered entries
    pub front_matter_offset: i64,
    /// Skip malformed index lines with a warning instead of failing
    pub skip_invalid: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            output_dir: PathBuf::from("."),
            separator: " ".to_string(),
            min_width: 2,
            sanitize: SanitizeMode::default(),
            header_tokens: HeaderTokens::default(),
            front_matter_offset: 0,
            skip_invalid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub title: String,
    pub printed_page: String,
    pub pdf_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    #[serde(flatten)]
    pub range: PageRange,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub anchor: Anchor,
    pub offset: i64,
    pub front_matter_offset: i64,
    pub total_pages: u32,
    pub files: Vec<PlannedFile>,
}

/// Parse and classify the index text.
pub fn parse_entries(
    index_text: &str,
    options: &SplitOptions,
) -> Result<Vec<ParsedEntry>, SplitError> {
    if !options.skip_invalid {
        let entries = parse_index(index_text, &options.header_tokens)?;
        return Ok(classify_entries(entries)?);
    }

    let mut parsed = Vec::new();
    for result in parse_lines(index_text, &options.header_tokens) {
        match result.and_then(classify_entry) {
            Ok(entry) => parsed.push(entry),
            Err(e) => warn!("skipping {}", e),
        }
    }
    if parsed.is_empty() {
        return Err(ParseError::Empty.into());
    }
    Ok(parsed)
}

/// Resolve and range parsed entries, and name the output files.
///
/// `suggest` maps a printed page to a physical page when the document's page
/// labels know it; it is only consulted for the anchor entry.
pub fn build_plan<R: AnchorResolver + ?Sized>(
    parsed: Vec<ParsedEntry>,
    total_pages: u32,
    options: &SplitOptions,
    suggest: impl FnOnce(&str) -> Option<u32>,
    resolver: &mut R,
) -> Result<SplitPlan, SplitError> {
    let resolution = resolve_pages(
        parsed,
        total_pages,
        options.front_matter_offset,
        suggest,
        resolver,
    )?;
    let ranges = build_ranges(&resolution.entries, total_pages)?;

    let anchor_entry = &resolution.entries[resolution.anchor];
    let anchor = Anchor {
        title: anchor_entry.title().to_string(),
        printed_page: anchor_entry.parsed.entry.printed_page.clone(),
        pdf_page: resolution.anchor_page,
    };

    let width = sequence_width(ranges.len(), options.min_width);
    let sanitizer = options.sanitize.sanitizer();
    let files = ranges
        .into_iter()
        .map(|range| {
            let file = file_name(
                range.sequence,
                width,
                &options.separator,
                &range.title,
                sanitizer.as_ref(),
            );
            PlannedFile { range, file }
        })
        .collect::<Vec<_>>();

    info!(files = files.len(), offset = resolution.offset, "planned split");

    Ok(SplitPlan {
        anchor,
        offset: resolution.offset,
        front_matter_offset: resolution.front_matter_offset,
        total_pages,
        files,
    })
}
