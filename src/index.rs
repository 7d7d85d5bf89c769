//! Parsing of the pasted chapter index.
//!
//! Each non-blank line holds a title and a printed page number, separated by
//! a tab. Lines without a tab fall back to whitespace: the last token is the
//! page number and everything before it is the title.

use crate::numbering::{classify, ClassificationError, Numbering};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Column names commonly found in a pasted header row.
pub const DEFAULT_HEADER_TOKENS: &[&str] = &[
    "PDF File Name",
    "PDF Page",
    "Title",
    "Page",
    "Chapter",
    "Section",
];

static WHITESPACE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?\S)\s+(\S+)$").expect("static regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// 1-based line in the pasted text
    pub line: usize,
    pub title: String,
    pub printed_page: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub entry: IndexEntry,
    pub numbering: Numbering,
}

impl ParsedEntry {
    pub fn title(&self) -> &str {
        &self.entry.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected a title and a page number, got {content:?}")]
    MissingField { line: usize, content: String },

    #[error("line {line}: {source} (in {content:?})")]
    BadPage {
        line: usize,
        content: String,
        #[source]
        source: ClassificationError,
    },

    #[error("the index contains no entries")]
    Empty,
}

/// Recognizes a pasted header row.
#[derive(Debug, Clone)]
pub struct HeaderTokens {
    tokens: Vec<String>,
}

impl Default for HeaderTokens {
    fn default() -> Self {
        HeaderTokens::new(DEFAULT_HEADER_TOKENS.iter().copied())
    }
}

impl HeaderTokens {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        HeaderTokens {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Add extra tokens on top of the existing set.
    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tokens
            .extend(tokens.into_iter().map(|t| t.as_ref().trim().to_lowercase()));
    }

    fn contains(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.tokens.iter().any(|t| *t == field)
    }

    /// A line is a header when both of its fields are known column names.
    pub fn is_header(&self, title: &str, page: &str) -> bool {
        self.contains(title) && self.contains(page)
    }
}

/// Split one line into `(title, page)`, trimmed. `None` if either is missing.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let (title, page) = match line.split_once('\t') {
        Some((title, rest)) => {
            // Trailing columns (e.g. a copied third column) are ignored.
            let page = rest.split('\t').map(str::trim).find(|s| !s.is_empty())?;
            (title, page)
        }
        None => {
            let caps = WHITESPACE_SPLIT.captures(line.trim())?;
            let title = caps.get(1)?.as_str();
            let page = caps.get(2)?.as_str();
            (title, page)
        }
    };

    let (title, page) = (title.trim(), page.trim());
    if title.is_empty() || page.is_empty() {
        None
    } else {
        Some((title, page))
    }
}

/// One result per non-blank line, header row excluded.
pub fn parse_lines(text: &str, headers: &HeaderTokens) -> Vec<Result<IndexEntry, ParseError>> {
    let mut results = Vec::new();
    let mut seen_first = false;
    // files saved by some spreadsheet tools start with a byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let Some((title, page)) = split_line(raw) else {
            seen_first = true;
            results.push(Err(ParseError::MissingField {
                line,
                content: raw.to_string(),
            }));
            continue;
        };

        if !seen_first {
            seen_first = true;
            if headers.is_header(title, page) {
                debug!(line, "skipping header row");
                continue;
            }
        }

        results.push(Ok(IndexEntry {
            line,
            title: title.to_string(),
            printed_page: page.to_string(),
        }));
    }

    results
}

/// Parse the pasted index into entries, in input order. The first bad line
/// is an error.
pub fn parse_index(text: &str, headers: &HeaderTokens) -> Result<Vec<IndexEntry>, ParseError> {
    let entries = parse_lines(text, headers)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    if entries.is_empty() {
        return Err(ParseError::Empty);
    }

    debug!(count = entries.len(), "parsed index");
    Ok(entries)
}

pub fn classify_entry(entry: IndexEntry) -> Result<ParsedEntry, ParseError> {
    match classify(&entry.printed_page) {
        Ok(numbering) => Ok(ParsedEntry { entry, numbering }),
        Err(source) => Err(ParseError::BadPage {
            line: entry.line,
            content: format!("{}\t{}", entry.title, entry.printed_page),
            source,
        }),
    }
}

/// Classify every entry's printed page.
pub fn classify_entries(entries: Vec<IndexEntry>) -> Result<Vec<ParsedEntry>, ParseError> {
    entries.into_iter().map(classify_entry).collect()
}
