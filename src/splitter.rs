use crate::error::SplitError;
use crate::pdf::PdfDocument;
use crate::plan::SplitPlan;
use crate::ranges::{validate_ranges, PageRange};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// A read-only document that can copy a span of its pages to a new file.
pub trait PageSource {
    fn page_count(&self) -> u32;

    /// Write pages `start..=end` (1-based) to `dest`.
    fn write_range(&self, start: u32, end: u32, dest: &Path) -> Result<()>;
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        PdfDocument::page_count(self)
    }

    fn write_range(&self, start: u32, end: u32, dest: &Path) -> Result<()> {
        let mut new_doc = self.extract_range(start, end)?;
        PdfDocument::save(&mut new_doc, dest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedFile {
    #[serde(flatten)]
    pub range: PageRange,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRange {
    #[serde(flatten)]
    pub range: PageRange,
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub created: Vec<CreatedFile>,
    pub failed: Vec<FailedRange>,
}

impl SplitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Ok` when every file was written, otherwise `SplitError::Incomplete`.
    pub fn into_result(self) -> Result<SplitReport, SplitError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(SplitError::Incomplete {
                failed: self.failed.len(),
                total: self.failed.len() + self.created.len(),
            })
        }
    }
}

/// Write one file per planned range into `output_dir`.
///
/// Ranges are checked against the source before anything is written. A
/// failure on one range is recorded in the report and the remaining ranges
/// are still attempted.
pub fn split<S: PageSource + ?Sized>(
    source: &S,
    plan: &SplitPlan,
    output_dir: &Path,
) -> Result<SplitReport, SplitError> {
    let ranges: Vec<PageRange> = plan.files.iter().map(|f| f.range.clone()).collect();
    validate_ranges(&ranges, source.page_count())?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut report = SplitReport::default();
    for planned in &plan.files {
        let range = &planned.range;
        let dest = output_dir.join(&planned.file);

        match source.write_range(range.start, range.end, &dest) {
            Ok(()) => {
                info!(file = %planned.file, start = range.start, end = range.end, "wrote");
                report.created.push(CreatedFile {
                    range: range.clone(),
                    file: planned.file.clone(),
                });
            }
            Err(e) => {
                warn!(file = %planned.file, "failed: {:#}", e);
                report.failed.push(FailedRange {
                    range: range.clone(),
                    file: planned.file.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    Ok(report)
}
