use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SplitError;
use crate::pdf::page_labels::{extract_page_labels, suggest_page};
use crate::pdf::PdfDocument;
use crate::plan::{build_plan, parse_entries, SplitOptions, SplitPlan};
use crate::resolve::{AnchorResolver, FixedAnchor, LabelAnchor};
use crate::splitter::{split, SplitReport};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitPlanRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Index text: one 'title<TAB>page' per line, pages in decimal or roman numerals")]
    pub index: String,
    #[schemars(
        description = "PDF page (1-based) where the first decimal-numbered entry starts. \
                       If omitted, the PDF's page labels are used."
    )]
    pub anchor_page: Option<u32>,
    #[schemars(description = "Shift applied to roman-numbered entries (default: 0)")]
    #[serde(default)]
    pub front_matter_offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitByIndexRequest {
    #[serde(flatten)]
    pub plan: SplitPlanRequest,
    #[schemars(description = "Directory for the output files")]
    pub output_dir: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn plan_for(
    req: &SplitPlanRequest,
    output_dir: Option<&str>,
) -> Result<(PdfDocument, SplitPlan, SplitOptions), SplitError> {
    let mut options = SplitOptions {
        front_matter_offset: req.front_matter_offset,
        ..Default::default()
    };
    if let Some(dir) = output_dir {
        options.output_dir = PathBuf::from(dir);
    }

    let parsed = parse_entries(&req.index, &options)?;
    let doc = PdfDocument::open(&req.path)?;
    let mut resolver: Box<dyn AnchorResolver> = match req.anchor_page {
        Some(page) => Box::new(FixedAnchor(page)),
        None => Box::new(LabelAnchor),
    };
    let plan = build_plan(
        parsed,
        doc.page_count(),
        &options,
        |printed| suggest_page(&doc.doc, printed),
        resolver.as_mut(),
    )?;
    Ok((doc, plan, options))
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, creation date, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    creator: info.creator,
                    producer: info.producer,
                    creation_date: info.creation_date,
                    subject: info.subject,
                    keywords: info.keywords,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Get the mapping between physical page numbers (1-indexed) and logical page labels")]
    fn pdf_page_labels(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match extract_page_labels(&path) {
            Ok(labels) => {
                let result: Vec<PageLabelResult> = labels
                    .into_iter()
                    .map(|l| PageLabelResult {
                        physical_page: l.physical_page,
                        logical_label: l.logical_label,
                    })
                    .collect();
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Compute the page ranges and file names for splitting a PDF by a chapter index, without writing files")]
    fn pdf_split_plan(&self, Parameters(req): Parameters<SplitPlanRequest>) -> String {
        match plan_for(&req, None) {
            Ok((_, plan, _)) => {
                serde_json::to_string_pretty(&plan).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Split a PDF into one file per chapter index entry and report the files written")]
    fn pdf_split_by_index(&self, Parameters(req): Parameters<SplitByIndexRequest>) -> String {
        let (doc, plan, options) = match plan_for(&req.plan, Some(&req.output_dir)) {
            Ok(p) => p,
            Err(e) => return format!("Error: {}", e),
        };

        match split(&doc, &plan, &options.output_dir) {
            Ok(report) => {
                let result = SplitResult {
                    output_dir: req.output_dir,
                    complete: report.is_complete(),
                    report,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageLabelResult {
    pub physical_page: u32,
    pub logical_label: String,
}

#[derive(Debug, Serialize)]
pub struct SplitResult {
    pub output_dir: String,
    pub complete: bool,
    #[serde(flatten)]
    pub report: SplitReport,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Split PDF books by a chapter index. Use pdf_info for metadata, pdf_page_labels \
                 to see printed vs physical page numbers, pdf_split_plan to preview the ranges \
                 for an index, and pdf_split_by_index to write one PDF per entry."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
