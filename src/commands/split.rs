use crate::cli::SplitArgs;
use crate::error::SplitError;
use crate::pdf::page_labels::suggest_page;
use crate::pdf::PdfDocument;
use crate::plan::{build_plan, parse_entries, SplitPlan};
use crate::prompt::{read_index_from_stdin, ConsolePrompt};
use crate::resolve::{AnchorResolver, FixedAnchor, LabelAnchor};
use crate::splitter::{split, SplitReport};
use anyhow::Context;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct JsonOutput<'a> {
    plan: &'a SplitPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a SplitReport>,
}

pub fn run(args: &SplitArgs, dry_run: bool) -> Result<(), SplitError> {
    if !args.path.is_file() {
        return Err(SplitError::Usage(format!(
            "PDF file not found: {}",
            args.path.display()
        )));
    }

    let options = args.options();

    let index_text = match &args.index {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?,
        None => read_index_from_stdin().context("Failed to read index from stdin")?,
    };
    // Index problems surface before the PDF is even opened.
    let parsed = parse_entries(&index_text, &options)?;

    let doc = PdfDocument::open(&args.path)?;
    let total_pages = doc.page_count();
    info!(path = %doc.path, pages = total_pages, "opened source");

    let mut resolver: Box<dyn AnchorResolver> = match (args.anchor_page, args.use_page_labels) {
        (Some(page), _) => Box::new(FixedAnchor(page)),
        (None, true) => Box::new(LabelAnchor),
        (None, false) => Box::new(ConsolePrompt::stdio()),
    };
    let plan = build_plan(
        parsed,
        total_pages,
        &options,
        |printed| suggest_page(&doc.doc, printed),
        resolver.as_mut(),
    )?;

    if dry_run || args.dry_run {
        if args.json {
            print_json(&JsonOutput {
                plan: &plan,
                report: None,
            })?;
        } else {
            print_plan(&plan);
        }
        return Ok(());
    }

    let report = split(&doc, &plan, &options.output_dir)?;

    if args.json {
        print_json(&JsonOutput {
            plan: &plan,
            report: Some(&report),
        })?;
    } else {
        print_report(&report, &options.output_dir);
    }

    report.into_result().map(|_| ())
}

fn print_json(output: &JsonOutput) -> Result<(), SplitError> {
    let json = serde_json::to_string_pretty(output).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_plan(plan: &SplitPlan) {
    println!(
        "Anchor: \"{}\" (printed page {}) starts on PDF page {}, offset {:+}",
        plan.anchor.title, plan.anchor.printed_page, plan.anchor.pdf_page, plan.offset
    );
    if plan.front_matter_offset != 0 {
        println!("Front matter offset: {:+}", plan.front_matter_offset);
    }
    for f in &plan.files {
        println!(
            "{}  \"{}\" (pages {}-{}, {} page(s))",
            f.file,
            f.range.title,
            f.range.start,
            f.range.end,
            f.range.page_count()
        );
    }
    println!("\n{} file(s) would be written.", plan.files.len());
}

fn print_report(report: &SplitReport, output_dir: &std::path::Path) {
    for c in &report.created {
        println!(
            "Created: {} \"{}\" (pages {}-{})",
            c.file, c.range.title, c.range.start, c.range.end
        );
    }
    for f in &report.failed {
        eprintln!(
            "Failed: {} \"{}\" (pages {}-{}): {}",
            f.file, f.range.title, f.range.start, f.range.end, f.error
        );
    }

    println!(
        "\nSplit into {} file(s) in {}",
        report.created.len(),
        output_dir.display()
    );
    if !report.created.is_empty() {
        println!("Generated files:");
        for c in &report.created {
            println!("  - {}", c.file);
        }
    }
}
