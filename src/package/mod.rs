//! Turning an inventory plus a folder of scanned PDFs into one zip per
//! document.

pub mod matching;
pub mod packager;

use crate::config::IdentifierPattern;
use crate::inventory::Inventory;
use crate::page_range::resolve_ranges;
use crate::pdf::PdfDocument;
use crate::report::{DocumentFailure, DocumentStage, RunReport, Warning};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Package every inventory document that has a source PDF in `input_dir`.
///
/// Only setup problems (unlistable input, unusable output directory) are
/// errors. Anything that goes wrong for a single document is recorded in
/// the report and the batch moves on.
pub fn package_all(
    inventory: &Inventory,
    input_dir: &Path,
    output_dir: &Path,
    pattern: &IdentifierPattern,
    mut warnings: Vec<Warning>,
) -> Result<RunReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let sources = matching::list_source_pdfs(input_dir)?;
    let matched = matching::match_sources(&sources, inventory, pattern, &mut warnings);

    let mut report = RunReport {
        documents_skipped: inventory.len() - matched.len(),
        ..Default::default()
    };

    for (document, source) in &matched {
        let Some(records) = inventory.get(document) else {
            continue;
        };
        match packager::package_document(document, records, source, output_dir, &mut warnings) {
            Ok(packaged) => {
                report.documents_processed += 1;
                report.splits.extend(packaged.splits);
                report.archives.push(packaged.archive.display().to_string());
            }
            Err(failure) => {
                report.documents_failed += 1;
                report.failures.push(failure);
            }
        }
    }

    tracing::info!(
        processed = report.documents_processed,
        skipped = report.documents_skipped,
        failed = report.documents_failed,
        "run finished"
    );
    report.warnings = warnings;
    Ok(report)
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedOutput {
    pub file_name: String,
    pub start: u32,
    pub end: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentPlan {
    pub document: String,
    pub source: String,
    pub total_pages: u32,
    pub outputs: Vec<PlannedOutput>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct PlanReport {
    pub documents: Vec<DocumentPlan>,
    pub warnings: Vec<Warning>,
    pub failures: Vec<DocumentFailure>,
}

/// Work out what `package_all` would write, reading only page counts.
pub fn plan_all(
    inventory: &Inventory,
    input_dir: &Path,
    pattern: &IdentifierPattern,
    mut warnings: Vec<Warning>,
) -> Result<PlanReport> {
    let sources = matching::list_source_pdfs(input_dir)?;
    let matched = matching::match_sources(&sources, inventory, pattern, &mut warnings);

    let mut report = PlanReport::default();
    for (document, source) in &matched {
        let Some(records) = inventory.get(document) else {
            continue;
        };
        let total_pages = match PdfDocument::open(source) {
            Ok(pdf) => pdf.page_count(),
            Err(e) => {
                report.failures.push(DocumentFailure {
                    document: document.clone(),
                    stage: DocumentStage::Splitting,
                    message: format!("{:#}", e),
                });
                continue;
            }
        };

        let names = packager::output_names(document, records, &mut warnings);
        let outputs = resolve_ranges(records, total_pages)
            .iter()
            .zip(names)
            .map(|(planned, file_name)| {
                let pages = planned.range.page_count_within(total_pages);
                if pages == 0 {
                    warnings.push(packager::empty_range_warning(document, planned, total_pages));
                }
                PlannedOutput {
                    file_name,
                    start: planned.range.start,
                    end: planned.range.end.min(total_pages),
                    pages,
                }
            })
            .collect();

        report.documents.push(DocumentPlan {
            document: document.clone(),
            source: source.display().to_string(),
            total_pages,
            outputs,
        });
    }

    report.warnings = warnings;
    Ok(report)
}

impl PlanReport {
    pub fn print(&self) {
        for plan in &self.documents {
            println!("{} ({}, {} pages)", plan.document, plan.source, plan.total_pages);
            for output in &plan.outputs {
                println!(
                    "  {} (pages {}-{}, {} page(s))",
                    output.file_name, output.start, output.end, output.pages
                );
            }
        }
        for warning in &self.warnings {
            println!("Warning: {}", warning);
        }
        for failure in &self.failures {
            println!("Failed: {}: {}", failure.document, failure.message);
        }
    }
}
