use crate::inventory::SubFileRecord;
use crate::page_range::{resolve_ranges, PlannedSplit};
use crate::pdf::{split_range, PdfDocument};
use crate::report::{DocumentFailure, DocumentStage, SplitRecord, Warning};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug)]
pub struct PackagedDocument {
    pub archive: PathBuf,
    pub splits: Vec<SplitRecord>,
}

/// Output file names for a document's sub-files, in order. A name already
/// taken gets a ` (n)` suffix.
pub fn output_names(
    document: &str,
    records: &[SubFileRecord],
    warnings: &mut Vec<Warning>,
) -> Vec<String> {
    let mut taken = HashSet::new();
    records
        .iter()
        .map(|record| {
            let name = record.output_file_name();
            if taken.insert(name.clone()) {
                return name;
            }
            warnings.push(Warning::DuplicateOutputName {
                document: document.to_string(),
                name: name.clone(),
            });
            let stem = name.trim_end_matches(".pdf");
            (2..)
                .map(|n| format!("{} ({}).pdf", stem, n))
                .find(|candidate| taken.insert(candidate.clone()))
                .unwrap_or(name)
        })
        .collect()
}

pub fn empty_range_warning(document: &str, planned: &PlannedSplit<'_>, total_pages: u32) -> Warning {
    Warning::EmptyRange {
        document: document.to_string(),
        sub_file: planned.record.sub_file_id.clone(),
        start: planned.range.start,
        end: planned.range.end,
        total_pages,
    }
}

/// Split one document's source PDF into its sub-files and zip them as
/// `<document>.zip` in `output_dir`.
///
/// Work happens in a uniquely named scratch directory inside `output_dir`
/// that is removed whether or not the pass succeeds, and the archive is only
/// moved into place once complete, so a failed document leaves nothing
/// behind.
pub fn package_document(
    document: &str,
    records: &[SubFileRecord],
    source: &Path,
    output_dir: &Path,
    warnings: &mut Vec<Warning>,
) -> Result<PackagedDocument, DocumentFailure> {
    let mut stage = DocumentStage::Matching;
    let result = run_stages(document, records, source, output_dir, warnings, &mut stage);
    result.map_err(|e| {
        tracing::error!(document, %stage, "packaging failed: {:#}", e);
        DocumentFailure {
            document: document.to_string(),
            stage,
            message: format!("{:#}", e),
        }
    })
}

fn run_stages(
    document: &str,
    records: &[SubFileRecord],
    source: &Path,
    output_dir: &Path,
    warnings: &mut Vec<Warning>,
    stage: &mut DocumentStage,
) -> Result<PackagedDocument> {
    // Opening the matched source counts as splitting.
    *stage = DocumentStage::Splitting;
    let pdf = PdfDocument::open(source)?;
    let total_pages = pdf.page_count();
    let plan = resolve_ranges(records, total_pages);
    let names = output_names(document, records, warnings);
    tracing::info!(document, total_pages, sub_files = plan.len(), "processing {}", source.display());

    let scratch = tempfile::Builder::new()
        .prefix(&format!("{}-", document))
        .tempdir_in(output_dir)
        .with_context(|| format!("Failed to create scratch directory in {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(plan.len());
    let mut splits = Vec::with_capacity(plan.len());
    for (planned, name) in plan.iter().zip(names) {
        let path = scratch.path().join(&name);
        let pages_written = split_range(&pdf, planned.range, &path)?;
        if pages_written == 0 {
            warnings.push(empty_range_warning(document, planned, total_pages));
        }
        tracing::info!(
            document,
            "Created: {} (pages {}-{})",
            name,
            planned.range.start,
            planned.range.end
        );
        splits.push(SplitRecord {
            document: document.to_string(),
            file_name: name.clone(),
            start: planned.range.start,
            end: planned.range.end.min(total_pages),
            pages_written,
        });
        written.push((name, path));
    }

    *stage = DocumentStage::Archiving;
    let archive_name = format!("{}.zip", document);
    let staged = scratch.path().join(&archive_name);
    write_archive(&staged, &written)?;
    let archive = output_dir.join(&archive_name);
    std::fs::rename(&staged, &archive)
        .with_context(|| format!("Failed to move archive to {}", archive.display()))?;
    tracing::info!(document, "Created ZIP file: {}", archive_name);

    *stage = DocumentStage::CleaningUp;
    let scratch_path = scratch.path().to_path_buf();
    scratch
        .close()
        .with_context(|| format!("Failed to remove {}", scratch_path.display()))?;

    *stage = DocumentStage::Done;
    Ok(PackagedDocument { archive, splits })
}

/// Deflate `files` into a new zip at `path`, in the given order.
pub fn write_archive(path: &Path, files: &[(String, PathBuf)]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create archive: {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, source) in files {
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {} to {}", name, path.display()))?;
        let mut input = File::open(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        std::io::copy(&mut input, &mut zip)
            .with_context(|| format!("Failed to add {} to {}", name, path.display()))?;
    }

    zip.finish()
        .with_context(|| format!("Failed to finish archive: {}", path.display()))?;
    Ok(())
}
