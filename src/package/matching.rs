use crate::config::IdentifierPattern;
use crate::inventory::Inventory;
use crate::report::Warning;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// PDFs directly inside `dir`, sorted by file name.
pub fn list_source_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut pdfs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let is_pdf = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if entry.file_type().is_file() && is_pdf {
            pdfs.push(entry.into_path());
        }
    }
    Ok(pdfs)
}

/// Inventory key for a source file: the identifier at the start of the name
/// (up to the first `.`), or that whole stem when there is none.
pub fn document_key(path: &Path, pattern: &IdentifierPattern) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.split('.').next().unwrap_or(name);
    Some(
        pattern
            .leading_identifier(stem)
            .unwrap_or(stem)
            .to_string(),
    )
}

/// Pair inventory documents with source files. Files that match nothing,
/// extra files for an already matched document, and documents without a
/// file are all reported.
pub fn match_sources(
    sources: &[PathBuf],
    inventory: &Inventory,
    pattern: &IdentifierPattern,
    warnings: &mut Vec<Warning>,
) -> BTreeMap<String, PathBuf> {
    let mut matched: BTreeMap<String, PathBuf> = BTreeMap::new();

    for path in sources {
        let file = path.display().to_string();
        let key = match document_key(path, pattern) {
            Some(key) if inventory.get(&key).is_some() => key,
            _ => {
                tracing::warn!("no matching information found for {}", file);
                warnings.push(Warning::UnmatchedSource { file });
                continue;
            }
        };
        if matched.contains_key(&key) {
            warnings.push(Warning::DuplicateSource {
                document: key,
                file,
            });
            continue;
        }
        matched.insert(key, path.clone());
    }

    for (document, _) in inventory.iter() {
        if !matched.contains_key(document) {
            warnings.push(Warning::MissingSource {
                document: document.to_string(),
            });
        }
    }

    matched
}
