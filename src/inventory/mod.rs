//! Reading archive inventories: which sub-files each document holds and
//! where in the scanned PDF they start.

pub mod columns;
pub mod extractor;
pub mod page_value;
pub mod workbook;

use crate::config::Config;
use crate::report::Warning;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A spreadsheet cell, independent of the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Blank cells, whitespace-only text and NaN all count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Float(f) => f.is_nan(),
            CellValue::Int(_) | CellValue::Bool(_) => false,
        }
    }

    /// Text form used for identifiers and titles. Integral floats lose
    /// their fractional part, so `3.0` reads as `3`.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        Some(match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            other => other.to_string(),
        })
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One worksheet: a header row followed by data rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
    /// 1-based spreadsheet row of `rows[0]`. Leading blank rows are not
    /// part of `rows`, so this can be past 1.
    pub first_row: usize,
}

impl Sheet {
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubFileRecord {
    pub sub_file_id: String,
    pub start_page: u32,
    pub title: Option<String>,
}

impl SubFileRecord {
    /// `<id> <title>.pdf`, or `<id>.pdf` when there is no title.
    pub fn output_file_name(&self) -> String {
        let stem = match &self.title {
            Some(title) => format!("{} {}", self.sub_file_id, title),
            None => self.sub_file_id.clone(),
        };
        format!("{}.pdf", sanitize_file_name(&stem))
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sub-files of every document, each list ordered by start page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    documents: BTreeMap<String, Vec<SubFileRecord>>,
}

impl Inventory {
    pub fn get(&self, document: &str) -> Option<&[SubFileRecord]> {
        self.documents.get(document).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SubFileRecord])> {
        self.documents
            .iter()
            .map(|(id, records)| (id.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Merge one sheet's documents in. A document seen again replaces the
    /// earlier sheet's list wholesale.
    pub fn merge_sheet(
        &mut self,
        sheet: &str,
        documents: BTreeMap<String, Vec<SubFileRecord>>,
        warnings: &mut Vec<Warning>,
    ) {
        for (document, records) in documents {
            if self.documents.insert(document.clone(), records).is_some() {
                warnings.push(Warning::DocumentOverwritten {
                    document,
                    sheet: sheet.to_string(),
                });
            }
        }
    }
}

/// Build the inventory from every sheet in order.
pub fn build_inventory(sheets: &[Sheet], config: &Config) -> Result<(Inventory, Vec<Warning>)> {
    let pattern = config.identifier_pattern()?;
    let mut inventory = Inventory::default();
    let mut warnings = Vec::new();

    for sheet in sheets {
        tracing::debug!(sheet = %sheet.name, rows = sheet.rows.len(), "processing sheet");
        match extractor::extract_sheet(sheet, config, &pattern, &mut warnings) {
            Some(documents) => {
                tracing::info!(
                    sheet = %sheet.name,
                    documents = documents.len(),
                    "found file information"
                );
                inventory.merge_sheet(&sheet.name, documents, &mut warnings);
            }
            None => tracing::info!(sheet = %sheet.name, "no file information found"),
        }
    }

    Ok((inventory, warnings))
}

/// Read a workbook from disk and build its inventory.
pub fn load_inventory<P: AsRef<Path>>(path: P, config: &Config) -> Result<(Inventory, Vec<Warning>)> {
    let (sheets, mut warnings) = workbook::read_workbook(path)?;
    let (inventory, more) = build_inventory(&sheets, config)?;
    warnings.extend(more);
    Ok((inventory, warnings))
}
