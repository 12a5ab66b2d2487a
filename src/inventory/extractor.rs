use super::columns::{resolve_columns, ResolvedColumns};
use super::page_value::{parse_start_page, PageValueError};
use super::{CellValue, Sheet, SubFileRecord};
use crate::config::{Config, IdentifierPattern};
use crate::report::Warning;
use std::collections::BTreeMap;

/// Per-document sub-file lists from one sheet, or `None` when the sheet
/// lacks one of the required columns.
pub fn extract_sheet(
    sheet: &Sheet,
    config: &Config,
    pattern: &IdentifierPattern,
    warnings: &mut Vec<Warning>,
) -> Option<BTreeMap<String, Vec<SubFileRecord>>> {
    let headers = sheet.headers();
    let columns = match resolve_columns(&headers, config) {
        Ok(columns) => columns,
        Err(missing) => {
            tracing::warn!(sheet = %sheet.name, ?missing, "required columns not found");
            warnings.push(Warning::MissingColumns {
                sheet: sheet.name.clone(),
                missing,
            });
            return None;
        }
    };
    tracing::debug!(sheet = %sheet.name, ?columns, "using columns");

    let mut fold = RowFold::new(&sheet.name, columns, pattern);
    for (index, row) in sheet.rows.iter().enumerate().skip(1) {
        fold.step(sheet.first_row + index, row, warnings);
    }
    Some(fold.finish())
}

/// Walks rows top to bottom, carrying the last seen document identifier
/// forward over rows that leave it blank.
struct RowFold<'a> {
    sheet: &'a str,
    columns: ResolvedColumns,
    pattern: &'a IdentifierPattern,
    current: Option<String>,
    documents: BTreeMap<String, Vec<SubFileRecord>>,
}

impl<'a> RowFold<'a> {
    fn new(sheet: &'a str, columns: ResolvedColumns, pattern: &'a IdentifierPattern) -> Self {
        RowFold {
            sheet,
            columns,
            pattern,
            current: None,
            documents: BTreeMap::new(),
        }
    }

    fn step(&mut self, row_number: usize, row: &[CellValue], warnings: &mut Vec<Warning>) {
        let cell = |index: usize| row.get(index).unwrap_or(&CellValue::Empty);

        if let Some(value) = cell(self.columns.document).as_text() {
            if let Some(id) = self.pattern.leading_identifier(&value) {
                self.current = Some(id.to_string());
            } else if self.pattern.has_prefix(&value) {
                warnings.push(Warning::UnrecognizedDocumentId {
                    sheet: self.sheet.to_string(),
                    row: row_number,
                    value,
                });
                self.current = None;
            }
        }

        let Some(document) = &self.current else {
            return;
        };
        let Some(sub_file_id) = cell(self.columns.sub_file).as_text() else {
            return;
        };
        let page_cell = cell(self.columns.page);
        if page_cell.is_missing() {
            return;
        }

        let start_page = match parse_start_page(page_cell) {
            Ok(Some(page)) => page,
            Ok(None) => return,
            Err(err) => {
                let sheet = self.sheet.to_string();
                let value = page_cell.to_string();
                tracing::warn!(%sheet, row = row_number, %value, "skipping row with bad page number");
                warnings.push(match err {
                    PageValueError::Unparseable => Warning::UnparseablePage {
                        sheet,
                        row: row_number,
                        value,
                    },
                    PageValueError::NonPositive => Warning::NonPositivePage {
                        sheet,
                        row: row_number,
                        value,
                    },
                });
                return;
            }
        };

        self.documents
            .entry(document.clone())
            .or_default()
            .push(SubFileRecord {
                sub_file_id,
                start_page,
                title: cell(self.columns.title).as_text(),
            });
    }

    fn finish(mut self) -> BTreeMap<String, Vec<SubFileRecord>> {
        // Stable, so equal start pages keep their row order.
        for records in self.documents.values_mut() {
            records.sort_by_key(|r| r.start_page);
        }
        self.documents
    }
}
