use serde::Serialize;
use std::fmt;

/// A recoverable problem. Collected during a run and surfaced at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    SheetUnreadable {
        sheet: String,
        error: String,
    },
    MissingColumns {
        sheet: String,
        missing: Vec<&'static str>,
    },
    UnparseablePage {
        sheet: String,
        row: usize,
        value: String,
    },
    NonPositivePage {
        sheet: String,
        row: usize,
        value: String,
    },
    UnrecognizedDocumentId {
        sheet: String,
        row: usize,
        value: String,
    },
    DocumentOverwritten {
        document: String,
        sheet: String,
    },
    UnmatchedSource {
        file: String,
    },
    DuplicateSource {
        document: String,
        file: String,
    },
    MissingSource {
        document: String,
    },
    EmptyRange {
        document: String,
        sub_file: String,
        start: u32,
        end: u32,
        total_pages: u32,
    },
    DuplicateOutputName {
        document: String,
        name: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SheetUnreadable { sheet, error } => {
                write!(f, "sheet '{}' could not be read: {}", sheet, error)
            }
            Warning::MissingColumns { sheet, missing } => write!(
                f,
                "sheet '{}' has no column for: {}",
                sheet,
                missing.join(", ")
            ),
            Warning::UnparseablePage { sheet, row, value } => write!(
                f,
                "sheet '{}' row {}: could not parse page number '{}'",
                sheet, row, value
            ),
            Warning::NonPositivePage { sheet, row, value } => write!(
                f,
                "sheet '{}' row {}: page number '{}' is not positive",
                sheet, row, value
            ),
            Warning::UnrecognizedDocumentId { sheet, row, value } => write!(
                f,
                "sheet '{}' row {}: '{}' is not a valid document identifier",
                sheet, row, value
            ),
            Warning::DocumentOverwritten { document, sheet } => write!(
                f,
                "document {} was redefined by sheet '{}'",
                document, sheet
            ),
            Warning::UnmatchedSource { file } => {
                write!(f, "no matching information found for {}", file)
            }
            Warning::DuplicateSource { document, file } => write!(
                f,
                "{} is another source for {}; ignored",
                file, document
            ),
            Warning::MissingSource { document } => {
                write!(f, "no source PDF found for {}", document)
            }
            Warning::EmptyRange {
                document,
                sub_file,
                start,
                end,
                total_pages,
            } => write!(
                f,
                "{} / {}: pages {}-{} select nothing from a {}-page document",
                document, sub_file, start, end, total_pages
            ),
            Warning::DuplicateOutputName { document, name } => {
                write!(f, "{}: output name '{}' already used", document, name)
            }
        }
    }
}

/// Where a document was in its packaging pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStage {
    Matching,
    Splitting,
    Archiving,
    CleaningUp,
    Done,
}

impl fmt::Display for DocumentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStage::Matching => "matching",
            DocumentStage::Splitting => "splitting",
            DocumentStage::Archiving => "archiving",
            DocumentStage::CleaningUp => "cleaning up",
            DocumentStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// One written sub-file, with the page range that was actually copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRecord {
    pub document: String,
    pub file_name: String,
    pub start: u32,
    pub end: u32,
    pub pages_written: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub document: String,
    pub stage: DocumentStage,
    pub message: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub documents_failed: usize,
    pub splits: Vec<SplitRecord>,
    pub archives: Vec<String>,
    pub warnings: Vec<Warning>,
    pub failures: Vec<DocumentFailure>,
}

impl RunReport {
    pub fn print(&self) {
        for split in &self.splits {
            println!(
                "Created: {} / {} (pages {}-{}, {} page(s))",
                split.document, split.file_name, split.start, split.end, split.pages_written
            );
        }
        for archive in &self.archives {
            println!("Created ZIP file: {}", archive);
        }
        for warning in &self.warnings {
            println!("Warning: {}", warning);
        }
        for failure in &self.failures {
            println!(
                "Failed: {} while {}: {}",
                failure.document, failure.stage, failure.message
            );
        }
        println!(
            "\n{} document(s) processed, {} skipped, {} failed.",
            self.documents_processed, self.documents_skipped, self.documents_failed
        );
    }
}
