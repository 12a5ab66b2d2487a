use crate::page_range::PageRange;
use anyhow::{Context, Result};
use lopdf::{Document, ObjectId};
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Copy the pages of `range` (end clamped to the page count) into a new
    /// document, in their original order. A range starting past the clamped
    /// end yields a document with no pages.
    pub fn extract_range(&self, range: PageRange) -> Result<Document> {
        let total = self.page_count();
        if range.start == 0 {
            anyhow::bail!("Page numbers must be >= 1 (in {})", self.path);
        }
        let keep = range.pages_within(total);

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| !keep.contains(num))
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Save to a file, replacing anything already there
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Write `range` of `source` to `output`. Returns how many pages were written.
pub fn split_range<P: AsRef<Path>>(source: &PdfDocument, range: PageRange, output: P) -> Result<u32> {
    let mut new_doc = source.extract_range(range)?;
    PdfDocument::save(&mut new_doc, &output)?;
    Ok(range.page_count_within(source.page_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{create_test_pdf, page_labels};

    #[test]
    fn test_extract_range_keeps_order_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.pdf");
        create_test_pdf(&source, 10);

        let doc = PdfDocument::open(&source).unwrap();
        assert_eq!(doc.page_count(), 10);

        let out = dir.path().join("part.pdf");
        let written = split_range(&doc, PageRange::new(3, 6), &out).unwrap();
        assert_eq!(written, 4);

        let part = PdfDocument::open(&out).unwrap();
        assert_eq!(part.page_count(), 4);
        assert_eq!(page_labels(&part), vec!["Page 3", "Page 4", "Page 5", "Page 6"]);
    }

    #[test]
    fn test_end_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.pdf");
        create_test_pdf(&source, 5);
        let doc = PdfDocument::open(&source).unwrap();

        let out = dir.path().join("tail.pdf");
        assert_eq!(split_range(&doc, PageRange::new(4, 99), &out).unwrap(), 2);
        let part = PdfDocument::open(&out).unwrap();
        assert_eq!(page_labels(&part), vec!["Page 4", "Page 5"]);
    }

    #[test]
    fn test_start_past_end_gives_empty_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.pdf");
        create_test_pdf(&source, 5);
        let doc = PdfDocument::open(&source).unwrap();

        let out = dir.path().join("empty.pdf");
        assert_eq!(split_range(&doc, PageRange::new(7, 9), &out).unwrap(), 0);
        assert!(out.exists());
        assert_eq!(PdfDocument::open(&out).unwrap().page_count(), 0);
    }

    #[test]
    fn test_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.pdf");
        create_test_pdf(&source, 3);
        let doc = PdfDocument::open(&source).unwrap();

        let out = dir.path().join("all.pdf");
        assert_eq!(split_range(&doc, PageRange::new(1, 3), &out).unwrap(), 3);
        assert_eq!(PdfDocument::open(&out).unwrap().page_count(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PdfDocument::open(dir.path().join("missing.pdf")).is_err());
    }
}
