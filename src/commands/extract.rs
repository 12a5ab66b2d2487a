use crate::page_range::PageRange;
use crate::pdf::{split_range, PdfDocument};
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let range = PageRange::parse(pages, total_pages)?;
    let written = split_range(&doc, range, &output)?;
    if written == 0 {
        tracing::warn!(
            "pages {}-{} select nothing from a {}-page document",
            range.start,
            range.end,
            total_pages
        );
    }

    println!(
        "Extracted {} page(s) to {}",
        written,
        output.as_ref().display()
    );

    Ok(())
}
