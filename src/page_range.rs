use crate::inventory::SubFileRecord;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Inclusive, 1-based page interval. `end` may lie past the document's last
/// page; it is clamped when pages are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        PageRange { start, end }
    }

    /// Parse "5", "1-5" or "3-end" against a document of `total_pages`.
    pub fn parse(s: &str, total_pages: u32) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("Empty page range"));
        }

        if let Some(dash_pos) = s.find('-') {
            if dash_pos == 0 {
                return Err(anyhow!("Invalid page range: {}", s));
            }
            let start = parse_page_ref(&s[..dash_pos], total_pages)?;
            let end = parse_page_ref(&s[dash_pos + 1..], total_pages)?;
            if start > end {
                return Err(anyhow!("Start page {} is after end page {}", start, end));
            }
            Ok(PageRange { start, end })
        } else {
            let page = parse_page_ref(s, total_pages)?;
            Ok(PageRange {
                start: page,
                end: page,
            })
        }
    }

    /// Pages actually present in a document of `total_pages`. Empty when
    /// `start` is past the clamped end.
    pub fn pages_within(&self, total_pages: u32) -> RangeInclusive<u32> {
        self.start..=self.end.min(total_pages)
    }

    pub fn page_count_within(&self, total_pages: u32) -> u32 {
        let end = self.end.min(total_pages);
        if self.start > end {
            0
        } else {
            end - self.start + 1
        }
    }
}

fn parse_page_ref(s: &str, total_pages: u32) -> Result<u32> {
    let s = s.trim();
    let page = if s.eq_ignore_ascii_case("end") {
        total_pages
    } else {
        s.parse::<u32>()
            .map_err(|_| anyhow!("Invalid page number: {}", s))?
    };
    if page == 0 {
        return Err(anyhow!("Page numbers must be >= 1"));
    }
    Ok(page)
}

/// A sub-file paired with the pages it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSplit<'a> {
    pub record: &'a SubFileRecord,
    pub range: PageRange,
}

/// Assign page ranges to a document's sub-files, which must already be
/// ordered by start page. Each range ends just before the next sub-file
/// starts; the last one runs to `total_pages`.
pub fn resolve_ranges(records: &[SubFileRecord], total_pages: u32) -> Vec<PlannedSplit<'_>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let end = match records.get(i + 1) {
                Some(next) => next.start_page.saturating_sub(1),
                None => total_pages,
            };
            PlannedSplit {
                record,
                range: PageRange::new(record.start_page, end),
            }
        })
        .collect()
}
