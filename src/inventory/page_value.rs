use super::CellValue;

/// Why a page cell did not yield a starting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageValueError {
    Unparseable,
    NonPositive,
}

/// Starting page from a page-indicator cell.
///
/// Accepts integers, floats (truncated toward zero), digit strings and
/// `start-end` range strings, of which only the start is kept. Blank cells
/// give `Ok(None)`; anything else that cannot be read is an error the caller
/// reports as a warning. Never panics.
pub fn parse_start_page(cell: &CellValue) -> Result<Option<u32>, PageValueError> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Int(n) => to_page(*n).map(Some),
        CellValue::Float(f) if f.is_nan() => Ok(None),
        CellValue::Float(f) => {
            if !f.is_finite() {
                return Err(PageValueError::Unparseable);
            }
            let truncated = f.trunc();
            if truncated < 1.0 {
                return Err(PageValueError::NonPositive);
            }
            if truncated > u32::MAX as f64 {
                return Err(PageValueError::Unparseable);
            }
            Ok(Some(truncated as u32))
        }
        CellValue::Text(s) => parse_text(fold_full_width(s).trim()),
        CellValue::Bool(_) => Err(PageValueError::Unparseable),
    }
}

/// Full-width digits and hyphens, as typed with CJK input methods, become
/// their ASCII forms.
fn fold_full_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => char::from(b'0' + (c as u32 - 0xFF10) as u8),
            '\u{FF0D}' => '-',
            c => c,
        })
        .collect()
}

fn parse_text(s: &str) -> Result<Option<u32>, PageValueError> {
    if s.is_empty() {
        return Ok(None);
    }

    if s.contains('-') {
        let parts: Vec<&str> = s.split('-').collect();
        let [start, end] = parts.as_slice() else {
            return Err(PageValueError::Unparseable);
        };
        let start = parse_integer(start)?;
        parse_integer(end)?;
        return to_page(start).map(Some);
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return parse_integer(s).and_then(to_page).map(Some);
    }

    Err(PageValueError::Unparseable)
}

fn parse_integer(s: &str) -> Result<i64, PageValueError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| PageValueError::Unparseable)
}

fn to_page(n: i64) -> Result<u32, PageValueError> {
    if n < 1 {
        return Err(PageValueError::NonPositive);
    }
    u32::try_from(n).map_err(|_| PageValueError::Unparseable)
}
