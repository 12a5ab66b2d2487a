use super::{CellValue, Sheet};
use crate::report::Warning;
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read every sheet of an `.xls`/`.xlsx`/`.ods` workbook, in workbook order.
///
/// A sheet that fails to load is reported and skipped; failing to open the
/// workbook at all is an error.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<(Vec<Sheet>, Vec<Warning>)> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let names = workbook.sheet_names().to_owned();
    tracing::debug!(?names, "opened workbook {}", path.display());

    let mut sheets = Vec::with_capacity(names.len());
    let mut warnings = Vec::new();
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => sheets.push(Sheet {
                rows: range
                    .rows()
                    .map(|row| row.iter().map(cell_from_data).collect())
                    .collect(),
                // The range starts at the first non-empty cell, not at A1.
                first_row: range.start().map_or(1, |(row, _)| row as usize + 1),
                name,
            }),
            Err(e) => {
                tracing::warn!(sheet = %name, "failed to read sheet: {}", e);
                warnings.push(Warning::SheetUnreadable {
                    sheet: name,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok((sheets, warnings))
}

/// Dates keep their serial number, so a date typed into a page column
/// still reads as a number.
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::inventory::load_inventory;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const SHARED_STRINGS: [&str; 16] = [
        "档号", "文件编号", "页号", "文件题名", "YY1-1-1-1", "F1", "通知", "F2", "p.6", "报告",
        "F3", "６", "批复", "F4", "附件", "备注",
    ];

    fn string_cell(cell: &str, index: usize) -> String {
        format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, cell, index)
    }

    fn worksheet(rows: &[(u32, Vec<String>)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(r, cells)| format!(r#"<row r="{}">{}</row>"#, r, cells.concat()))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            rows
        )
    }

    /// Two-sheet `.xlsx`. "目录" has two blank rows above its header, an
    /// unreadable page on row 5, a full-width page on row 6 and a
    /// date-formatted page on row 7. "说明" has no sub-file columns.
    fn write_inventory_xlsx(path: &Path) {
        let catalogue = worksheet(&[
            (
                3,
                vec![
                    string_cell("A3", 0),
                    string_cell("B3", 1),
                    string_cell("C3", 2),
                    string_cell("D3", 3),
                ],
            ),
            (
                4,
                vec![
                    string_cell("A4", 4),
                    string_cell("B4", 5),
                    r#"<c r="C4"><v>1</v></c>"#.to_string(),
                    string_cell("D4", 6),
                ],
            ),
            (5, vec![string_cell("B5", 7), string_cell("C5", 8), string_cell("D5", 9)]),
            (6, vec![string_cell("B6", 10), string_cell("C6", 11), string_cell("D6", 12)]),
            (
                7,
                vec![
                    string_cell("B7", 13),
                    r#"<c r="C7" s="1"><v>9</v></c>"#.to_string(),
                    string_cell("D7", 14),
                ],
            ),
        ]);
        let notes = worksheet(&[(1, vec![string_cell("A1", 0), string_cell("B1", 15)])]);

        let shared: String = SHARED_STRINGS
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", s))
            .collect();
        let shared = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">{}</sst>"#,
            shared,
            n = SHARED_STRINGS.len()
        );

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="目录" sheetId="1" r:id="rId1"/><sheet name="说明" sheetId="2" r:id="rId2"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/styles.xml",
                // Style 1 is the built-in short date format.
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#.to_string(),
            ),
            ("xl/sharedStrings.xml", shared),
            ("xl/worksheets/sheet1.xml", catalogue),
            ("xl/worksheets/sheet2.xml", notes),
        ];

        let mut zip = ZipWriter::new(std::fs::File::create(path).unwrap());
        for (name, body) in parts {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::Int(4)), CellValue::Int(4));
        assert_eq!(cell_from_data(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(
            cell_from_data(&Data::String("3-7".to_string())),
            CellValue::Text("3-7".to_string())
        );
        assert_eq!(cell_from_data(&Data::Bool(false)), CellValue::Bool(false));
    }

    #[test]
    fn test_missing_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_workbook(dir.path().join("absent.xlsx")).is_err());
    }

    #[test]
    fn test_reads_inventory_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.xlsx");
        write_inventory_xlsx(&path);

        let (sheets, warnings) = read_workbook(&path).unwrap();
        assert!(warnings.is_empty());
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["目录", "说明"]);
        assert_eq!(sheets[0].first_row, 3);
        assert_eq!(sheets[0].headers(), vec!["档号", "文件编号", "页号", "文件题名"]);
        assert_eq!(sheets[1].first_row, 1);

        let (inventory, warnings) = load_inventory(&path, &Config::default()).unwrap();
        assert_eq!(inventory.len(), 1);
        let starts: Vec<(&str, u32)> = inventory
            .get("YY1-1-1-1")
            .unwrap()
            .iter()
            .map(|r| (r.sub_file_id.as_str(), r.start_page))
            .collect();
        assert_eq!(starts, vec![("F1", 1), ("F3", 6), ("F4", 9)]);
        assert_eq!(
            warnings,
            vec![
                Warning::UnparseablePage {
                    sheet: "目录".to_string(),
                    row: 5,
                    value: "p.6".to_string(),
                },
                Warning::MissingColumns {
                    sheet: "说明".to_string(),
                    missing: vec!["sub-file", "page", "title"],
                },
            ]
        );
    }
}
