//! Test fixtures for generating XLSX workbooks in memory.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{Cell, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .add_sheet("Data")
//!     .add_row(["X", "Y", "R", "Name"])
//!     .add_row([Cell::from(1.0), 2.0.into(), 3.0.into(), "a".into()])
//!     .build();
//!
//! let dataset = bubbleview::loader::load(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Header used by the bubble-sheet helpers.
pub const HEADER: [&str; 5] = ["X", "Y", "R", "Name", "Note"];

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

#[derive(Debug, Clone, Default)]
struct SheetData {
    name: String,
    rows: Vec<Vec<Cell>>,
}

/// Builder for minimal but valid XLSX packages.
#[derive(Debug, Clone, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetData>,
    inline_strings: bool,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new sheet; later rows go into it.
    #[must_use]
    pub fn add_sheet(mut self, name: &str) -> Self {
        self.sheets.push(SheetData {
            name: name.to_string(),
            rows: Vec::new(),
        });
        self
    }

    /// Append a row to the current sheet (creating `Sheet1` if needed).
    #[must_use]
    pub fn add_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        if self.sheets.is_empty() {
            self = self.add_sheet("Sheet1");
        }
        let row = cells.into_iter().map(Into::into).collect();
        if let Some(sheet) = self.sheets.last_mut() {
            sheet.rows.push(row);
        }
        self
    }

    /// Write text cells as `t="inlineStr"` instead of shared strings.
    #[must_use]
    pub fn inline_strings(mut self) -> Self {
        self.inline_strings = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let sheet_xml: Vec<String> = self
            .sheets
            .iter()
            .map(|sheet| generate_sheet(sheet, self.inline_strings, &mut shared))
            .collect();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(generate_content_types(self.sheets.len()).as_bytes());

        let _ = zip.start_file("_rels/.rels", options);
        let _ = zip.write_all(generate_rels().as_bytes());

        let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
        let _ = zip.write_all(generate_workbook_rels(self.sheets.len()).as_bytes());

        let _ = zip.start_file("xl/workbook.xml", options);
        let _ = zip.write_all(generate_workbook(&self.sheets).as_bytes());

        if !shared.is_empty() {
            let _ = zip.start_file("xl/sharedStrings.xml", options);
            let _ = zip.write_all(generate_shared_strings(&shared).as_bytes());
        }

        for (i, xml) in sheet_xml.iter().enumerate() {
            let _ = zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options);
            let _ = zip.write_all(xml.as_bytes());
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

/// A workbook whose first sheet holds `rows` bubble records under [`HEADER`].
///
/// Record `i` has `X = 10 * i`, `Y = i % 11`, `R = i + 1`, `Name = "b{i}"`
/// and no note.
pub fn bubble_workbook(rows: usize) -> Vec<u8> {
    let mut builder = XlsxBuilder::new().add_sheet("Bubbles").add_row(HEADER);
    for i in 0..rows {
        builder = builder.add_row(bubble_row(i, None));
    }
    builder.build()
}

pub fn bubble_row(i: usize, note: Option<&str>) -> Vec<Cell> {
    vec![
        Cell::Number((i * 10) as f64),
        Cell::Number((i % 11) as f64),
        Cell::Number((i + 1) as f64),
        Cell::Text(format!("b{i}")),
        note.map_or(Cell::Empty, Cell::from),
    ]
}

/// Convert a 0-based column index to letters (A, B, ..., Z, AA, ...).
pub fn col_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    result
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_sheet(sheet: &SheetData, inline: bool, shared: &mut Vec<String>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in sheet.rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", col_letter(c), r + 1);
            match cell {
                Cell::Number(v) => xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{v}</v></c>"#)),
                Cell::Bool(b) => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="b"><v>{}</v></c>"#,
                    u8::from(*b)
                )),
                Cell::Text(s) if inline => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(s)
                )),
                Cell::Text(s) => {
                    let idx = shared.iter().position(|x| x == s).unwrap_or_else(|| {
                        shared.push(s.clone());
                        shared.len() - 1
                    });
                    xml.push_str(&format!(r#"<c r="{cell_ref}" t="s"><v>{idx}</v></c>"#));
                }
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 1
    ));
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetData]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!("<si><t>{}</t></si>", escape(s)));
    }
    xml.push_str("</sst>");
    xml
}
