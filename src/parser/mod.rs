//! Workbook reader.
//!
//! Pulls the cell grid of the first worksheet out of an XLSX package, or out
//! of CSV/TSV text when the payload is not a ZIP archive.

mod delimited;
mod relationships;
mod worksheet;

use std::io::Cursor;
use zip::ZipArchive;

use crate::error::LoadError;
use crate::types::SheetRows;

use delimited::{parse_delimited, Delimiter};
use relationships::{first_sheet_info, parse_shared_strings, parse_workbook_relationships};
use worksheet::parse_sheet_rows;

/// Local file header signature of a ZIP archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Which decoder a payload is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Xlsx,
    Csv,
    Tsv,
}

/// A sniffed payload; delimited text is decoded once here.
enum Payload<'a> {
    Xlsx,
    Delimited(&'a str, Delimiter),
}

fn sniff(data: &[u8]) -> Option<Payload<'_>> {
    if data.starts_with(ZIP_MAGIC) {
        return Some(Payload::Xlsx);
    }
    let text = std::str::from_utf8(data).ok()?;
    let first_line = text.lines().next().unwrap_or("");
    let delim = if first_line.contains('\t') {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    };
    Some(Payload::Delimited(text, delim))
}

/// Sniff the payload format from its leading bytes.
///
/// Returns `None` for binary data that is neither a ZIP archive nor UTF-8 text.
pub fn detect_kind(data: &[u8]) -> Option<PayloadKind> {
    sniff(data).map(|payload| match payload {
        Payload::Xlsx => PayloadKind::Xlsx,
        Payload::Delimited(_, Delimiter::Comma) => PayloadKind::Csv,
        Payload::Delimited(_, Delimiter::Tab) => PayloadKind::Tsv,
    })
}

/// Read the cell grid of the first sheet of a workbook payload.
///
/// # Errors
/// Returns [`LoadError::Parse`] when the payload is not a decodable workbook.
pub fn read_first_sheet(data: &[u8]) -> Result<SheetRows, LoadError> {
    match sniff(data) {
        Some(Payload::Xlsx) => read_xlsx_first_sheet(data),
        Some(Payload::Delimited(text, delim)) => parse_delimited(text, delim),
        None => Err(LoadError::Parse(
            "payload is neither an XLSX archive nor delimited text".to_string(),
        )),
    }
}

fn read_xlsx_first_sheet(data: &[u8]) -> Result<SheetRows, LoadError> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let relationships = parse_workbook_relationships(&mut archive)?;
    let Some(sheet) = first_sheet_info(&mut archive, &relationships.worksheets)? else {
        return Err(LoadError::Parse("workbook contains no sheets".to_string()));
    };
    tracing::debug!(sheet = %sheet.name, path = %sheet.path, "reading first worksheet");

    let shared_strings =
        parse_shared_strings(&mut archive, relationships.shared_strings.as_deref())?;
    parse_sheet_rows(&mut archive, &sheet.path, &shared_strings)
}
