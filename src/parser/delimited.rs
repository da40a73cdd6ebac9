//! CSV/TSV reader producing the same cell grid as the XLSX path.

use std::io::Cursor;

use crate::error::LoadError;
use crate::types::{CellValue, SheetRows};

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }
}

/// Parse delimited text into a sparse cell grid. Blank rows are skipped.
///
/// Quoted fields may span lines and escape quotes by doubling them.
pub(super) fn parse_delimited(text: &str, delim: Delimiter) -> Result<SheetRows, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| LoadError::Parse(format!("delimited text, record {}: {e}", line + 1)))?;
        let row: Vec<Option<CellValue>> = record.iter().map(field_value).collect();
        if row.iter().any(Option::is_some) {
            rows.push(row);
        }
    }

    Ok(SheetRows { rows })
}

/// Numbers become numeric cells; blank fields are empty cells.
fn field_value(field: &str) -> Option<CellValue> {
    let value = field.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(value.to_string())),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let rows = parse_delimited("X,Y,Name\n1,2.5,Alice\n\n3,4,Bob", Delimiter::Comma).unwrap();
        assert_eq!(rows.rows.len(), 3);
        assert_eq!(rows.rows[1][1], Some(CellValue::Number(2.5)));
        assert_eq!(rows.rows[2][2], Some(CellValue::Text("Bob".into())));
    }

    #[test]
    fn test_parse_tsv_with_blank_field() {
        let rows = parse_delimited("A\tB\tC\n1\t\t3", Delimiter::Tab).unwrap();
        assert_eq!(
            rows.rows[1],
            vec![Some(CellValue::Number(1.0)), None, Some(CellValue::Number(3.0))]
        );
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_delimited(
            "\"Hello, World\",42\n\"She said \"\"hi\"\"\",0",
            Delimiter::Comma,
        )
        .unwrap();
        assert_eq!(rows.rows[0][0], Some(CellValue::Text("Hello, World".into())));
        assert_eq!(rows.rows[1][0], Some(CellValue::Text("She said \"hi\"".into())));
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let rows = parse_delimited("A,B\n1,\"line one\nline two\"\n2,", Delimiter::Comma).unwrap();
        assert_eq!(rows.rows.len(), 3);
        assert_eq!(
            rows.rows[1][1],
            Some(CellValue::Text("line one\nline two".into()))
        );
        assert_eq!(rows.rows[2][0], Some(CellValue::Number(2.0)));
    }

    #[test]
    fn test_whitespace_only_row_is_skipped() {
        let rows = parse_delimited("A,B\n  ,  \n1,2", Delimiter::Comma).unwrap();
        assert_eq!(rows.rows.len(), 2);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let rows = parse_delimited("\u{feff}X,Y\n1,2", Delimiter::Comma).unwrap();
        assert_eq!(rows.rows[0][0], Some(CellValue::Text("X".into())));
    }
}
