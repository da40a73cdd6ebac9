//! Raw cell values read from a worksheet, before any schema is applied.

use std::collections::HashMap;

/// A single non-empty cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Error literal such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// Numeric view of the value, if it has one.
    ///
    /// Text counts as numeric when its trimmed content parses as a finite
    /// number. Booleans count as 1 and 0.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            Self::Error(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Display text of the value.
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) | Self::Error(s) => s.clone(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }
}

/// Shortest text for a number: integral values drop the fraction.
pub(crate) fn format_number(n: f64) -> String {
    format!("{n}")
}

/// A data row keyed by header text. Empty cells have no key.
pub type RowRecord = HashMap<String, CellValue>;

/// Sparse cell grid of one worksheet, in sheet order.
///
/// `rows[i][c]` is the cell in the i-th non-empty `<row>` at column `c`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRows {
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl SheetRows {
    /// Convert the grid to header-keyed records.
    ///
    /// The first row holding any value is the header. Every later row with at
    /// least one value becomes a record. Blank header cells are named
    /// `__EMPTY`, and repeated header names get a `_1`, `_2`, ... suffix.
    pub fn to_records(&self) -> Vec<RowRecord> {
        let mut rows = self
            .rows
            .iter()
            .filter(|row| row.iter().any(Option::is_some));
        let Some(header_row) = rows.next() else {
            return Vec::new();
        };
        let header = header_names(header_row);

        rows.map(|row| {
            row.iter()
                .enumerate()
                .filter_map(|(col, cell)| {
                    let value = cell.as_ref()?;
                    let key = header.get(col)?.clone();
                    Some((key, value.clone()))
                })
                .collect::<RowRecord>()
        })
        .filter(|record| !record.is_empty())
        .collect()
    }
}

fn header_names(header_row: &[Option<CellValue>]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header_row
        .iter()
        .map(|cell| {
            let base = match cell {
                Some(value) => value.to_text(),
                None => "__EMPTY".to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}_{count}")
            };
            *count += 1;
            name
        })
        .collect()
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

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    fn num(n: f64) -> Option<CellValue> {
        Some(CellValue::Number(n))
    }

    #[test]
    fn test_numeric_text_coerces() {
        assert_eq!(CellValue::Text(" 12.5 ".into()).as_number(), Some(12.5));
        assert_eq!(CellValue::Text("abc".into()).as_number(), None);
        assert_eq!(CellValue::Text("".into()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".into()).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Error("#N/A".into()).as_number(), None);
    }

    #[test]
    fn test_number_text_is_shortest() {
        assert_eq!(CellValue::Number(12.0).to_text(), "12");
        assert_eq!(CellValue::Number(0.25).to_text(), "0.25");
    }

    #[test]
    fn test_records_keyed_by_header() {
        let sheet = SheetRows {
            rows: vec![
                vec![text("X"), text("Name")],
                vec![num(1.0), text("a")],
                vec![None, None],
                vec![num(2.0)],
            ],
        };
        let records = sheet.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("X"), Some(&CellValue::Number(1.0)));
        assert_eq!(records[0].get("Name"), Some(&CellValue::Text("a".into())));
        assert!(!records[1].contains_key("Name"));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let sheet = SheetRows {
            rows: vec![
                vec![text("X"), None, text("X")],
                vec![num(1.0), num(2.0), num(3.0)],
            ],
        };
        let records = sheet.to_records();
        assert_eq!(records[0].get("X"), Some(&CellValue::Number(1.0)));
        assert_eq!(records[0].get("__EMPTY"), Some(&CellValue::Number(2.0)));
        assert_eq!(records[0].get("X_1"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_empty_sheet_has_no_records() {
        assert!(SheetRows::default().to_records().is_empty());
    }
}
