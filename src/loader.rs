//! Tabular loader: workbook payload -> validated [`Dataset`].
//!
//! Validation is all-or-nothing. A missing column or a single non-numeric
//! X/Y/R value rejects the whole payload.

use crate::error::{LoadError, REQUIRED_COLUMNS};
use crate::parser;
use crate::types::{CellValue, Dataset, Record, RowRecord};

/// Optional annotation column.
pub const NOTE_COLUMN: &str = "Note";

/// Decode `payload` and validate it into a dataset.
///
/// # Errors
/// - [`LoadError::Parse`] if the payload is not a readable workbook
/// - [`LoadError::SchemaMissing`] if the first data row lacks X, Y, R or Name
///   (an empty sheet counts as missing all of them)
/// - [`LoadError::NonNumericColumn`] if any row has a non-numeric X, Y or R
pub fn load(payload: &[u8]) -> Result<Dataset, LoadError> {
    let sheet = parser::read_first_sheet(payload)?;
    let rows = sheet.to_records();
    let dataset = validate_rows(&rows)?;
    tracing::info!(
        records = dataset.len(),
        notes = dataset.has_notes(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Validate header-keyed rows into records.
///
/// # Errors
/// See [`load`].
pub fn validate_rows(rows: &[RowRecord]) -> Result<Dataset, LoadError> {
    check_schema(rows.first())?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| to_record(idx + 1, row))
        .collect::<Result<Vec<_>, _>>()
        .map(Dataset::new)
}

fn check_schema(first: Option<&RowRecord>) -> Result<(), LoadError> {
    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| first.map_or(true, |row| !row.contains_key(*col)))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!(?missing, "required columns absent");
        Err(LoadError::SchemaMissing { missing })
    }
}

fn numeric(row_no: usize, row: &RowRecord, column: &'static str) -> Result<f64, LoadError> {
    let value = row.get(column);
    value
        .and_then(CellValue::as_number)
        .ok_or_else(|| LoadError::NonNumericColumn {
            row: row_no,
            column,
            value: value.map(CellValue::to_text).unwrap_or_default(),
        })
}

fn to_record(row_no: usize, row: &RowRecord) -> Result<Record, LoadError> {
    let x = numeric(row_no, row, "X")?;
    let y = numeric(row_no, row, "Y")?;
    let r = numeric(row_no, row, "R")?;
    let name = row.get("Name").map(CellValue::to_text).unwrap_or_default();
    let note = row
        .get(NOTE_COLUMN)
        .map(CellValue::to_text)
        .filter(|text| !text.trim().is_empty());

    Ok(Record {
        x,
        y,
        r,
        name,
        note,
    })
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

    fn row(pairs: &[(&str, CellValue)]) -> RowRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn t(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    fn valid_row(x: f64) -> RowRecord {
        row(&[("X", n(x)), ("Y", n(2.0)), ("R", n(3.0)), ("Name", t("a"))])
    }

    #[test]
    fn test_valid_rows() {
        let data = validate_rows(&[valid_row(1.0), valid_row(2.0)]).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.records()[1].x, 2.0);
        assert_eq!(data.records()[0].note, None);
    }

    #[test]
    fn test_empty_is_schema_missing() {
        let err = validate_rows(&[]).unwrap_err();
        assert_eq!(
            err,
            LoadError::SchemaMissing {
                missing: vec!["X", "Y", "R", "Name"]
            }
        );
    }

    #[test]
    fn test_schema_is_checked_on_first_row_only() {
        let second = row(&[("X", n(1.0)), ("Y", n(2.0)), ("R", n(3.0))]);
        let data = validate_rows(&[valid_row(1.0), second]).unwrap();
        assert_eq!(data.records()[1].name, "");
    }

    #[test]
    fn test_non_numeric_rejects_whole_file() {
        let bad = row(&[("X", n(1.0)), ("Y", t("high")), ("R", n(3.0)), ("Name", t("b"))]);
        let err = validate_rows(&[valid_row(1.0), bad, valid_row(3.0)]).unwrap_err();
        assert_eq!(
            err,
            LoadError::NonNumericColumn {
                row: 2,
                column: "Y",
                value: "high".into()
            }
        );
    }

    #[test]
    fn test_missing_value_on_later_row_is_non_numeric() {
        let bad = row(&[("X", n(1.0)), ("Y", n(1.0)), ("Name", t("b"))]);
        let err = validate_rows(&[valid_row(1.0), bad]).unwrap_err();
        assert!(matches!(err, LoadError::NonNumericColumn { column: "R", .. }));
    }

    #[test]
    fn test_numeric_text_and_numeric_name() {
        let r = row(&[("X", t("250")), ("Y", n(2.0)), ("R", n(3.0)), ("Name", n(7.0))]);
        let data = validate_rows(&[r]).unwrap();
        assert_eq!(data.records()[0].x, 250.0);
        assert_eq!(data.records()[0].name, "7");
    }

    #[test]
    fn test_note_is_optional_and_blank_is_absent() {
        let mut with_note = valid_row(1.0);
        with_note.insert(NOTE_COLUMN.into(), t("look here"));
        let mut blank_note = valid_row(2.0);
        blank_note.insert(NOTE_COLUMN.into(), t("   "));
        let data = validate_rows(&[with_note, blank_note]).unwrap();
        assert_eq!(data.records()[0].note.as_deref(), Some("look here"));
        assert_eq!(data.records()[1].note, None);
    }
}
