//! Loader tests against real XLSX packages built in memory.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;

use bubbleview::loader::load;
use bubbleview::LoadError;
use fixtures::{bubble_row, bubble_workbook, Cell, XlsxBuilder, HEADER};

#[test]
fn test_valid_workbook_loads_every_row() {
    let dataset = load(&bubble_workbook(12)).unwrap();
    assert_eq!(dataset.len(), 12);
    let r = &dataset.records()[3];
    assert_eq!(r.x, 30.0);
    assert_eq!(r.y, 3.0);
    assert_eq!(r.r, 4.0);
    assert_eq!(r.name, "b3");
    assert_eq!(r.note, None);
}

#[test]
fn test_inline_strings_and_notes() {
    let xlsx = XlsxBuilder::new()
        .inline_strings()
        .add_row(HEADER)
        .add_row(bubble_row(0, Some("first & <best>")))
        .add_row(bubble_row(1, None))
        .build();
    let dataset = load(&xlsx).unwrap();
    assert_eq!(dataset.records()[0].note.as_deref(), Some("first & <best>"));
    assert_eq!(dataset.records()[1].note, None);
    assert!(dataset.has_notes());
}

#[test]
fn test_only_first_sheet_is_read() {
    let xlsx = XlsxBuilder::new()
        .add_sheet("First")
        .add_row(HEADER)
        .add_row(bubble_row(0, None))
        .add_sheet("Second")
        .add_row(["Other"])
        .add_row(["value"])
        .build();
    let dataset = load(&xlsx).unwrap();
    assert_eq!(dataset.len(), 1);
}

#[test]
fn test_missing_columns_reject_file() {
    let xlsx = XlsxBuilder::new()
        .add_row(["X", "Y", "Label"])
        .add_row([Cell::from(1.0), 2.0.into(), "a".into()])
        .build();
    let err = load(&xlsx).unwrap_err();
    assert_eq!(
        err,
        LoadError::SchemaMissing {
            missing: vec!["R", "Name"]
        }
    );
}

#[test]
fn test_column_names_are_case_sensitive() {
    let xlsx = XlsxBuilder::new()
        .add_row(["x", "Y", "R", "Name"])
        .add_row([Cell::from(1.0), 2.0.into(), 3.0.into(), "a".into()])
        .build();
    assert!(matches!(
        load(&xlsx).unwrap_err(),
        LoadError::SchemaMissing { ref missing } if missing == &vec!["X"]
    ));
}

#[test]
fn test_header_without_rows_is_schema_missing() {
    let xlsx = XlsxBuilder::new().add_row(HEADER).build();
    assert!(matches!(
        load(&xlsx).unwrap_err(),
        LoadError::SchemaMissing { .. }
    ));
}

#[test]
fn test_one_bad_row_rejects_everything() {
    let mut bad = bubble_row(5, None);
    bad[2] = Cell::from("big");
    let xlsx = XlsxBuilder::new()
        .add_row(HEADER)
        .add_row(bubble_row(0, None))
        .add_row(bad)
        .add_row(bubble_row(6, None))
        .build();
    assert_eq!(
        load(&xlsx).unwrap_err(),
        LoadError::NonNumericColumn {
            row: 2,
            column: "R",
            value: "big".to_string()
        }
    );
}

#[test]
fn test_numeric_text_and_booleans_count_as_numbers() {
    let xlsx = XlsxBuilder::new()
        .add_row(HEADER)
        .add_row([Cell::from("12.5"), true.into(), 3.0.into(), "n".into()])
        .build();
    let dataset = load(&xlsx).unwrap();
    assert_eq!(dataset.records()[0].x, 12.5);
    assert_eq!(dataset.records()[0].y, 1.0);
}

#[test]
fn test_csv_payload() {
    let csv = b"X,Y,R,Name,Note\n100,5,10,\"Smith, J\",\n250,2,4,b,\"a note\"\n";
    let dataset = load(csv).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records()[0].name, "Smith, J");
    assert_eq!(dataset.records()[1].note.as_deref(), Some("a note"));
}

#[test]
fn test_csv_note_spanning_lines() {
    let csv = b"X,Y,R,Name,Note\n100,5,10,a,\"line one\nline two\"\n200,4,3,b,\n";
    let dataset = load(csv).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.records()[0].note.as_deref(),
        Some("line one\nline two")
    );
    assert_eq!(dataset.records()[1].x, 200.0);
    assert_eq!(dataset.records()[1].note, None);
}

#[test]
fn test_tsv_payload() {
    let tsv = b"X\tY\tR\tName\n1\t2\t3\tt\n";
    let dataset = load(tsv).unwrap();
    assert_eq!(dataset.records()[0].r, 3.0);
}

#[test]
fn test_corrupt_archive_is_parse_failure() {
    let mut xlsx = bubble_workbook(3);
    xlsx.truncate(40);
    let err = load(&xlsx).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
    assert!(err.user_message().starts_with("Error reading file: "));
}
