//! Worksheet reader - streams `<row>`/`<c>` elements into a sparse cell grid.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::error::LoadError;
use crate::types::{CellValue, SheetRows};

/// Last column of a worksheet (XFD).
const MAX_COL: usize = 16_383;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Number,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"inlineStr" => CellTypeTag::Inline,
        b"str" => CellTypeTag::Str,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Number,
    }
}

/// 0-based column index of a cell reference such as `B7` or `$AA$3`.
fn column_index(cell_ref: &[u8]) -> Option<usize> {
    let mut col: usize = 0;
    let mut saw_col = false;
    for &b in cell_ref {
        match b {
            b'$' => {}
            b'A'..=b'Z' | b'a'..=b'z' => {
                let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
                col = col.saturating_mul(26).saturating_add(digit);
                saw_col = true;
            }
            _ => break,
        }
    }
    saw_col.then(|| col - 1)
}

/// A `<c>` element whose value text is still being collected.
struct PendingCell {
    col: usize,
    tag: CellTypeTag,
    text: String,
}

impl PendingCell {
    fn from_start(e: &BytesStart, fallback_col: usize) -> Self {
        let mut col = fallback_col;
        let mut tag = CellTypeTag::Number;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => col = column_index(&attr.value).unwrap_or(fallback_col),
                b"t" => tag = parse_cell_type_tag(&attr.value),
                _ => {}
            }
        }
        Self {
            col: col.min(MAX_COL),
            tag,
            text: String::new(),
        }
    }

    fn resolve(self, shared_strings: &[String]) -> Option<CellValue> {
        let Self { tag, text, .. } = self;
        match tag {
            CellTypeTag::Shared => {
                let idx: usize = text.trim().parse().ok()?;
                shared_strings.get(idx).cloned().map(CellValue::Text)
            }
            CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Date => {
                Some(CellValue::Text(text))
            }
            CellTypeTag::Bool => Some(CellValue::Bool(matches!(text.trim(), "1" | "true"))),
            CellTypeTag::Error => Some(CellValue::Error(text)),
            CellTypeTag::Number => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) => Some(CellValue::Number(n)),
                    Err(_) => Some(CellValue::Text(text)),
                }
            }
        }
    }
}

fn place(row: &mut Vec<Option<CellValue>>, col: usize, value: CellValue) {
    if row.len() <= col {
        row.resize(col + 1, None);
    }
    if let Some(slot) = row.get_mut(col) {
        *slot = Some(value);
    }
}

/// Parse one worksheet part into its cell grid.
pub(super) fn parse_sheet_rows<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> Result<SheetRows, LoadError> {
    let file = archive.by_name(path)?;

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut sheet = SheetRows::default();
    let mut buf = Vec::new();
    let mut row: Option<Vec<Option<CellValue>>> = None;
    let mut next_col: usize = 0;
    let mut cell: Option<PendingCell> = None;
    let mut in_text = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    row = Some(Vec::new());
                    next_col = 0;
                }
                b"c" => cell = Some(PendingCell::from_start(e, next_col)),
                b"v" | b"t" if cell.is_some() => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"c" => {
                let empty = PendingCell::from_start(e, next_col);
                next_col = empty.col + 1;
            }
            Event::Text(ref e) if in_text => {
                if let Some(pending) = cell.as_mut() {
                    pending.text.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_text = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let col = pending.col;
                        next_col = col + 1;
                        if let (Some(value), Some(current)) =
                            (pending.resolve(shared_strings), row.as_mut())
                        {
                            place(current, col, value);
                        }
                    }
                }
                b"row" => {
                    if let Some(done) = row.take() {
                        sheet.rows.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
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
    fn test_column_index() {
        assert_eq!(column_index(b"A1"), Some(0));
        assert_eq!(column_index(b"Z9"), Some(25));
        assert_eq!(column_index(b"AA10"), Some(26));
        assert_eq!(column_index(b"$B$2"), Some(1));
        assert_eq!(column_index(b"12"), None);
    }

    #[test]
    fn test_resolve_shared_and_numbers() {
        let shared = vec!["hello".to_string()];
        let cell = PendingCell {
            col: 0,
            tag: CellTypeTag::Shared,
            text: "0".into(),
        };
        assert_eq!(cell.resolve(&shared), Some(CellValue::Text("hello".into())));

        let cell = PendingCell {
            col: 0,
            tag: CellTypeTag::Number,
            text: "42.5".into(),
        };
        assert_eq!(cell.resolve(&shared), Some(CellValue::Number(42.5)));

        let cell = PendingCell {
            col: 0,
            tag: CellTypeTag::Number,
            text: String::new(),
        };
        assert_eq!(cell.resolve(&shared), None);
    }

    #[test]
    fn test_out_of_range_shared_index_is_empty() {
        let cell = PendingCell {
            col: 0,
            tag: CellTypeTag::Shared,
            text: "7".into(),
        };
        assert_eq!(cell.resolve(&[]), None);
    }

    #[test]
    fn test_bool_and_error_cells() {
        let cell = PendingCell {
            col: 0,
            tag: CellTypeTag::Bool,
            text: "1".into(),
        };
        assert_eq!(cell.resolve(&[]), Some(CellValue::Bool(true)));
        let cell = PendingCell {
            col: 0,
            tag: CellTypeTag::Error,
            text: "#DIV/0!".into(),
        };
        assert_eq!(cell.resolve(&[]), Some(CellValue::Error("#DIV/0!".into())));
    }
}
