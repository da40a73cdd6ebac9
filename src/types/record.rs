//! Validated bubble records and the dataset that owns them.

use serde::{Deserialize, Serialize};

/// One plotted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Record {
    pub fn new(x: f64, y: f64, r: f64, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            r,
            name: name.into(),
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Ordered records from one successful load, in source row order.
///
/// Replaced wholesale on every load; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// The leading `count` records (fewer if the dataset is shorter).
    pub fn prefix(&self, count: usize) -> &[Record] {
        let end = count.min(self.records.len());
        self.records.get(..end).unwrap_or(&[])
    }

    /// Whether any record carries a note.
    pub fn has_notes(&self) -> bool {
        self.records.iter().any(|r| r.note.is_some())
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_clamped() {
        let data: Dataset = (0..3)
            .map(|i| Record::new(f64::from(i), 1.0, 1.0, format!("n{i}")))
            .collect();
        assert_eq!(data.prefix(2).len(), 2);
        assert_eq!(data.prefix(15).len(), 3);
        assert_eq!(data.prefix(0).len(), 0);
    }

    #[test]
    fn test_serializes_with_column_names() {
        let data = Dataset::new(vec![Record::new(1.0, 2.0, 3.0, "a").with_note("hi")]);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json[0]["X"], 1.0);
        assert_eq!(json[0]["Name"], "a");
        assert_eq!(json[0]["Note"], "hi");
        assert!(data.has_notes());
    }
}
