//! Structured error types for bubbleview.
//!
//! `LoadError` is the taxonomy of a single load attempt (startup fetch or
//! manual upload). `BubbleviewError` covers everything else.

/// Columns that every data sheet must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["X", "Y", "R", "Name"];

/// Why a load attempt failed.
///
/// Every variant is fatal to the attempt it belongs to; no partial dataset is
/// ever produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The startup resource could not be fetched (non-200 status or transport error).
    #[error("{}", fetch_description(.status, .message))]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    /// One or more required columns are absent from the first data row.
    #[error("the file must contain the columns X, Y, R, Name (missing: {})", .missing.join(", "))]
    SchemaMissing { missing: Vec<&'static str> },

    /// A data row holds a non-numeric value in X, Y or R.
    #[error("columns X, Y, R must contain only numbers (row {row}, column {column}: {value:?})")]
    NonNumericColumn {
        /// 1-based data row (the header row is not counted).
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The payload is not a decodable workbook.
    #[error("not a readable workbook: {0}")]
    Parse(String),
}

fn fetch_description(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("default data file not found (status: {code})"),
        None => format!("default data file could not be fetched: {message}"),
    }
}

impl LoadError {
    /// The single line shown to the user after a failed attempt.
    ///
    /// Fetch failures are downgraded to a hint to upload a file by hand.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch { .. } => format!("{self}. Please load a file manually."),
            _ => format!("Error reading file: {self}"),
        }
    }

    /// Whether the failure came from the startup fetch rather than the payload.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

impl From<zip::result::ZipError> for LoadError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Parse(format!("ZIP archive: {e}"))
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Parse(format!("XML parsing: {e}"))
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Parse(format!("I/O error: {e}"))
    }
}

/// All other errors that can occur in bubbleview.
#[derive(Debug, thiserror::Error)]
pub enum BubbleviewError {
    /// A load attempt failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A step value outside the allowed set was requested.
    #[error("invalid step {0} (allowed: 1, 5, 10, 100)")]
    InvalidStep(u32),

    /// Configuration could not be read.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// DOM wiring error (missing element, listener registration).
    #[error("DOM error: {0}")]
    Dom(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BubbleviewError>;

impl From<serde_json::Error> for BubbleviewError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<BubbleviewError> for wasm_bindgen::JsValue {
    fn from(e: BubbleviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<LoadError> for wasm_bindgen::JsValue {
    fn from(e: LoadError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.user_message())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_status_is_a_manual_upload_hint() {
        let err = LoadError::Fetch {
            status: Some(404),
            message: String::new(),
        };
        assert_eq!(
            err.user_message(),
            "default data file not found (status: 404). Please load a file manually."
        );
        assert!(err.is_fetch());
    }

    #[test]
    fn test_schema_message_lists_missing_columns() {
        let err = LoadError::SchemaMissing {
            missing: vec!["R", "Name"],
        };
        let msg = err.user_message();
        assert!(msg.starts_with("Error reading file: "));
        assert!(msg.ends_with("(missing: R, Name)"));
    }

    #[test]
    fn test_zip_error_is_parse_failure() {
        let err: LoadError = zip::result::ZipError::InvalidArchive("bad").into();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}
