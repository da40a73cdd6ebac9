//! bubbleview - bubble chart viewer for tabular data
//!
//! Loads the first sheet of an XLSX workbook (or a CSV/TSV file) with the
//! columns `X`, `Y`, `R`, `Name` and an optional `Note`, and draws the leading
//! rows as an interactive bubble chart:
//! - Canvas 2D in the browser via WebAssembly, SVG everywhere else
//! - Arrow keys and step buttons page through how many rows are shown
//! - Hovering a bubble shows its X value and wrapped note
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { BubbleView } from 'bubbleview';
//! await init();
//! const view = new BubbleView({ defaultUrl: 'data_boiled.xlsx' });
//! // later
//! view.unmount();
//! ```

// Data
pub mod config;
pub mod error;
pub mod loader;
pub mod parser;
pub mod types;
pub mod xml_helpers;

// State and input
pub mod app;
pub mod input;
pub mod window;

// Rendering
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use app::{AppState, Transition};
pub use config::{ChartConfig, Margin, ViewerConfig};
pub use error::{BubbleviewError, LoadError, Result};
pub use input::{InputController, KeyAction};
pub use types::{Dataset, Record};
pub use viewer::{export_svg, BubbleView};
pub use window::{Step, ViewWindow};

/// Load a payload and return the validated records as a JSON string
///
/// # Errors
/// Returns the user-facing load error message if the payload is rejected.
#[wasm_bindgen]
pub fn load_dataset_json(data: &[u8]) -> std::result::Result<String, JsValue> {
    let dataset = loader::load(data).map_err(|e| JsValue::from_str(&e.user_message()))?;

    serde_json::to_string(&dataset)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Load a payload and return the records as a `JsValue`
///
/// # Errors
/// Returns the user-facing load error message if the payload is rejected.
#[wasm_bindgen]
pub fn load_dataset_to_js(data: &[u8]) -> std::result::Result<JsValue, JsValue> {
    let dataset = loader::load(data).map_err(|e| JsValue::from_str(&e.user_message()))?;

    serde_wasm_bindgen::to_value(&dataset)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
