//! Viewer and chart configuration.
//!
//! Every field has a default, so JavaScript callers and the CLI only pass
//! what they want to change.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Plot margins in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 120.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

/// Chart geometry and mark styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Plot width; the surface is `width + margin.left + margin.right` wide.
    pub width: f64,
    /// Plot height; the surface is `height + margin.top + margin.bottom` tall.
    pub height: f64,
    pub margin: Margin,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Spacing of X-axis ticks and rounding unit of the X domain.
    pub x_tick_step: f64,
    /// Fixed Y domain upper bound (lower bound is 0).
    pub y_max: f64,
    /// Circles at or below this rendered radius get their label beside them.
    pub small_radius_threshold: f64,
    /// Line-width budget, in characters, for wrapped notes.
    pub note_wrap_width: usize,
    pub note_line_height: f64,
    pub base_opacity: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            margin: Margin::default(),
            min_radius: 5.0,
            max_radius: 30.0,
            x_tick_step: 100.0,
            y_max: 10.0,
            small_radius_threshold: 7.0,
            note_wrap_width: 40,
            note_line_height: 14.0,
            base_opacity: 0.5,
        }
    }
}

impl ChartConfig {
    /// Full surface width including margins.
    pub fn surface_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    /// Full surface height including margins.
    pub fn surface_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub title: String,
    /// Resource fetched once at startup.
    pub default_url: String,
    /// Delay before the startup fetch is issued.
    pub startup_delay_ms: u32,
    /// Window size after every successful load.
    pub initial_visible: usize,
    /// Initial step; must be one of 1, 5, 10, 100.
    pub initial_step: u32,
    pub chart: ChartConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Bubbles".to_string(),
            default_url: "data_boiled.xlsx".to_string(),
            startup_delay_ms: 1000,
            initial_visible: 15,
            initial_step: 5,
            chart: ChartConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    /// Returns [`crate::error::BubbleviewError::Config`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
