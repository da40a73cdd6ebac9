//! Chart rendering.
//!
//! This module provides:
//! - The [`ChartSurface`] capability (clear, circles, text, axes)
//! - Scales, bubble colours and note wrapping
//! - [`ChartPlan`]/[`ChartRenderer`], which map the visible records to marks
//! - An SVG surface (all targets) and a Canvas 2D surface (wasm32)

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod chart;
pub mod colors;
pub mod scale;
pub mod surface;
pub mod svg;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use chart::{Bubble, ChartPlan, ChartRenderer};
pub use colors::{BubbleColor, TextColor};
pub use scale::LinearScale;
pub use surface::{
    AxisMark, AxisOrientation, ChartSurface, CircleMark, FontSize, Stroke, TextAnchor, TextMark,
    Tick,
};
pub use svg::SvgSurface;
pub use text::wrap_note;
