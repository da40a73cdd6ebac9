//! The chart surface capability and the marks drawn onto it.
//!
//! A surface knows nothing about records or scales; [`super::ChartRenderer`]
//! turns records into these marks.

use crate::error::Result;

/// Circle outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
}

/// A filled circle.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleMark {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: &'static str,
    pub opacity: f64,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub const fn svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }

    pub const fn canvas(self) -> &'static str {
        match self {
            Self::Start => "left",
            Self::Middle => "center",
            Self::End => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Normal,
    Small,
}

impl FontSize {
    pub const fn px(self) -> f64 {
        match self {
            Self::Normal => 12.0,
            Self::Small => 10.0,
        }
    }
}

/// A single line of text. `(x, y)` is the baseline anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub fill: &'static str,
    pub anchor: TextAnchor,
    pub size: FontSize,
    /// Rotation in degrees around `(x, y)`.
    pub rotation: Option<f64>,
    /// Tooltip text is removed on pointer-leave; everything else is permanent.
    pub tooltip: bool,
}

impl TextMark {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            fill: "black",
            anchor: TextAnchor::Start,
            size: FontSize::Normal,
            rotation: None,
            tooltip: false,
        }
    }

    #[must_use]
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    #[must_use]
    pub fn fill(mut self, fill: &'static str) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn size(mut self, size: FontSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    #[must_use]
    pub fn tooltip(mut self) -> Self {
        self.tooltip = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    /// Horizontal axis with ticks and labels below the line.
    Bottom,
    /// Vertical axis with ticks and labels left of the line.
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis.
    pub position: f64,
    pub label: String,
}

/// An axis line with tick marks.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMark {
    pub orientation: AxisOrientation,
    /// Y of a bottom axis, X of a left axis.
    pub offset: f64,
    /// Pixel extent of the axis line.
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl AxisMark {
    /// Length of tick marks (and of the domain line's end caps).
    pub const TICK_SIZE: f64 = 6.0;
    /// Distance between tick end and label.
    pub const TICK_PADDING: f64 = 3.0;
}

/// Something a chart can be drawn on.
pub trait ChartSurface {
    /// Drop everything previously drawn.
    fn clear(&mut self) -> Result<()>;

    fn draw_circle(&mut self, circle: &CircleMark) -> Result<()>;

    fn draw_text(&mut self, text: &TextMark) -> Result<()>;

    fn draw_axis(&mut self, axis: &AxisMark) -> Result<()>;

    /// Called once after the last mark of a frame.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
