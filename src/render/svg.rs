//! SVG document surface.
//!
//! Produces a standalone `<svg>` document. Used natively (CLI, tests) and by
//! the browser viewer's `svg()` export.

use std::fmt::Write as _;

use crate::error::{BubbleviewError, Result};

use super::surface::{AxisMark, AxisOrientation, ChartSurface, CircleMark, TextMark};

const FONT_FAMILY: &str = "sans-serif";

/// Escape text for use in SVG character data and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Trim trailing zeros so `12.5000` prints as `12.5` and `40.0` as `40`.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = format!("{rounded:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn fmt_err(e: std::fmt::Error) -> BubbleviewError {
    BubbleviewError::Render(format!("SVG write failed: {e}"))
}

/// Builds an SVG document in memory.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
    document: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        let mut surface = Self {
            width,
            height,
            body: String::new(),
            document: String::new(),
        };
        surface.document = surface.wrap();
        surface
    }

    /// The document as of the last [`ChartSurface::finish`].
    pub fn svg(&self) -> &str {
        &self.document
    }

    pub fn into_string(self) -> String {
        self.document
    }

    /// Whether anything has been drawn since the last clear.
    pub fn is_blank(&self) -> bool {
        self.body.is_empty()
    }

    fn wrap(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{FONT_FAMILY}\">\n{body}</svg>\n",
            w = num(self.width),
            h = num(self.height),
            body = self.body,
        )
    }

    fn write_text(&mut self, mark: &TextMark) -> std::fmt::Result {
        write!(
            self.body,
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" text-anchor=\"{}\" font-size=\"{}\"",
            num(mark.x),
            num(mark.y),
            mark.fill,
            mark.anchor.svg(),
            num(mark.size.px()),
        )?;
        if let Some(degrees) = mark.rotation {
            write!(
                self.body,
                " transform=\"rotate({} {} {})\"",
                num(degrees),
                num(mark.x),
                num(mark.y)
            )?;
        }
        if mark.tooltip {
            self.body.push_str(" class=\"tooltip\"");
        }
        writeln!(self.body, ">{}</text>", escape_xml(&mark.text))
    }

    fn write_axis(&mut self, axis: &AxisMark) -> std::fmt::Result {
        let size = AxisMark::TICK_SIZE;
        let gap = size + AxisMark::TICK_PADDING;
        let (start, end) = axis.extent;
        match axis.orientation {
            AxisOrientation::Bottom => {
                writeln!(
                    self.body,
                    "<g class=\"axis axis-x\" transform=\"translate(0,{})\" font-size=\"10\" text-anchor=\"middle\">",
                    num(axis.offset)
                )?;
                writeln!(
                    self.body,
                    "<path class=\"domain\" stroke=\"currentColor\" fill=\"none\" d=\"M{},{}V0H{}V{}\"/>",
                    num(start),
                    num(size),
                    num(end),
                    num(size)
                )?;
                for tick in &axis.ticks {
                    writeln!(
                        self.body,
                        "<g class=\"tick\" transform=\"translate({},0)\"><line stroke=\"currentColor\" y2=\"{}\"/><text fill=\"currentColor\" y=\"{}\" dy=\"0.71em\">{}</text></g>",
                        num(tick.position),
                        num(size),
                        num(gap),
                        escape_xml(&tick.label)
                    )?;
                }
            }
            AxisOrientation::Left => {
                writeln!(
                    self.body,
                    "<g class=\"axis axis-y\" transform=\"translate({},0)\" font-size=\"10\" text-anchor=\"end\">",
                    num(axis.offset)
                )?;
                writeln!(
                    self.body,
                    "<path class=\"domain\" stroke=\"currentColor\" fill=\"none\" d=\"M-{},{}H0V{}H-{}\"/>",
                    num(size),
                    num(start),
                    num(end),
                    num(size)
                )?;
                for tick in &axis.ticks {
                    writeln!(
                        self.body,
                        "<g class=\"tick\" transform=\"translate(0,{})\"><line stroke=\"currentColor\" x2=\"-{}\"/><text fill=\"currentColor\" x=\"-{}\" dy=\"0.32em\">{}</text></g>",
                        num(tick.position),
                        num(size),
                        num(gap),
                        escape_xml(&tick.label)
                    )?;
                }
            }
        }
        self.body.push_str("</g>\n");
        Ok(())
    }
}

impl ChartSurface for SvgSurface {
    fn clear(&mut self) -> Result<()> {
        self.body.clear();
        Ok(())
    }

    fn draw_circle(&mut self, circle: &CircleMark) -> Result<()> {
        write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\"",
            num(circle.cx),
            num(circle.cy),
            num(circle.r),
            circle.fill,
            num(circle.opacity),
        )
        .map_err(fmt_err)?;
        if let Some(stroke) = circle.stroke {
            write!(
                self.body,
                " stroke=\"{}\" stroke-width=\"{}\"",
                stroke.color,
                num(stroke.width)
            )
            .map_err(fmt_err)?;
        }
        self.body.push_str("/>\n");
        Ok(())
    }

    fn draw_text(&mut self, text: &TextMark) -> Result<()> {
        self.write_text(text).map_err(fmt_err)
    }

    fn draw_axis(&mut self, axis: &AxisMark) -> Result<()> {
        self.write_axis(axis).map_err(fmt_err)
    }

    fn finish(&mut self) -> Result<()> {
        self.document = self.wrap();
        Ok(())
    }
}
