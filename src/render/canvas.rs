//! Canvas 2D surface for the browser viewer.

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{BubbleviewError, Result};

use super::surface::{AxisMark, AxisOrientation, ChartSurface, CircleMark, TextMark};

const FONT_FAMILY: &str = "sans-serif";
const AXIS_FONT: &str = "10px sans-serif";

/// Snap a coordinate to the pixel centre so 1px lines stay crisp.
fn crisp(x: f64) -> f64 {
    x.floor() + 0.5
}

fn js_err(what: &str) -> impl Fn(wasm_bindgen::JsValue) -> BubbleviewError + '_ {
    move |e| BubbleviewError::Render(format!("{what}: {e:?}"))
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Logical size in CSS pixels.
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    /// Wrap a canvas; call [`Self::resize`] before the first frame.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err("Failed to get 2d context"))?
            .ok_or_else(|| BubbleviewError::Render("No 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BubbleviewError::Render("Failed to cast to CanvasRenderingContext2d".into()))?;

        let width = f64::from(canvas.width());
        let height = f64::from(canvas.height());
        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
        })
    }

    /// Size the backing store to `width x height` CSS pixels at `dpr`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Result<()> {
        self.width = width;
        self.height = height;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };

        self.canvas.set_width((width * self.dpr).round() as u32);
        self.canvas.set_height((height * self.dpr).round() as u32);
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{width}px"))
            .map_err(js_err("Failed to set canvas width"))?;
        style
            .set_property("height", &format!("{height}px"))
            .map_err(js_err("Failed to set canvas height"))?;
        Ok(())
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_font(&self, px: f64) {
        self.ctx.set_font(&format!("{px}px {FONT_FAMILY}"));
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ctx
            .fill_text(text, x, y)
            .map_err(js_err("Failed to draw text"))
    }
}

impl ChartSurface for CanvasSurface {
    fn clear(&mut self) -> Result<()> {
        self.ctx
            .reset_transform()
            .map_err(js_err("Failed to reset transform"))?;
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        self.ctx
            .scale(self.dpr, self.dpr)
            .map_err(js_err("Failed to scale context"))?;
        self.ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_circle(&mut self, circle: &CircleMark) -> Result<()> {
        self.ctx.begin_path();
        self.ctx
            .arc(circle.cx, circle.cy, circle.r, 0.0, PI * 2.0)
            .map_err(js_err("Failed to draw circle"))?;
        self.ctx.set_global_alpha(circle.opacity);
        self.ctx.set_fill_style_str(circle.fill);
        self.ctx.fill();
        if let Some(stroke) = circle.stroke {
            self.ctx.set_stroke_style_str(stroke.color);
            self.ctx.set_line_width(stroke.width);
            self.ctx.stroke();
        }
        self.ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_text(&mut self, text: &TextMark) -> Result<()> {
        self.set_font(text.size.px());
        self.ctx.set_fill_style_str(text.fill);
        self.ctx.set_text_align(text.anchor.canvas());
        self.ctx.set_text_baseline("alphabetic");
        match text.rotation {
            Some(degrees) => {
                self.ctx.save();
                let result = self
                    .ctx
                    .translate(text.x, text.y)
                    .and_then(|()| self.ctx.rotate(degrees.to_radians()))
                    .map_err(js_err("Failed to rotate text"))
                    .and_then(|()| self.fill_text(&text.text, 0.0, 0.0));
                self.ctx.restore();
                result
            }
            None => self.fill_text(&text.text, text.x, text.y),
        }
    }

    fn draw_axis(&mut self, axis: &AxisMark) -> Result<()> {
        let size = AxisMark::TICK_SIZE;
        let gap = size + AxisMark::TICK_PADDING;
        let (start, end) = axis.extent;
        let offset = crisp(axis.offset);

        self.ctx.set_stroke_style_str("black");
        self.ctx.set_fill_style_str("black");
        self.ctx.set_line_width(1.0);
        self.ctx.set_font(AXIS_FONT);

        self.ctx.begin_path();
        match axis.orientation {
            AxisOrientation::Bottom => {
                self.ctx.move_to(start, offset + size);
                self.ctx.line_to(start, offset);
                self.ctx.line_to(end, offset);
                self.ctx.line_to(end, offset + size);
                for tick in &axis.ticks {
                    let x = crisp(tick.position);
                    self.ctx.move_to(x, offset);
                    self.ctx.line_to(x, offset + size);
                }
            }
            AxisOrientation::Left => {
                self.ctx.move_to(offset - size, start);
                self.ctx.line_to(offset, start);
                self.ctx.line_to(offset, end);
                self.ctx.line_to(offset - size, end);
                for tick in &axis.ticks {
                    let y = crisp(tick.position);
                    self.ctx.move_to(offset, y);
                    self.ctx.line_to(offset - size, y);
                }
            }
        }
        self.ctx.stroke();

        match axis.orientation {
            AxisOrientation::Bottom => {
                self.ctx.set_text_align("center");
                self.ctx.set_text_baseline("top");
                for tick in &axis.ticks {
                    self.fill_text(&tick.label, tick.position, axis.offset + gap)?;
                }
            }
            AxisOrientation::Left => {
                self.ctx.set_text_align("right");
                self.ctx.set_text_baseline("middle");
                for tick in &axis.ticks {
                    self.fill_text(&tick.label, axis.offset - gap, tick.position)?;
                }
            }
        }
        self.ctx.set_text_baseline("alphabetic");
        Ok(())
    }
}

impl std::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpr", &self.dpr)
            .finish_non_exhaustive()
    }
}
