//! Bubble chart layout and drawing.
//!
//! Scales are computed from the visible window only, never from the full
//! dataset:
//! - X: `[0, ceil(max x / step) * step]` onto the plot width
//! - Y: fixed `[0, y_max]`, inverted so larger Y is higher
//! - radius: `[0, max r]` onto `[min_radius, max_radius]`

use crate::config::ChartConfig;
use crate::error::Result;
use crate::types::{format_number, Record};

use super::colors::{BubbleColor, TextColor};
use super::scale::{nice_upper, range_values, LinearScale};
use super::surface::{
    AxisMark, AxisOrientation, ChartSurface, CircleMark, FontSize, Stroke, TextAnchor, TextMark,
    Tick,
};
use super::text::{format_tick, wrap_note};

const HOVER_STROKE: Stroke = Stroke {
    color: "black",
    width: 2.0,
};

/// Geometry of one record's circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    /// Index into the visible slice (and the dataset, since the window is a prefix).
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub color: BubbleColor,
}

impl Bubble {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Everything needed to draw (and hit-test) one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub r_scale: LinearScale,
    pub bubbles: Vec<Bubble>,
    pub x_axis: AxisMark,
    pub y_axis: AxisMark,
    pub visible: usize,
    pub total: usize,
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

impl ChartPlan {
    /// Lay out the visible records. Returns `None` when there is nothing to draw.
    pub fn build(visible: &[Record], total: usize, config: &ChartConfig) -> Option<Self> {
        if visible.is_empty() {
            return None;
        }
        let margin = &config.margin;

        let x_upper = nice_upper(max_of(visible.iter().map(|r| r.x)), config.x_tick_step);
        let x_scale = LinearScale::new(
            (0.0, x_upper),
            (margin.left, config.width - margin.right),
        );
        let y_scale = LinearScale::new(
            (0.0, config.y_max),
            (config.height - margin.bottom, margin.top),
        );
        let r_scale = LinearScale::new(
            (0.0, max_of(visible.iter().map(|r| r.r))),
            (config.min_radius, config.max_radius),
        );

        let bubbles = visible
            .iter()
            .enumerate()
            .map(|(index, record)| Bubble {
                index,
                cx: x_scale.apply(record.x),
                cy: y_scale.apply(record.y),
                radius: r_scale.apply(record.r),
                color: BubbleColor::for_x(record.x),
            })
            .collect();

        let x_axis = AxisMark {
            orientation: AxisOrientation::Bottom,
            offset: config.height - margin.bottom,
            extent: x_scale.range,
            ticks: range_values(0.0, x_upper + config.x_tick_step, config.x_tick_step)
                .into_iter()
                .map(|v| Tick {
                    position: x_scale.apply(v),
                    label: format_tick(v),
                })
                .collect(),
        };
        let y_axis = AxisMark {
            orientation: AxisOrientation::Left,
            offset: margin.left,
            extent: y_scale.range,
            ticks: range_values(0.0, config.y_max + 1.0, 1.0)
                .into_iter()
                .map(|v| Tick {
                    position: y_scale.apply(v),
                    label: format_tick(v),
                })
                .collect(),
        };

        Some(Self {
            x_scale,
            y_scale,
            r_scale,
            bubbles,
            x_axis,
            y_axis,
            visible: visible.len(),
            total,
        })
    }

    /// Top-most bubble under `(x, y)`; later bubbles are drawn over earlier ones.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.bubbles
            .iter()
            .rev()
            .find(|b| b.contains(x, y))
            .map(|b| b.index)
    }

    /// Status line text, e.g. `"15 of 40 shown"`.
    pub fn status_text(&self) -> String {
        format!("{} of {} shown", self.visible, self.total)
    }

    /// Tooltip lines for a hovered bubble: the X value, then the wrapped note.
    pub fn tooltip_marks(
        &self,
        bubble: &Bubble,
        record: &Record,
        config: &ChartConfig,
    ) -> Vec<TextMark> {
        let small = bubble.radius <= config.small_radius_threshold;
        let value_color = if small {
            TextColor::Black
        } else {
            bubble.color.contrast_text()
        };

        let value = if small {
            TextMark::new(bubble.cx + bubble.radius + 3.0, bubble.cy, format_number(record.x))
        } else {
            TextMark::new(bubble.cx, bubble.cy + 3.0, format_number(record.x))
                .anchor(TextAnchor::Middle)
        }
        .fill(value_color.css())
        .tooltip();

        let mut marks = vec![value];
        if let Some(note) = record.note.as_deref() {
            let top = bubble.cy - bubble.radius - 5.0;
            let mut line_y = top;
            for line in wrap_note(note, config.note_wrap_width) {
                marks.push(
                    TextMark::new(bubble.cx + bubble.radius + 5.0, line_y, line)
                        .size(FontSize::Small)
                        .tooltip(),
                );
                line_y += config.note_line_height;
            }
        }
        marks
    }
}

/// Draws a [`ChartPlan`] onto a [`ChartSurface`].
pub struct ChartRenderer<'a> {
    config: &'a ChartConfig,
}

impl<'a> ChartRenderer<'a> {
    pub fn new(config: &'a ChartConfig) -> Self {
        Self { config }
    }

    /// Clear the surface and draw the visible window.
    ///
    /// `hovered` is an index into `visible`. Returns the plan that was drawn,
    /// or `None` (after clearing) when `visible` is empty.
    pub fn render<S: ChartSurface + ?Sized>(
        &self,
        surface: &mut S,
        visible: &[Record],
        total: usize,
        hovered: Option<usize>,
    ) -> Result<Option<ChartPlan>> {
        surface.clear()?;
        let Some(plan) = ChartPlan::build(visible, total, self.config) else {
            surface.finish()?;
            return Ok(None);
        };
        self.draw(surface, &plan, visible, hovered)?;
        surface.finish()?;
        Ok(Some(plan))
    }

    fn draw<S: ChartSurface + ?Sized>(
        &self,
        surface: &mut S,
        plan: &ChartPlan,
        visible: &[Record],
        hovered: Option<usize>,
    ) -> Result<()> {
        let config = self.config;

        for bubble in &plan.bubbles {
            let is_hovered = hovered == Some(bubble.index);
            surface.draw_circle(&CircleMark {
                cx: bubble.cx,
                cy: bubble.cy,
                r: bubble.radius,
                fill: bubble.color.css(),
                opacity: if is_hovered { 1.0 } else { config.base_opacity },
                stroke: is_hovered.then_some(HOVER_STROKE),
            })?;
        }

        surface.draw_axis(&plan.x_axis)?;
        surface.draw_axis(&plan.y_axis)?;

        surface.draw_text(
            &TextMark::new(config.width / 2.0, config.height + config.margin.top, "X")
                .anchor(TextAnchor::Middle),
        )?;
        surface.draw_text(
            &TextMark::new(config.margin.left - 30.0, config.height / 2.0, "Y")
                .anchor(TextAnchor::Middle)
                .rotated(-90.0),
        )?;
        surface.draw_text(&TextMark::new(
            config.width,
            config.margin.top,
            plan.status_text(),
        ))?;

        let hovered_pair = hovered.and_then(|idx| Some((plan.bubbles.get(idx)?, visible.get(idx)?)));
        if let Some((bubble, record)) = hovered_pair {
            for mark in plan.tooltip_marks(bubble, record, config) {
                surface.draw_text(&mark)?;
            }
        }
        Ok(())
    }
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

    fn records() -> Vec<Record> {
        vec![
            Record::new(120.0, 5.0, 10.0, "a"),
            Record::new(250.0, 10.0, 0.0, "b").with_note("first note"),
            Record::new(3.0, 0.0, 5.0, "c"),
        ]
    }

    #[test]
    fn test_empty_window_has_no_plan() {
        assert!(ChartPlan::build(&[], 0, &ChartConfig::default()).is_none());
    }

    #[test]
    fn test_scales_follow_visible_window() {
        let plan = ChartPlan::build(&records(), 40, &ChartConfig::default()).unwrap();
        assert_eq!(plan.x_scale.domain, (0.0, 300.0));
        assert_eq!(plan.x_scale.range, (40.0, 480.0));
        assert_eq!(plan.y_scale.range, (370.0, 20.0));
        assert_eq!(plan.r_scale.domain, (0.0, 10.0));

        let b = &plan.bubbles[1];
        assert!((b.cx - (40.0 + 440.0 * 250.0 / 300.0)).abs() < 1e-9);
        assert_eq!(b.cy, 20.0);
        assert_eq!(b.radius, 5.0);
        assert_eq!(plan.bubbles[0].radius, 30.0);
        assert_eq!(b.color, BubbleColor::Red);
    }

    #[test]
    fn test_axis_ticks() {
        let plan = ChartPlan::build(&records(), 3, &ChartConfig::default()).unwrap();
        let labels: Vec<&str> = plan.x_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "100", "200", "300"]);
        assert_eq!(plan.y_axis.ticks.len(), 11);
        assert_eq!(plan.y_axis.ticks[10].position, 20.0);
        assert_eq!(plan.x_axis.offset, 370.0);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let recs = vec![
            Record::new(100.0, 5.0, 10.0, "under"),
            Record::new(100.0, 5.0, 10.0, "over"),
        ];
        let plan = ChartPlan::build(&recs, 2, &ChartConfig::default()).unwrap();
        let b = &plan.bubbles[0];
        assert_eq!(plan.hit_test(b.cx, b.cy), Some(1));
        assert_eq!(plan.hit_test(b.cx + b.radius + 1.0, b.cy), None);
    }

    #[test]
    fn test_small_bubble_tooltip_sits_beside_in_black() {
        let config = ChartConfig::default();
        let recs = records();
        let plan = ChartPlan::build(&recs, 3, &config).unwrap();
        let marks = plan.tooltip_marks(&plan.bubbles[1], &recs[1], &config);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].text, "250");
        assert_eq!(marks[0].anchor, TextAnchor::Start);
        assert_eq!(marks[0].fill, "black");
        assert_eq!(marks[0].x, plan.bubbles[1].cx + 5.0 + 3.0);
        assert_eq!(marks[1].text, "first note");
        assert_eq!(marks[1].y, plan.bubbles[1].cy - 5.0 - 5.0);
        assert!(marks.iter().all(|m| m.tooltip));
    }

    #[test]
    fn test_large_bubble_tooltip_is_centered_with_contrast() {
        let config = ChartConfig::default();
        let recs = records();
        let plan = ChartPlan::build(&recs, 3, &config).unwrap();
        // x = 120 -> remainder 0 -> yellow -> black text
        let marks = plan.tooltip_marks(&plan.bubbles[0], &recs[0], &config);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].anchor, TextAnchor::Middle);
        assert_eq!(marks[0].y, plan.bubbles[0].cy + 3.0);
        assert_eq!(marks[0].fill, "black");

        let green = vec![Record::new(121.0, 5.0, 10.0, "g")];
        let plan = ChartPlan::build(&green, 1, &config).unwrap();
        let marks = plan.tooltip_marks(&plan.bubbles[0], &green[0], &config);
        assert_eq!(marks[0].fill, "white");
    }

    #[test]
    fn test_note_lines_stack_at_line_height() {
        let config = ChartConfig::default();
        let recs = vec![Record::new(1.0, 1.0, 1.0, "n")
            .with_note("a b c d e f g h i j k l m n o p q r s t u v w x y z")];
        let plan = ChartPlan::build(&recs, 1, &config).unwrap();
        let marks = plan.tooltip_marks(&plan.bubbles[0], &recs[0], &config);
        assert_eq!(marks.len(), 3);
        assert_eq!(marks[2].y - marks[1].y, 14.0);
    }
}
