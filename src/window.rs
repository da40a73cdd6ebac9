//! View window: how many leading records are visible, and the step by which
//! that count moves.
//!
//! Operations never fail; they saturate at the bounds.

use serde::{Deserialize, Serialize};

use crate::error::BubbleviewError;

/// Allowed window increments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Step {
    One,
    #[default]
    Five,
    Ten,
    Hundred,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::One, Step::Five, Step::Ten, Step::Hundred];

    pub const fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Five => 5,
            Self::Ten => 10,
            Self::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for Step {
    type Error = BubbleviewError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            100 => Ok(Self::Hundred),
            other => Err(BubbleviewError::InvalidStep(other)),
        }
    }
}

impl From<Step> for u32 {
    fn from(step: Step) -> Self {
        match step {
            Step::One => 1,
            Step::Five => 5,
            Step::Ten => 10,
            Step::Hundred => 100,
        }
    }
}

/// Visible-count state over a dataset of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    visible_count: usize,
    step: Step,
    default_count: usize,
}

impl Default for ViewWindow {
    fn default() -> Self {
        Self::new(15, Step::Five)
    }
}

impl ViewWindow {
    pub fn new(default_count: usize, step: Step) -> Self {
        Self {
            visible_count: default_count,
            step,
            default_count,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Number of records actually shown for a dataset of `len` records.
    pub fn visible_len(&self, len: usize) -> usize {
        self.visible_count.min(len)
    }

    /// Back to the default count after a new dataset arrives. The step is kept.
    pub fn reset(&mut self) {
        self.visible_count = self.default_count;
    }

    /// `min(count + step, len)`.
    pub fn increase(&mut self, len: usize) {
        let next = self.visible_count.saturating_add(self.step.get()).min(len);
        tracing::debug!(from = self.visible_count, to = next, "window increase");
        self.visible_count = next;
    }

    /// `max(step, count - step)`, never above `len` for non-empty data.
    pub fn decrease(&mut self, len: usize) {
        let step = self.step.get();
        let mut next = self.visible_count.saturating_sub(step).max(step);
        if len > 0 {
            next = next.min(len);
        }
        tracing::debug!(from = self.visible_count, to = next, "window decrease");
        self.visible_count = next;
    }

    /// Replace the step. The visible count is left alone.
    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }
}
