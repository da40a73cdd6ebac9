//! Application state and its transitions.
//!
//! Every transition is a plain method on [`AppState`] that reports whether the
//! chart needs to be redrawn. The viewer (or CLI) owns the state and performs
//! the redraw itself.

use crate::config::ViewerConfig;
use crate::error::{LoadError, Result};
use crate::types::{Dataset, Record};
use crate::window::{Step, ViewWindow};

/// Outcome of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// Visible output changed; clear and redraw.
    Redraw,
    NoChange,
}

impl Transition {
    pub fn needs_redraw(self) -> bool {
        self == Self::Redraw
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    dataset: Dataset,
    window: ViewWindow,
    error: Option<String>,
    loaded: bool,
    /// Index of the hovered record within the visible window.
    hovered: Option<usize>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_window(ViewWindow::default())
    }
}

impl AppState {
    /// Fresh state using the configured initial window.
    ///
    /// # Errors
    /// [`crate::error::BubbleviewError::InvalidStep`] if `initial_step` is not
    /// one of 1, 5, 10, 100.
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        let step = Step::try_from(config.initial_step)?;
        Ok(Self::from_window(ViewWindow::new(config.initial_visible, step)))
    }

    fn from_window(window: ViewWindow) -> Self {
        Self {
            dataset: Dataset::default(),
            window,
            error: None,
            loaded: false,
            hovered: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    /// The current user-facing error line, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// The leading records currently on screen.
    pub fn visible(&self) -> &[Record] {
        self.dataset
            .prefix(self.window.visible_len(self.dataset.len()))
    }

    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    pub fn total_count(&self) -> usize {
        self.dataset.len()
    }

    /// Apply the outcome of one load attempt.
    ///
    /// Success replaces the dataset and resets the window. Failure clears the
    /// dataset too, so the chart never shows data from an earlier file next
    /// to an error about a later one.
    pub fn apply_load(&mut self, result: std::result::Result<Dataset, LoadError>) -> Transition {
        self.hovered = None;
        match result {
            Ok(dataset) => {
                tracing::info!(records = dataset.len(), "load applied");
                self.dataset = dataset;
                self.window.reset();
                self.error = None;
                self.loaded = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, fetch = err.is_fetch(), "load failed");
                self.dataset = Dataset::default();
                self.error = Some(err.user_message());
                self.loaded = false;
            }
        }
        Transition::Redraw
    }

    /// A startup fetch failed before any payload was available.
    pub fn apply_fetch_failure(&mut self, status: Option<u16>, message: impl Into<String>) -> Transition {
        self.apply_load(Err(LoadError::Fetch {
            status,
            message: message.into(),
        }))
    }

    /// Show an error that is not tied to a load attempt (e.g. nothing
    /// selected). The dataset and window are kept.
    pub fn set_error(&mut self, message: impl Into<String>) -> Transition {
        self.error = Some(message.into());
        Transition::Redraw
    }

    pub fn increase(&mut self) -> Transition {
        if !self.loaded {
            return Transition::NoChange;
        }
        self.hovered = None;
        self.window.increase(self.dataset.len());
        Transition::Redraw
    }

    pub fn decrease(&mut self) -> Transition {
        if !self.loaded {
            return Transition::NoChange;
        }
        self.hovered = None;
        self.window.decrease(self.dataset.len());
        Transition::Redraw
    }

    /// Change the step. Allowed before any load; the window count is untouched.
    pub fn set_step(&mut self, step: Step) -> Transition {
        if self.window.step() == step {
            return Transition::NoChange;
        }
        self.window.set_step(step);
        Transition::Redraw
    }

    /// Move the hover to `index` (within the visible window) or clear it.
    pub fn hover(&mut self, index: Option<usize>) -> Transition {
        let index = index.filter(|&i| i < self.visible_count());
        if index == self.hovered {
            return Transition::NoChange;
        }
        self.hovered = index;
        Transition::Redraw
    }
}
