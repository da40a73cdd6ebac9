//! Keyboard and file-picker input mapped onto [`AppState`] transitions.

use crate::app::{AppState, Transition};
use crate::loader;

/// Shown when the picker fires without a file.
pub const NO_FILE_MESSAGE: &str = "Please select a file";

/// What a key does to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Increase,
    Decrease,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value. Only the four arrow keys are bound.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "ArrowRight" => Some(Self::Increase),
            "ArrowDown" | "ArrowLeft" => Some(Self::Decrease),
            _ => None,
        }
    }
}

/// Routes raw input to state transitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputController;

impl InputController {
    /// Handle a key press. Unbound keys, and every key while nothing is
    /// loaded, leave the state alone.
    pub fn handle_key(&self, state: &mut AppState, key: &str) -> Transition {
        match KeyAction::from_key(key) {
            Some(KeyAction::Increase) => state.increase(),
            Some(KeyAction::Decrease) => state.decrease(),
            None => Transition::NoChange,
        }
    }

    /// Handle a file-picker selection. `None` means the picker was cleared.
    pub fn handle_file(&self, state: &mut AppState, payload: Option<&[u8]>) -> Transition {
        match payload {
            Some(bytes) => {
                tracing::debug!(bytes = bytes.len(), "file selected");
                state.apply_load(loader::load(bytes))
            }
            None => state.set_error(NO_FILE_MESSAGE),
        }
    }
}
