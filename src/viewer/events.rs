//! DOM listeners for `BubbleView`.
//!
//! Every listener is recorded so `unmount` can take it off its target again.
//! Handlers only touch [`SharedState`]; the chart is redrawn from there.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

use super::fetch;
use super::SharedState;
use crate::error::{BubbleviewError, Result};
use crate::window::Step;

/// A closure installed on a DOM target.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn install(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| BubbleviewError::Dom(format!("failed to add {kind} listener: {e:?}")))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    pub(crate) fn remove(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

pub(crate) fn on_key_down(state: &Rc<RefCell<SharedState>>, event: &Event) {
    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    let transition = s.input.handle_key(&mut s.app, &event.key());
    s.apply(transition);
}

pub(crate) fn on_pointer_move(
    state: &Rc<RefCell<SharedState>>,
    canvas: &HtmlCanvasElement,
    event: &Event,
) {
    let Some(event) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let (x, y) = canvas_point(canvas, event);
    let mut s = state.borrow_mut();
    let hit = s.plan.as_ref().and_then(|plan| plan.hit_test(x, y));
    let transition = s.app.hover(hit);
    s.apply(transition);
}

pub(crate) fn on_pointer_leave(state: &Rc<RefCell<SharedState>>) {
    let mut s = state.borrow_mut();
    let transition = s.app.hover(None);
    s.apply(transition);
}

pub(crate) fn on_step(state: &Rc<RefCell<SharedState>>, step: Step) {
    let mut s = state.borrow_mut();
    let transition = s.app.set_step(step);
    s.apply(transition);
}

/// File picker `change`: read the first selected file, then load it.
pub(crate) fn on_file_change(state: &Rc<RefCell<SharedState>>, input: &HtmlInputElement) {
    let file = input.files().and_then(|files| files.get(0));
    let Some(file) = file else {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let transition = s.input.handle_file(&mut s.app, None);
        s.apply(transition);
        return;
    };

    tracing::info!(name = %file.name(), size = file.size(), "reading selected file");
    let state = Rc::downgrade(state);
    wasm_bindgen_futures::spawn_local(async move {
        let bytes = fetch::read_blob(&file).await;
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let transition = match bytes {
            Ok(bytes) => s.input.handle_file(&mut s.app, Some(bytes.as_slice())),
            Err(err) => s.app.apply_load(Err(err)),
        };
        s.apply(transition);
    });
}
