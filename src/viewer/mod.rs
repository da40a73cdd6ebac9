//! `BubbleView`: the browser entry point, plus a headless twin for native use.
//!
//! In the browser the viewer builds its own controls inside `#app`, owns the
//! `#chart` canvas exclusively and wires keyboard, picker, step-button and
//! pointer listeners. `unmount` (or dropping the viewer) takes them all down.
//!
//! Natively `BubbleView::new_headless` drives the same [`AppState`] into an
//! [`SvgSurface`]; the CLI and the integration tests use it.

#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod fetch;

use wasm_bindgen::prelude::*;

use crate::app::AppState;
use crate::config::ChartConfig;
#[cfg(not(target_arch = "wasm32"))]
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::render::{ChartPlan, ChartRenderer, ChartSurface, SvgSurface};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement};

#[cfg(target_arch = "wasm32")]
use self::events::Listener;
#[cfg(target_arch = "wasm32")]
use crate::app::Transition;
#[cfg(target_arch = "wasm32")]
use crate::config::ViewerConfig;
#[cfg(target_arch = "wasm32")]
use crate::error::BubbleviewError;
#[cfg(target_arch = "wasm32")]
use crate::input::InputController;
#[cfg(target_arch = "wasm32")]
use crate::loader;
#[cfg(target_arch = "wasm32")]
use crate::render::CanvasSurface;
#[cfg(target_arch = "wasm32")]
use crate::window::Step;

/// Shown under the controls.
pub const KEYBOARD_HINT: &str =
    "Use the arrow keys: Up/Right shows more bubbles, Down/Left shows fewer.";

/// Clear `surface` and draw the current window of `app` onto it.
fn redraw<S: ChartSurface + ?Sized>(
    surface: &mut S,
    app: &AppState,
    chart: &ChartConfig,
) -> Result<Option<ChartPlan>> {
    ChartRenderer::new(chart).render(surface, app.visible(), app.total_count(), app.hovered())
}

/// Render the current state as a standalone SVG document.
///
/// # Errors
/// Returns [`crate::error::BubbleviewError::Render`] if the document cannot
/// be written.
pub fn export_svg(app: &AppState, chart: &ChartConfig) -> Result<String> {
    let mut svg = SvgSurface::new(chart.surface_width(), chart.surface_height());
    redraw(&mut svg, app, chart)?;
    Ok(svg.into_string())
}

/// DOM nodes the viewer updates after every transition.
#[cfg(target_arch = "wasm32")]
pub(crate) struct Controls {
    root: HtmlElement,
    error_line: HtmlElement,
    step_buttons: Vec<(Step, HtmlButtonElement)>,
}

/// State reachable from event handlers (wasm32 only).
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) app: AppState,
    pub(crate) config: ViewerConfig,
    pub(crate) input: InputController,
    pub(crate) surface: CanvasSurface,
    /// Layout of the last frame, for pointer hit-testing.
    pub(crate) plan: Option<ChartPlan>,
    controls: Controls,
    mounted: bool,
    /// Last error written to the browser console, so each is logged once.
    reported_error: Option<String>,
}

#[cfg(target_arch = "wasm32")]
impl SharedState {
    /// Redraw if the transition asks for it.
    pub(crate) fn apply(&mut self, transition: Transition) {
        if transition.needs_redraw() {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        if !self.mounted {
            return;
        }
        match redraw(&mut self.surface, &self.app, &self.config.chart) {
            Ok(plan) => self.plan = plan,
            Err(e) => {
                tracing::error!(error = %e, "chart redraw failed");
                self.plan = None;
            }
        }
        self.report_error();
        self.sync_controls();
    }

    fn report_error(&mut self) {
        let current = self.app.error();
        if current == self.reported_error.as_deref() {
            return;
        }
        if let Some(message) = current {
            web_sys::console::warn_1(&JsValue::from_str(message));
        }
        self.reported_error = current.map(str::to_string);
    }

    fn sync_controls(&self) {
        let error_line = &self.controls.error_line;
        error_line.set_text_content(self.app.error());
        let display = if self.app.error().is_some() { "block" } else { "none" };
        let _ = error_line.style().set_property("display", display);

        let active = self.app.window().step();
        for (step, button) in &self.controls.step_buttons {
            let class = if *step == active { "step active" } else { "step" };
            button.set_class_name(class);
        }

        let cursor = if self.app.hovered().is_some() { "pointer" } else { "default" };
        let _ = self.surface.canvas().style().set_property("cursor", cursor);
    }
}

/// The viewer exported to JavaScript.
#[wasm_bindgen]
pub struct BubbleView {
    #[cfg(target_arch = "wasm32")]
    state: Rc<RefCell<SharedState>>,
    #[cfg(target_arch = "wasm32")]
    listeners: Vec<Listener>,

    #[cfg(not(target_arch = "wasm32"))]
    app: AppState,
    #[cfg(not(target_arch = "wasm32"))]
    config: ViewerConfig,
    #[cfg(not(target_arch = "wasm32"))]
    surface: SvgSurface,
    #[cfg(not(target_arch = "wasm32"))]
    plan: Option<ChartPlan>,
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
fn dom_err(what: &'static str) -> impl Fn(JsValue) -> BubbleviewError {
    move |e| BubbleviewError::Dom(format!("{what}: {e:?}"))
}

#[cfg(target_arch = "wasm32")]
fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)
        .map_err(dom_err("failed to create element"))?
        .dyn_into::<T>()
        .map_err(|_| BubbleviewError::Dom(format!("<{tag}> has an unexpected type")))
}

#[cfg(target_arch = "wasm32")]
fn append(parent: &HtmlElement, child: &HtmlElement) -> Result<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(dom_err("failed to append element"))
}

#[cfg(target_arch = "wasm32")]
struct Built {
    controls: Controls,
    picker: HtmlInputElement,
    canvas: HtmlCanvasElement,
}

#[cfg(target_arch = "wasm32")]
fn build_dom(document: &Document, config: &ViewerConfig) -> Result<Built> {
    let app_root = document
        .get_element_by_id("app")
        .ok_or_else(|| BubbleviewError::Dom("#app element not found".into()))?;

    let root: HtmlElement = create(document, "div")?;
    root.set_class_name("bubbleview");

    let title: HtmlElement = create(document, "h1")?;
    title.set_text_content(Some(&config.title));
    append(&root, &title)?;

    let controls_row: HtmlElement = create(document, "div")?;
    controls_row.set_class_name("controls");

    let picker: HtmlInputElement = create(document, "input")?;
    picker.set_type("file");
    picker.set_accept(".xlsx,.xls,.csv,.tsv");
    append(&controls_row, &picker)?;

    let mut step_buttons = Vec::with_capacity(Step::ALL.len());
    for step in Step::ALL {
        let button: HtmlButtonElement = create(document, "button")?;
        button.set_type("button");
        button.set_text_content(Some(&u32::from(step).to_string()));
        append(&controls_row, &button)?;
        step_buttons.push((step, button));
    }
    append(&root, &controls_row)?;

    let error_line: HtmlElement = create(document, "p")?;
    error_line.set_class_name("error");
    let _ = error_line.style().set_property("color", "red");
    let _ = error_line.style().set_property("display", "none");
    append(&root, &error_line)?;

    let hint: HtmlElement = create(document, "p")?;
    hint.set_class_name("hint");
    hint.set_text_content(Some(KEYBOARD_HINT));
    append(&root, &hint)?;

    let chart: HtmlElement = create(document, "div")?;
    chart.set_id("chart");
    let canvas: HtmlCanvasElement = create(document, "canvas")?;
    append(&chart, &canvas)?;
    append(&root, &chart)?;

    app_root
        .append_child(&root)
        .map_err(dom_err("failed to mount into #app"))?;

    Ok(Built {
        controls: Controls {
            root,
            error_line,
            step_buttons,
        },
        picker,
        canvas,
    })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl BubbleView {
    /// Build the UI inside `#app`, install listeners and schedule the
    /// startup fetch of `config.defaultUrl`.
    ///
    /// `config` may be `undefined` or a partial configuration object.
    #[wasm_bindgen(constructor)]
    pub fn mount(config: JsValue) -> std::result::Result<BubbleView, JsValue> {
        console_error_panic_hook::set_once();

        let config: ViewerConfig = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| BubbleviewError::Config(e.to_string()))?
        };
        let app = AppState::new(&config)?;

        let window =
            web_sys::window().ok_or_else(|| BubbleviewError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| BubbleviewError::Dom("no document".into()))?;

        let built = build_dom(&document, &config)?;
        let mut surface = CanvasSurface::new(built.canvas.clone())?;
        surface.resize(
            config.chart.surface_width(),
            config.chart.surface_height(),
            window.device_pixel_ratio(),
        )?;

        let state = Rc::new(RefCell::new(SharedState {
            app,
            config,
            input: InputController,
            surface,
            plan: None,
            controls: built.controls,
            mounted: true,
            reported_error: None,
        }));
        state.borrow_mut().refresh();

        let mut listeners = Vec::new();
        {
            let state = Rc::clone(&state);
            listeners.push(Listener::install(&document, "keydown", move |event| {
                events::on_key_down(&state, &event);
            })?);
        }
        {
            let state = Rc::clone(&state);
            let picker = built.picker.clone();
            listeners.push(Listener::install(&built.picker, "change", move |_event| {
                events::on_file_change(&state, &picker);
            })?);
        }
        let step_buttons: Vec<(Step, HtmlButtonElement)> =
            state.borrow().controls.step_buttons.clone();
        for (step, button) in step_buttons {
            let state = Rc::clone(&state);
            listeners.push(Listener::install(&button, "click", move |_event| {
                events::on_step(&state, step);
            })?);
        }
        {
            let state = Rc::clone(&state);
            let canvas = built.canvas.clone();
            listeners.push(Listener::install(&built.canvas, "pointermove", move |event| {
                events::on_pointer_move(&state, &canvas, &event);
            })?);
        }
        {
            let state = Rc::clone(&state);
            listeners.push(Listener::install(&built.canvas, "pointerleave", move |_event| {
                events::on_pointer_leave(&state);
            })?);
        }

        Self::schedule_startup_fetch(&state);
        tracing::info!(listeners = listeners.len(), "viewer mounted");

        Ok(BubbleView { state, listeners })
    }

    fn schedule_startup_fetch(state: &Rc<RefCell<SharedState>>) {
        let (url, delay) = {
            let s = state.borrow();
            (s.config.default_url.clone(), s.config.startup_delay_ms)
        };
        let state = Rc::downgrade(state);
        wasm_bindgen_futures::spawn_local(async move {
            fetch::sleep(delay).await;
            let result = match fetch::fetch_bytes(&url).await {
                Ok(bytes) => loader::load(&bytes),
                Err(err) => Err(err),
            };
            let Some(state) = state.upgrade() else {
                return;
            };
            let mut s = state.borrow_mut();
            if !s.mounted {
                return;
            }
            let transition = s.app.apply_load(result);
            s.apply(transition);
        });
    }

    /// Remove every listener and the viewer's DOM. Safe to call twice.
    pub fn unmount(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
        let mut s = self.state.borrow_mut();
        if s.mounted {
            s.mounted = false;
            s.controls.root.remove();
            tracing::info!("viewer unmounted");
        }
    }

    /// Load a workbook from bytes, as if picked in the file input.
    pub fn load(&mut self, data: &[u8]) -> std::result::Result<(), JsValue> {
        let result = loader::load(data);
        let failure = result.as_ref().err().cloned();
        let mut s = self.state.borrow_mut();
        let transition = s.app.apply_load(result);
        s.apply(transition);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn increase(&mut self) {
        let mut s = self.state.borrow_mut();
        let transition = s.app.increase();
        s.apply(transition);
    }

    pub fn decrease(&mut self) {
        let mut s = self.state.borrow_mut();
        let transition = s.app.decrease();
        s.apply(transition);
    }

    #[wasm_bindgen(js_name = "setStep")]
    pub fn set_step(&mut self, step: u32) -> std::result::Result<(), JsValue> {
        let step = Step::try_from(step)?;
        let mut s = self.state.borrow_mut();
        let transition = s.app.set_step(step);
        s.apply(transition);
        Ok(())
    }

    #[wasm_bindgen(js_name = "visibleCount")]
    pub fn visible_count(&self) -> usize {
        self.state.borrow().app.visible_count()
    }

    #[wasm_bindgen(js_name = "totalCount")]
    pub fn total_count(&self) -> usize {
        self.state.borrow().app.total_count()
    }

    #[wasm_bindgen(js_name = "isLoaded")]
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().app.is_loaded()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().app.error().map(str::to_string)
    }

    /// The current chart as an SVG document.
    pub fn svg(&self) -> std::result::Result<String, JsValue> {
        let s = self.state.borrow();
        Ok(export_svg(&s.app, &s.config.chart)?)
    }

    /// The loaded records as plain JS objects (`{X, Y, R, Name, Note?}`).
    pub fn dataset(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.state.borrow().app.dataset())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for BubbleView {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ============================================================================
// Non-WASM32 Implementation (CLI and tests)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl BubbleView {
    /// A viewer that renders into an in-memory SVG document.
    ///
    /// # Errors
    /// [`crate::error::BubbleviewError::InvalidStep`] for an unsupported
    /// `initial_step`.
    pub fn new_headless(config: ViewerConfig) -> Result<Self> {
        let app = AppState::new(&config)?;
        let surface = SvgSurface::new(config.chart.surface_width(), config.chart.surface_height());
        let mut view = Self {
            app,
            config,
            surface,
            plan: None,
        };
        view.refresh()?;
        Ok(view)
    }

    fn refresh(&mut self) -> Result<()> {
        self.plan = redraw(&mut self.surface, &self.app, &self.config.chart)?;
        Ok(())
    }

    fn apply(&mut self, transition: crate::app::Transition) -> Result<()> {
        if transition.needs_redraw() {
            self.refresh()?;
        }
        Ok(())
    }

    /// Load a payload. The state records the outcome either way; the error is
    /// also returned for callers that want to stop.
    ///
    /// # Errors
    /// The load failure, or a render failure afterwards.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let result = crate::loader::load(data);
        let failure = result.as_ref().err().cloned();
        let transition = self.app.apply_load(result);
        self.apply(transition)?;
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Record a failed startup fetch (e.g. HTTP 404).
    ///
    /// # Errors
    /// Render failure only.
    pub fn fail_startup_fetch(&mut self, status: Option<u16>, message: &str) -> Result<()> {
        let transition = self.app.apply_fetch_failure(status, message);
        self.apply(transition)
    }

    /// # Errors
    /// Render failure only.
    pub fn increase(&mut self) -> Result<()> {
        let transition = self.app.increase();
        self.apply(transition)
    }

    /// # Errors
    /// Render failure only.
    pub fn decrease(&mut self) -> Result<()> {
        let transition = self.app.decrease();
        self.apply(transition)
    }

    /// # Errors
    /// [`crate::error::BubbleviewError::InvalidStep`] for values outside 1, 5, 10, 100.
    pub fn set_step(&mut self, step: u32) -> Result<()> {
        let step = crate::window::Step::try_from(step)?;
        let transition = self.app.set_step(step);
        self.apply(transition)
    }

    /// Route a `KeyboardEvent.key` value as the browser listener would.
    ///
    /// # Errors
    /// Render failure only.
    pub fn key(&mut self, key: &str) -> Result<()> {
        let transition = crate::input::InputController.handle_key(&mut self.app, key);
        self.apply(transition)
    }

    /// Move the pointer to `(x, y)` in chart coordinates.
    ///
    /// # Errors
    /// Render failure only.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<()> {
        let hit = self.plan.as_ref().and_then(|plan| plan.hit_test(x, y));
        let transition = self.app.hover(hit);
        self.apply(transition)
    }

    /// # Errors
    /// Render failure only.
    pub fn pointer_leave(&mut self) -> Result<()> {
        let transition = self.app.hover(None);
        self.apply(transition)
    }

    pub fn visible_count(&self) -> usize {
        self.app.visible_count()
    }

    pub fn total_count(&self) -> usize {
        self.app.total_count()
    }

    pub fn is_loaded(&self) -> bool {
        self.app.is_loaded()
    }

    pub fn error(&self) -> Option<&str> {
        self.app.error()
    }

    pub fn state(&self) -> &AppState {
        &self.app
    }

    /// Layout of the last frame, if anything was drawn.
    pub fn plan(&self) -> Option<&ChartPlan> {
        self.plan.as_ref()
    }

    /// The last rendered frame.
    pub fn svg(&self) -> &str {
        self.surface.svg()
    }
}
