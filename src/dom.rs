//! Browser implementations of the controller seams.
//!
//! This module is the only place (with [`crate::bindings`]) that touches
//! `web_sys`. DOM calls that can throw are checked; failures are logged at
//! debug level and otherwise ignored.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, Window};

use crate::controller::ThemeChange;
use crate::surface::{Control, Marker, Scheduler};

/// Property read and written on controls and in event details.
const CHECKED_PROP: &str = "checked";
const DETAIL_PROP: &str = "isDark";
const CONTROL_EVENT: &str = "change";

// ── Body marker ─────────────────────────────────────────────────

/// Class marker on `document.body`, resolved on every call so a script loaded
/// before `<body>` exists still works once it does.
pub struct BodyMarker {
    document: Document,
    class: String,
}

impl BodyMarker {
    #[must_use]
    pub fn new(document: Document, class: &str) -> Self {
        Self { document, class: class.to_owned() }
    }
}

impl Marker for BodyMarker {
    fn set_marked(&self, on: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        if let Err(err) = body.class_list().toggle_with_force(&self.class, on) {
            log::debug!("darkmode: class toggle failed: {err:?}");
        }
    }

    fn is_marked(&self) -> bool {
        self.document.body().is_some_and(|body| body.class_list().contains(&self.class))
    }
}

// ── Controls ────────────────────────────────────────────────────

/// Change listener shared by every registered checkbox.
pub struct ChangeListener(Closure<dyn FnMut(Event)>);

impl ChangeListener {
    /// Wrap `respond`, which receives the control's new checked state.
    pub fn new(respond: impl Fn(bool) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let checked = event
                .target()
                .and_then(|target| Checkbox::from_js(target.into()))
                .is_some_and(|checkbox| checkbox.is_checked());
            respond(checked);
        }) as Box<dyn FnMut(Event)>);
        Self(closure)
    }

    fn function(&self) -> &js_sys::Function {
        self.0.as_ref().unchecked_ref()
    }
}

/// Any element with a boolean `checked` property and a `change` event.
///
/// Equality is element identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox(Element);

impl Checkbox {
    /// Wrap a JS value if it is an element. Anything else (including
    /// `null`/`undefined`) yields `None`.
    #[must_use]
    pub fn from_js(value: JsValue) -> Option<Self> {
        match value.dyn_into::<Element>() {
            Ok(element) => Some(Self(element)),
            Err(_) => None,
        }
    }
}

impl Control for Checkbox {
    type Responder = ChangeListener;

    fn set_checked(&self, checked: bool) {
        if let Err(err) = js_sys::Reflect::set(&self.0, &CHECKED_PROP.into(), &JsValue::from_bool(checked)) {
            log::debug!("darkmode: cannot set checked: {err:?}");
        }
    }

    fn is_checked(&self) -> bool {
        js_sys::Reflect::get(&self.0, &CHECKED_PROP.into()).is_ok_and(|value| value.is_truthy())
    }

    fn rebind(&self, responder: &ChangeListener) {
        let function = responder.function();
        if let Err(err) = self.0.remove_event_listener_with_callback(CONTROL_EVENT, function) {
            log::debug!("darkmode: remove listener failed: {err:?}");
        }
        if let Err(err) = self.0.add_event_listener_with_callback(CONTROL_EVENT, function) {
            log::debug!("darkmode: add listener failed: {err:?}");
        }
    }
}

/// Every element matching `selector`, in document order.
pub fn scan_controls(document: &Document, selector: &str) -> Vec<Option<Checkbox>> {
    let nodes = match document.query_selector_all(selector) {
        Ok(nodes) => nodes,
        Err(err) => {
            log::debug!("darkmode: bad control selector {selector:?}: {err:?}");
            return Vec::new();
        }
    };
    (0..nodes.length())
        .map(|index| nodes.item(index).and_then(|node| Checkbox::from_js(node.into())))
        .collect()
}

// ── Scheduling ──────────────────────────────────────────────────

type Task = Box<dyn FnOnce()>;

/// Defers work to the next animation frame. Runs the task immediately when
/// no frame can be requested.
pub struct FrameScheduler {
    window: Option<Window>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new(window: Option<Window>) -> Self {
        Self { window }
    }
}

impl Scheduler for FrameScheduler {
    fn defer(&self, task: Task) {
        let slot: Rc<RefCell<Option<Task>>> = Rc::new(RefCell::new(Some(task)));

        if let Some(window) = &self.window {
            let slot_for_cb = Rc::clone(&slot);
            let callback = Closure::once_into_js(move |_ts: f64| {
                if let Some(task) = slot_for_cb.borrow_mut().take() {
                    task();
                }
            });
            match window.request_animation_frame(callback.unchecked_ref()) {
                Ok(_) => return,
                Err(err) => log::debug!("darkmode: requestAnimationFrame failed: {err:?}"),
            }
        }

        let task = slot.borrow_mut().take();
        if let Some(task) = task {
            task();
        }
    }
}

// ── Events ──────────────────────────────────────────────────────

/// Dispatch `change` on `document` as a `CustomEvent` named `event_name`
/// with `detail = { isDark }`.
pub fn dispatch_change(document: &Document, event_name: &str, change: &ThemeChange) {
    let detail = match change.detail_json() {
        Ok(json) => js_sys::JSON::parse(&json),
        Err(err) => {
            log::debug!("darkmode: cannot encode change detail: {err}");
            return;
        }
    };
    let detail = match detail {
        Ok(detail) => detail,
        Err(err) => {
            log::debug!("darkmode: cannot decode change detail: {err:?}");
            return;
        }
    };

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(event_name, &init) {
        Ok(event) => {
            if let Err(err) = document.dispatch_event(&event) {
                log::debug!("darkmode: dispatch {event_name} failed: {err:?}");
            }
        }
        Err(err) => log::debug!("darkmode: cannot create {event_name}: {err:?}"),
    }
}

/// `detail.isDark` of a change event. Anything malformed reads as `false`.
pub fn event_is_dark(event: &Event) -> bool {
    event
        .dyn_ref::<CustomEvent>()
        .is_some_and(|custom| js_sys::Reflect::get(&custom.detail(), &DETAIL_PROP.into()).is_ok_and(|v| v.is_truthy()))
}
