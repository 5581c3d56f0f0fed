//! WebAssembly entry point and the `window.DarkMode` global.
//!
//! On start the module builds one [`ThemeController`] for the page, publishes
//! it under [`ThemeConfig::global_name`], and initialises it once the document
//! is ready. Page scripts use the exported [`DarkMode`] methods.
//!
//! A page gets at most one controller: [`install`] returns the existing one on
//! every call after the first, whatever config it is given.

use std::cell::OnceCell;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Event};

use crate::config::ThemeConfig;
use crate::consts::HANDLER_ERROR_LEVEL;
use crate::controller::ThemeController;
use crate::dom::{self, BodyMarker, ChangeListener, Checkbox, FrameScheduler};
use crate::storage;

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

/// Controller type used in the browser.
pub type PageController = ThemeController<Checkbox>;

thread_local! {
    static INSTALLED: OnceCell<PageController> = const { OnceCell::new() };
}

/// Script-facing namespace object.
#[wasm_bindgen]
pub struct DarkMode {
    controller: PageController,
    document: Document,
    event_name: String,
}

#[wasm_bindgen]
impl DarkMode {
    /// Whether `<body>` currently carries the dark class.
    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.controller.is_dark()
    }

    /// Apply the truthiness of `value`, persisting and notifying.
    #[wasm_bindgen(js_name = setDark)]
    pub fn set_dark(&self, value: JsValue) {
        self.controller.set_dark(value.is_truthy());
    }

    pub fn toggle(&self) {
        self.controller.toggle();
    }

    /// Call `handler(isDark, event)` on every change event. Non-functions are
    /// ignored.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, handler: JsValue) {
        let Ok(handler) = handler.dyn_into::<js_sys::Function>() else {
            return;
        };
        let listener = Closure::wrap(Box::new(move |event: Event| {
            let is_dark = JsValue::from_bool(dom::event_is_dark(&event));
            if let Err(err) = handler.call2(&JsValue::NULL, &is_dark, &event) {
                log::log!(HANDLER_ERROR_LEVEL, "darkmode: change handler threw: {err:?}");
            }
        }) as Box<dyn FnMut(Event)>);
        if let Err(err) = self
            .document
            .add_event_listener_with_callback(&self.event_name, listener.as_ref().unchecked_ref())
        {
            log::debug!("darkmode: cannot subscribe: {err:?}");
            return;
        }
        // Subscriptions last for the life of the page.
        listener.forget();
    }

    /// Register an element added after load. `null`, `undefined` and
    /// non-elements are ignored.
    #[wasm_bindgen(js_name = syncCheckbox)]
    pub fn sync_checkbox(&self, element: JsValue) {
        self.controller.sync_control(Checkbox::from_js(element));
    }
}

#[cfg(feature = "auto-start")]
#[wasm_bindgen(start)]
pub fn start() {
    install(ThemeConfig::default());
}

/// Build the page controller, publish the global, and schedule
/// initialisation. Returns `None` outside a browser document.
///
/// Only the first successful call builds anything; later calls return the
/// installed controller and ignore `config`.
pub fn install(config: ThemeConfig) -> Option<PageController> {
    INSTALLED.with(|slot| install_once(slot, || build(config)))
}

/// Return the value in `slot`, or fill it from `build`. A failed build leaves
/// the slot empty so a later call can try again.
fn install_once<T: Clone>(slot: &OnceCell<T>, build: impl FnOnce() -> Option<T>) -> Option<T> {
    if let Some(existing) = slot.get() {
        log::debug!("darkmode: already installed");
        return Some(existing.clone());
    }
    let built = build()?;
    Some(slot.get_or_init(|| built).clone())
}

fn build(config: ThemeConfig) -> Option<PageController> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(config.log_level) {
        log::debug!("darkmode: logger already installed: {err}");
    }

    let Some(window) = web_sys::window() else {
        log::warn!("darkmode: no window; not installing");
        return None;
    };
    let Some(document) = window.document() else {
        log::warn!("darkmode: no document; not installing");
        return None;
    };

    let controller = PageController::new(
        storage::open_default(),
        Box::new(BodyMarker::new(document.clone(), &config.dark_class)),
    );
    controller.set_responder(ChangeListener::new(controller.change_responder()));

    let event_document = document.clone();
    let event_name = config.event_name.clone();
    controller.on_change(move |_, change| dom::dispatch_change(&event_document, &event_name, change));

    publish(&window, &config, &controller, &document);
    schedule_initialise(window, document, config.checkbox_selector, controller.clone());

    log::info!("darkmode: installed as window.{}", config.global_name);
    Some(controller)
}

fn publish(window: &web_sys::Window, config: &ThemeConfig, controller: &PageController, document: &Document) {
    let global = DarkMode {
        controller: controller.clone(),
        document: document.clone(),
        event_name: config.event_name.clone(),
    };
    if let Err(err) = js_sys::Reflect::set(window, &config.global_name.as_str().into(), &global.into()) {
        log::warn!("darkmode: cannot publish window.{}: {err:?}", config.global_name);
    }
}

/// Run initialisation now if the document is already parsed, otherwise on
/// `DOMContentLoaded`.
fn schedule_initialise(window: web_sys::Window, document: Document, selector: String, controller: PageController) {
    let ready = document.ready_state() != "loading";
    let target = document.clone();
    let run = move || {
        let controls = dom::scan_controls(&document, &selector);
        controller.initialise(controls, &FrameScheduler::new(Some(window)));
    };

    if ready {
        run();
        return;
    }
    let callback = Closure::once_into_js(run);
    if let Err(err) = target.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref()) {
        log::warn!("darkmode: cannot wait for DOMContentLoaded: {err:?}");
    }
}
