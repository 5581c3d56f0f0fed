//! Theme controller: the single owner of the dark-mode state.
//!
//! [`ThemeCore`] holds everything (store, body marker, registered controls,
//! observers) and performs the apply step without touching observers.
//! [`ThemeController`] is the cheap, cloneable handle handed to the page. It
//! runs observers only after releasing its borrow of the core, so a
//! subscriber may call back into the controller.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::preference::{self, ThemePreference};
use crate::storage::PreferenceStore;
use crate::surface::{Control, Marker, Scheduler};

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

/// Flags accepted by [`ThemeController::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Leave the persisted preference untouched.
    pub skip_persist: bool,
    /// Do not notify observers.
    pub skip_event: bool,
}

impl ApplyOptions {
    /// Options used during initialisation: no write, no notification.
    #[must_use]
    pub fn silent() -> Self {
        Self { skip_persist: true, skip_event: true }
    }
}

/// Payload of a change notification. Serializes as `{"isDark": bool}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChange {
    pub is_dark: bool,
}

impl ThemeChange {
    /// JSON form used as the `detail` of the DOM event.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for this payload in
    /// practice.
    pub fn detail_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

type Observer = Rc<dyn Fn(bool, &ThemeChange)>;

/// Controller state. Browser-independent so it can be tested on the host.
pub struct ThemeCore<C: Control> {
    store: Box<dyn PreferenceStore>,
    marker: Box<dyn Marker>,
    controls: Vec<C>,
    responder: Option<C::Responder>,
    observers: Vec<Observer>,
    initialised: bool,
}

impl<C: Control> ThemeCore<C> {
    #[must_use]
    pub fn new(store: Box<dyn PreferenceStore>, marker: Box<dyn Marker>) -> Self {
        Self { store, marker, controls: Vec::new(), responder: None, observers: Vec::new(), initialised: false }
    }

    /// Live state, read from the body marker.
    pub fn is_dark(&self) -> bool {
        self.marker.is_marked()
    }

    pub fn stored_preference(&self) -> ThemePreference {
        preference::read_preference(self.store.as_ref())
    }

    /// Write `is_dark` under every storage key. Returns the number written.
    pub fn persist_preference(&self, is_dark: bool) -> usize {
        preference::persist_preference(self.store.as_ref(), is_dark)
    }

    /// Registered controls, in registration order.
    pub fn controls(&self) -> &[C] {
        &self.controls
    }

    /// Add `control` (if new), set it to `checked`, and (re)attach the change
    /// responder. Returns `true` if the control was not registered before.
    pub fn register(&mut self, control: C, checked: bool) -> bool {
        control.set_checked(checked);
        if let Some(responder) = &self.responder {
            control.rebind(responder);
        }
        if self.controls.contains(&control) {
            return false;
        }
        self.controls.push(control);
        true
    }

    /// Set the marker, sync every control, and persist unless skipped.
    ///
    /// Returns the notification to deliver, or `None` when `skip_event` is set.
    pub fn apply(&mut self, is_dark: bool, options: ApplyOptions) -> Option<ThemeChange> {
        self.marker.set_marked(is_dark);
        for control in &self.controls {
            control.set_checked(is_dark);
        }
        if !options.skip_persist {
            self.persist_preference(is_dark);
        }
        (!options.skip_event).then_some(ThemeChange { is_dark })
    }
}

/// Shared handle to a [`ThemeCore`]. Clones refer to the same state.
pub struct ThemeController<C: Control> {
    core: Rc<RefCell<ThemeCore<C>>>,
}

impl<C: Control> Clone for ThemeController<C> {
    fn clone(&self) -> Self {
        Self { core: Rc::clone(&self.core) }
    }
}

impl<C: Control + 'static> ThemeController<C> {
    /// Build a controller over `store` and `marker`. No state is read or
    /// written until [`Self::initialise`] or an apply call.
    #[must_use]
    pub fn new(store: Box<dyn PreferenceStore>, marker: Box<dyn Marker>) -> Self {
        Self { core: Rc::new(RefCell::new(ThemeCore::new(store, marker))) }
    }

    // --- Queries ---

    /// Current state, derived from the body marker on every call.
    pub fn is_dark(&self) -> bool {
        self.core.borrow().is_dark()
    }

    /// Preference currently held in storage.
    pub fn stored_preference(&self) -> ThemePreference {
        self.core.borrow().stored_preference()
    }

    /// Snapshot of the registered controls.
    pub fn controls(&self) -> Vec<C> {
        self.core.borrow().controls().to_vec()
    }

    // --- State changes ---

    /// Apply `is_dark` to the marker, the controls, storage (unless skipped)
    /// and observers (unless skipped).
    pub fn apply(&self, is_dark: bool, options: ApplyOptions) {
        let change = self.core.borrow_mut().apply(is_dark, options);
        if let Some(change) = change {
            self.notify(change);
        }
    }

    /// Apply with default options: persist and notify.
    pub fn set_dark(&self, is_dark: bool) {
        self.apply(is_dark, ApplyOptions::default());
    }

    /// Apply the opposite of the current state.
    pub fn toggle(&self) {
        let next = !self.is_dark();
        self.set_dark(next);
    }

    /// Write `is_dark` under every storage key, independent of [`Self::apply`].
    pub fn persist_preference(&self, is_dark: bool) -> usize {
        self.core.borrow().persist_preference(is_dark)
    }

    // --- Observers ---

    /// Subscribe to change notifications. Handlers run in registration order
    /// and cannot be removed.
    pub fn on_change(&self, handler: impl Fn(bool, &ThemeChange) + 'static) {
        self.core.borrow_mut().observers.push(Rc::new(handler));
    }

    /// Deliver `change` to every observer registered at the time of the call.
    pub fn notify(&self, change: ThemeChange) {
        let observers = self.core.borrow().observers.clone();
        for observer in observers {
            observer(change.is_dark, &change);
        }
    }

    // --- Controls ---

    /// Closure to run when a registered control changes through user
    /// interaction. Applies the control's new state with default options.
    pub fn change_responder(&self) -> impl Fn(bool) + use<C> + 'static {
        let weak = Rc::downgrade(&self.core);
        move |checked| {
            if let Some(core) = weak.upgrade() {
                Self { core }.set_dark(checked);
            }
        }
    }

    /// Install the responder attached to every control registered from now on.
    pub fn set_responder(&self, responder: C::Responder) {
        self.core.borrow_mut().responder = Some(responder);
    }

    /// Register a control that arrived after initialisation. `None` is ignored.
    pub fn sync_control(&self, control: Option<C>) {
        let Some(control) = control else {
            return;
        };
        let checked = self.is_dark();
        if self.core.borrow_mut().register(control, checked) {
            log::debug!("darkmode: control registered");
        }
    }

    // --- Lifecycle ---

    /// Page-ready initialisation.
    ///
    /// Resolves the stored preference, registers `controls` (skipping `None`),
    /// applies the result silently, rewrites every storage key, and defers the
    /// first notification through `scheduler`.
    ///
    /// Runs at most once per controller. Later calls do nothing and return
    /// `None`; use [`Self::sync_control`] for controls that arrive afterwards.
    pub fn initialise(
        &self,
        controls: impl IntoIterator<Item = Option<C>>,
        scheduler: &dyn Scheduler,
    ) -> Option<ThemePreference> {
        if std::mem::replace(&mut self.core.borrow_mut().initialised, true) {
            log::debug!("darkmode: already initialised");
            return None;
        }

        let preference = self.stored_preference();
        let start_dark = preference.is_dark();

        {
            let mut core = self.core.borrow_mut();
            for control in controls.into_iter().flatten() {
                core.register(control, start_dark);
            }
            log::debug!("darkmode: {} control(s) found at load", core.controls().len());
        }

        self.apply(start_dark, ApplyOptions::silent());
        self.persist_preference(start_dark);

        let controller = self.clone();
        scheduler.defer(Box::new(move || controller.notify(ThemeChange { is_dark: start_dark })));

        log::info!("darkmode: initialised ({preference:?}, dark={start_dark})");
        Some(preference)
    }
}
