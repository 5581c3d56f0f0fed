//! In-memory page fakes for driving the controller without a browser.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use darkmode::error::StorageError;
use darkmode::storage::{MemoryStore, PreferenceStore};
use darkmode::surface::{Control, Marker, Scheduler};
use darkmode::{ThemeChange, ThemeController};

/// Store shared between the test and the controller, with per-key write failures.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Rc<MemoryStore>,
    failing_writes: Rc<RefCell<HashSet<String>>>,
}

impl SharedStore {
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self { inner: Rc::new(MemoryStore::with_entries(entries.iter().copied())), ..Self::default() }
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.borrow_mut().insert(key.to_owned());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.value(key)
    }
}

impl PreferenceStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_writes.borrow().contains(key) {
            return Err(StorageError::Write { key: key.to_owned(), message: "QuotaExceededError".to_owned() });
        }
        self.inner.set(key, value)
    }
}

/// Body class marker.
#[derive(Clone, Default)]
pub struct Body(Rc<Cell<bool>>);

impl Body {
    pub fn has_class(&self) -> bool {
        self.0.get()
    }
}

impl Marker for Body {
    fn set_marked(&self, on: bool) {
        self.0.set(on);
    }

    fn is_marked(&self) -> bool {
        self.0.get()
    }
}

pub type Responder = Rc<dyn Fn(bool)>;

#[derive(Default)]
struct CheckboxState {
    checked: Cell<bool>,
    listeners: RefCell<Vec<Responder>>,
}

/// Checkbox element. Clones share identity.
#[derive(Clone, Default)]
pub struct FakeCheckbox(Rc<CheckboxState>);

impl PartialEq for FakeCheckbox {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FakeCheckbox {
    /// Simulate the user clicking the box to `checked`: the property changes,
    /// then `change` listeners fire.
    pub fn click_to(&self, checked: bool) {
        self.0.checked.set(checked);
        let listeners = self.0.listeners.borrow().clone();
        for listener in listeners {
            listener(checked);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }
}

impl Control for FakeCheckbox {
    type Responder = Responder;

    fn set_checked(&self, checked: bool) {
        self.0.checked.set(checked);
    }

    fn is_checked(&self) -> bool {
        self.0.checked.get()
    }

    fn rebind(&self, responder: &Responder) {
        let mut listeners = self.0.listeners.borrow_mut();
        listeners.retain(|l| !Rc::ptr_eq(l, responder));
        listeners.push(Rc::clone(responder));
    }
}

/// Animation-frame queue flushed by the test.
#[derive(Default)]
pub struct FrameQueue(RefCell<Vec<Box<dyn FnOnce()>>>);

impl FrameQueue {
    pub fn pending(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn flush(&self) {
        let tasks = self.0.take();
        for task in tasks {
            task();
        }
    }
}

impl Scheduler for FrameQueue {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        self.0.borrow_mut().push(task);
    }
}

/// A page: body, store, frame queue and a controller wired like the browser build.
pub struct Page {
    pub body: Body,
    pub store: SharedStore,
    pub frames: FrameQueue,
    pub controller: ThemeController<FakeCheckbox>,
    pub events: Rc<RefCell<Vec<ThemeChange>>>,
}

impl Page {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let body = Body::default();
        let store = SharedStore::with_entries(entries);
        let controller = ThemeController::new(Box::new(store.clone()), Box::new(body.clone()));
        let responder: Responder = Rc::new(controller.change_responder());
        controller.set_responder(responder);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        controller.on_change(move |_, change| sink.borrow_mut().push(*change));

        Self { body, store, frames: FrameQueue::default(), controller, events }
    }

    /// Run initialisation over `boxes` and flush the first animation frame.
    pub fn load(&self, boxes: &[FakeCheckbox]) {
        self.controller.initialise(boxes.iter().cloned().map(Some), &self.frames);
        self.frames.flush();
    }

    pub fn event_log(&self) -> Vec<bool> {
        self.events.borrow().iter().map(|c| c.is_dark).collect()
    }
}
