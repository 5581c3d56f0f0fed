//! Seams between the controller and the page.
//!
//! The browser implementations live in [`crate::dom`]; tests provide in-memory
//! ones. All calls happen on the UI thread, so nothing here is `Send`.

/// The dark-mode marker on the document body.
pub trait Marker {
    /// Add (`true`) or remove (`false`) the marker.
    fn set_marked(&self, on: bool);
    /// Whether the marker is currently present.
    fn is_marked(&self) -> bool;
}

/// A checkbox-like control kept in sync with the dark-mode state.
///
/// Equality is identity: two values compare equal when they refer to the same
/// element.
pub trait Control: Clone + PartialEq {
    /// Handle attached to the control's change notifications.
    type Responder;

    fn set_checked(&self, checked: bool);
    fn is_checked(&self) -> bool;

    /// Attach `responder` to the control's change notifications, detaching it
    /// first so repeated calls leave exactly one attachment.
    fn rebind(&self, responder: &Self::Responder);
}

/// One-shot deferral of work past the current synchronous turn.
pub trait Scheduler {
    /// Run `task` exactly once, later. There is no cancellation.
    fn defer(&self, task: Box<dyn FnOnce()>);
}
