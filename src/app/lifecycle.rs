//! Open/close lifecycle and outside-interaction dismissal.
//!
//! [`Lifecycle`] owns whether the menu is visible. While open it holds an
//! [`OutsideListener`], a scoped subscription to the host's global pointer-down
//! stream. The subscription is acquired on the transition to open and released
//! when the guard drops: on close, on [`Lifecycle::teardown`], or when the
//! lifecycle itself is dropped. At most one subscription exists per lifecycle.
//!
//! Hosts that drive several controls can use [`ListenerRegistry`] as their
//! [`PointerHub`] and forward each global pointer-down only to the controls
//! whose listener is active.

use super::modes::OpenState;
use crate::domain::{Boundary, Point};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Handle for one global pointer-down subscription.
pub type ListenerId = u64;

/// Source of global pointer-down interactions.
///
/// Implemented by the host; the lifecycle only subscribes and unsubscribes.
pub trait PointerHub {
    fn subscribe(&self) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
}

/// A live subscription, released on drop.
pub struct OutsideListener {
    hub: Rc<dyn PointerHub>,
    id: ListenerId,
}

impl OutsideListener {
    fn acquire(hub: &Rc<dyn PointerHub>) -> Self {
        let id = hub.subscribe();
        tracing::trace!(listener_id = id, "outside listener attached");
        Self {
            hub: Rc::clone(hub),
            id,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for OutsideListener {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
        tracing::trace!(listener_id = self.id, "outside listener detached");
    }
}

impl fmt::Debug for OutsideListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutsideListener")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// In-process [`PointerHub`] that tracks which subscriptions are live.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: Cell<ListenerId>,
    active: RefCell<BTreeSet<ListenerId>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self, id: ListenerId) -> bool {
        self.active.borrow().contains(&id)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    /// Snapshot of live subscriptions, in subscription order.
    #[must_use]
    pub fn active(&self) -> Vec<ListenerId> {
        self.active.borrow().iter().copied().collect()
    }
}

impl PointerHub for ListenerRegistry {
    fn subscribe(&self) -> ListenerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.active.borrow_mut().insert(id);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.active.borrow_mut().remove(&id);
    }
}

/// Callback run after the menu transitions to closed.
pub type CloseHook = Box<dyn FnMut()>;

/// Open/close state machine with outside-click detection.
#[derive(Default)]
pub struct Lifecycle {
    state: OpenState,
    boundary: Boundary,
    hub: Option<Rc<dyn PointerHub>>,
    listener: Option<OutsideListener>,
    on_close: Option<CloseHook>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `hub` for the outside-interaction subscription.
    #[must_use]
    pub fn with_hub(mut self, hub: Rc<dyn PointerHub>) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Registers a hook run on every transition to closed.
    #[must_use]
    pub fn with_close_hook(mut self, hook: CloseHook) -> Self {
        self.on_close = Some(hook);
        self
    }

    #[must_use]
    pub const fn state(&self) -> OpenState {
        self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether an outside-interaction subscription is currently held.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    #[must_use]
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener.as_ref().map(OutsideListener::id)
    }

    #[must_use]
    pub const fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Records where the control is currently rendered.
    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    /// Opens the menu. Returns `false` if it was already open.
    pub fn open(&mut self) -> bool {
        if self.state.is_open() {
            return false;
        }
        self.state = OpenState::Open;
        self.listener = self.hub.as_ref().map(OutsideListener::acquire);
        tracing::debug!("menu opened");
        true
    }

    /// Closes the menu. Returns `false` if it was already closed.
    ///
    /// The close hook only runs on an actual transition.
    pub fn close(&mut self) -> bool {
        if !self.state.is_open() {
            return false;
        }
        self.state = OpenState::Closed;
        self.listener = None;
        tracing::debug!("menu closed");
        if let Some(hook) = self.on_close.as_mut() {
            hook();
        }
        true
    }

    /// Closes if open, opens if closed. Returns the resulting state.
    pub fn toggle(&mut self) -> OpenState {
        if self.state.is_open() {
            self.close();
        } else {
            self.open();
        }
        self.state
    }

    /// Handles a global pointer-down. Returns `true` if it closed the menu.
    ///
    /// Until the host reports a layout nothing counts as outside, so a press
    /// on an option that was never measured cannot dismiss the menu.
    pub fn pointer_down(&mut self, position: Point) -> bool {
        if !self.state.is_open() || self.boundary.contains(position) {
            return false;
        }
        if !self.boundary.is_known() {
            tracing::debug!(x = position.x, y = position.y, "pointer down ignored, layout unknown");
            return false;
        }
        tracing::debug!(x = position.x, y = position.y, "pointer down outside control");
        self.close()
    }

    /// Releases the subscription and returns to closed without running the hook.
    pub fn teardown(&mut self) {
        self.listener = None;
        self.state = OpenState::Closed;
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("state", &self.state)
            .field("boundary", &self.boundary)
            .field("listener", &self.listener)
            .field("has_close_hook", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}
