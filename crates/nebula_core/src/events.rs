//! Event registration and dispatch
//!
//! Hosts deliver three kinds of notifications to the core: focus changes,
//! pre-draw ticks, and per-container scroll events. [`EventHub`] is a ready
//! made registry a host can embed in its overlay frame or scroll containers
//! to satisfy the [`OverlayFrame`](crate::host::OverlayFrame) and
//! [`Scrollable`](crate::host::Scrollable) subscription methods.
//!
//! Everything here is single-threaded. Dispatch never holds the registry
//! borrow while a callback runs, so callbacks may add or remove listeners
//! (including themselves).

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::host::ElementRef;

new_key_type! {
    /// Handle returned by every `add_*_listener` call
    pub struct ListenerId;
}

/// Focus moved from `previous` to `current`
pub type FocusListener = Box<dyn FnMut(Option<&ElementRef>, Option<&ElementRef>)>;

/// Called once per frame, before the frame is drawn
pub type PreDrawListener = Box<dyn FnMut()>;

/// Scroll notification for one container
pub type ScrollListener = Box<dyn FnMut(&ScrollEvent)>;

// ============================================================================
// Scroll State
// ============================================================================

/// Scroll-state events, in the vocabulary of [`ScrollState::on_event`]
pub mod scroll_events {
    /// User started dragging the content
    pub const DRAG_START: u32 = 1;
    /// Content started moving on its own (fling or programmatic smooth scroll)
    pub const FLING_START: u32 = 2;
    /// Content came to rest
    pub const SETTLED: u32 = 3;
}

/// Scroll state of a single container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollState {
    #[default]
    Idle,
    /// Content follows the user's finger
    Dragging,
    /// Content moves without user input
    Settling,
}

impl ScrollState {
    /// True in Dragging and Settling
    pub fn is_scrolling(&self) -> bool {
        !matches!(self, ScrollState::Idle)
    }

    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: u32) -> Option<Self> {
        use scroll_events::*;
        match (self, event) {
            (ScrollState::Idle, DRAG_START) => Some(ScrollState::Dragging),
            (ScrollState::Idle, FLING_START) => Some(ScrollState::Settling),
            (ScrollState::Dragging, FLING_START) => Some(ScrollState::Settling),
            (ScrollState::Settling, DRAG_START) => Some(ScrollState::Dragging),
            (ScrollState::Dragging, SETTLED) => Some(ScrollState::Idle),
            (ScrollState::Settling, SETTLED) => Some(ScrollState::Idle),
            _ => None,
        }
    }
}

/// What a scroll container reports to its listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    StateChanged(ScrollState),
    /// Content moved by this many pixels since the previous notification
    Scrolled { delta_x: i32, delta_y: i32 },
}

// ============================================================================
// Event Hub
// ============================================================================

enum Listener {
    Focus(Rc<RefCell<FocusListener>>),
    PreDraw(Rc<RefCell<PreDrawListener>>),
    Scroll(Rc<RefCell<ScrollListener>>),
}

/// Listener registry with generational ids.
///
/// A stale [`ListenerId`] never removes a listener registered later in the
/// same slot.
#[derive(Default)]
pub struct EventHub {
    listeners: RefCell<SlotMap<ListenerId, Listener>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_focus_listener(&self, listener: FocusListener) -> ListenerId {
        self.insert(Listener::Focus(Rc::new(RefCell::new(listener))))
    }

    pub fn add_pre_draw_listener(&self, listener: PreDrawListener) -> ListenerId {
        self.insert(Listener::PreDraw(Rc::new(RefCell::new(listener))))
    }

    pub fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId {
        self.insert(Listener::Scroll(Rc::new(RefCell::new(listener))))
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains_key(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Deliver a focus change to every focus listener
    pub fn dispatch_focus_change(&self, previous: Option<&ElementRef>, current: Option<&ElementRef>) {
        let targets: SmallVec<[_; 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter_map(|(id, listener)| match listener {
                Listener::Focus(cb) => Some((id, Rc::clone(cb))),
                _ => None,
            })
            .collect();

        for (id, cb) in targets {
            if !self.contains(id) {
                continue;
            }
            match cb.try_borrow_mut() {
                Ok(mut cb) => (*cb)(previous, current),
                Err(_) => tracing::trace!(?id, "skipping re-entrant focus listener"),
            }
        }
    }

    /// Deliver a pre-draw tick to every pre-draw listener
    pub fn dispatch_pre_draw(&self) {
        let targets: SmallVec<[_; 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter_map(|(id, listener)| match listener {
                Listener::PreDraw(cb) => Some((id, Rc::clone(cb))),
                _ => None,
            })
            .collect();

        for (id, cb) in targets {
            if !self.contains(id) {
                continue;
            }
            match cb.try_borrow_mut() {
                Ok(mut cb) => (*cb)(),
                Err(_) => tracing::trace!(?id, "skipping re-entrant pre-draw listener"),
            }
        }
    }

    /// Deliver a scroll event to every scroll listener
    pub fn dispatch_scroll(&self, event: ScrollEvent) {
        let targets: SmallVec<[_; 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter_map(|(id, listener)| match listener {
                Listener::Scroll(cb) => Some((id, Rc::clone(cb))),
                _ => None,
            })
            .collect();

        for (id, cb) in targets {
            if !self.contains(id) {
                continue;
            }
            match cb.try_borrow_mut() {
                Ok(mut cb) => (*cb)(&event),
                Err(_) => tracing::trace!(?id, "skipping re-entrant scroll listener"),
            }
        }
    }

    fn insert(&self, listener: Listener) -> ListenerId {
        self.listeners.borrow_mut().insert(listener)
    }
}
