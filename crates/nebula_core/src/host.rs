//! Host capability traits
//!
//! The core never sees a concrete UI element type. Anything the host wants
//! tracked implements [`Positionable`]; the layer the indicator is drawn into
//! implements [`OverlayFrame`]; lists that should switch the indicator into
//! hard-follow while they scroll implement [`Scrollable`].
//!
//! All queries are read-only snapshots. The core calls them at each decision
//! point and never caches the answers across frames.

use std::fmt;
use std::rc::Rc;

use crate::events::{FocusListener, ListenerId, PreDrawListener, ScrollListener};
use crate::geometry::{Bounds, IntRect};

/// Stable identity of a host element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The minimal view of a host element the core depends on
pub trait Positionable {
    /// Identity used to tell elements apart (self/overlay exclusion, container
    /// bookkeeping)
    fn element_id(&self) -> ElementId;

    /// Absolute bounding box, or `None` while the element is not laid out
    fn bounds(&self) -> Option<Bounds>;

    /// The host's own visibility flag
    fn is_visible(&self) -> bool;

    /// The part of the element not clipped away by its ancestors, relative to
    /// the element's own origin. `None` means fully invisible.
    fn visible_region(&self) -> Option<IntRect>;
}

/// Shared handle to a host element
pub type ElementRef = Rc<dyn Positionable>;

/// The layer the indicator lives in. It is also where focus-change and
/// pre-draw notifications are subscribed.
pub trait OverlayFrame: Positionable {
    fn add_focus_listener(&self, listener: FocusListener) -> ListenerId;

    /// The listener runs once before each frame is presented
    fn add_pre_draw_listener(&self, listener: PreDrawListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

pub type OverlayRef = Rc<dyn OverlayFrame>;

/// A container whose scrolling should toggle the indicator's follow mode
pub trait Scrollable: Positionable {
    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId;

    fn remove_scroll_listener(&self, id: ListenerId);
}

pub type ScrollableRef = Rc<dyn Scrollable>;
