//! Nebula Core
//!
//! The host-facing half of the focus indicator:
//!
//! - **Geometry**: integer element boxes, visible regions, and insets
//! - **Host capabilities**: the minimal traits a UI element, overlay layer, or
//!   scrollable container must implement to be tracked
//! - **Event registration**: a single-threaded listener registry hosts can
//!   embed to deliver focus, pre-draw, and scroll notifications
//!
//! Nothing here knows about animation; see `nebula_animation` and
//! `nebula_focus` for the parts that move the indicator.

pub mod events;
pub mod geometry;
pub mod host;

pub use events::{
    scroll_events, EventHub, FocusListener, ListenerId, PreDrawListener, ScrollEvent,
    ScrollListener, ScrollState,
};
pub use geometry::{Bounds, Insets, IntRect, Point};
pub use host::{
    ElementId, ElementRef, OverlayFrame, OverlayRef, Positionable, Scrollable, ScrollableRef,
};
