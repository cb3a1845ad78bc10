//! Nebula Focus
//!
//! A focus indicator that follows whichever element holds input focus.
//!
//! - **[`FocusTracker`]** listens for host focus, scroll, and pre-draw
//!   notifications and decides where the indicator goes
//! - **[`CursorAnimator`]** owns the indicator's visual state and moves it with
//!   two position springs and a size tween, or instantly while lists scroll
//! - **[`AnchorScroller`]** computes the scroll needed to park a focused item on
//!   a keyline of its list
//!
//! # Example
//!
//! ```rust,ignore
//! use nebula_focus::prelude::*;
//!
//! let cursor = CursorAnimator::new(cursor_element_id).shared();
//! let tracker = FocusTracker::new();
//! tracker.attach(overlay.clone(), cursor.clone());
//! tracker.attach_scrollable(list.clone());
//!
//! // Every frame, from the host's animation loop:
//! cursor.borrow_mut().tick(dt_ms);
//! let state = cursor.borrow().state().clone();
//! ```

pub mod anchor;
pub mod clip;
pub mod config;
pub mod cursor;
pub mod error;
pub mod layer;
pub mod mapper;
pub mod tracker;

pub use anchor::{AnchorConfig, AnchorScroller, DtToFit, ScrollPlan, SnapPreference};
pub use clip::compute_clip;
pub use config::{CursorConfig, FocusConfig, TrackerConfig};
pub use cursor::{AnimationConfig, CursorAnimator, CursorState, FollowMode, SharedCursor, Visibility};
pub use error::{ConfigError, Result};
pub use layer::FocusIndicatorLayer;
pub use mapper::map_to_overlay;
pub use tracker::FocusTracker;

/// Everything a host needs to wire the indicator up
pub mod prelude {
    pub use crate::anchor::{AnchorScroller, DtToFit, SnapPreference};
    pub use crate::config::FocusConfig;
    pub use crate::cursor::{CursorAnimator, CursorState, FollowMode, SharedCursor, Visibility};
    pub use crate::layer::FocusIndicatorLayer;
    pub use crate::tracker::FocusTracker;
    pub use nebula_core::{
        Bounds, ElementId, ElementRef, EventHub, Insets, IntRect, ListenerId, OverlayFrame,
        OverlayRef, Positionable, ScrollEvent, ScrollState, Scrollable, ScrollableRef,
    };
}
