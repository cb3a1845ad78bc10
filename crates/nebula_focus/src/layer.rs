//! Composition root
//!
//! [`FocusIndicatorLayer`] is the piece a host embeds in its overlay: it owns
//! the shared cursor, binds a [`FocusTracker`] to the overlay, and hands the
//! renderer a snapshot of the cursor each frame.

use nebula_core::{ElementId, ElementRef, Insets, OverlayRef};

use crate::config::FocusConfig;
use crate::cursor::{CursorAnimator, CursorState, SharedCursor};
use crate::tracker::FocusTracker;

pub struct FocusIndicatorLayer {
    overlay: OverlayRef,
    cursor: SharedCursor,
    tracker: Option<FocusTracker>,
}

impl FocusIndicatorLayer {
    /// A layer with a default cursor identified as `cursor_element`
    pub fn new(overlay: OverlayRef, cursor_element: ElementId) -> Self {
        Self::with_cursor(overlay, CursorAnimator::new(cursor_element))
    }

    pub fn with_cursor(overlay: OverlayRef, cursor: CursorAnimator) -> Self {
        Self {
            overlay,
            cursor: cursor.shared(),
            tracker: None,
        }
    }

    /// Build the cursor and tracker from `config` and bind them
    pub fn from_config(overlay: OverlayRef, cursor_element: ElementId, config: &FocusConfig) -> Self {
        let mut layer = Self::with_cursor(overlay, config.build_cursor(cursor_element));
        layer.bind_tracker(config.build_tracker());
        layer
    }

    pub fn overlay(&self) -> &OverlayRef {
        &self.overlay
    }

    pub fn cursor(&self) -> &SharedCursor {
        &self.cursor
    }

    pub fn tracker(&self) -> Option<&FocusTracker> {
        self.tracker.as_ref()
    }

    /// Attach `tracker` to this layer, replacing any tracker bound before
    pub fn bind_tracker(&mut self, tracker: FocusTracker) {
        self.unbind_tracker();
        tracker.attach(self.overlay.clone(), self.cursor.clone());
        self.tracker = Some(tracker);
    }

    /// Detach and release the bound tracker, if any
    pub fn unbind_tracker(&mut self) -> Option<FocusTracker> {
        let tracker = self.tracker.take()?;
        tracker.detach();
        Some(tracker)
    }

    /// Forward a focus change to the bound tracker
    pub fn notify_focus_changed(&self, target: Option<ElementRef>) {
        if let Some(tracker) = &self.tracker {
            tracker.on_focus_changed(target);
        }
    }

    pub fn set_cursor_padding(&self, padding: Insets) {
        self.cursor.borrow_mut().set_padding(padding);
    }

    pub fn set_uniform_cursor_padding(&self, padding: i32) {
        self.cursor.borrow_mut().set_uniform_padding(padding);
    }

    /// Advance the cursor's animations. Returns true while it still moves.
    pub fn tick(&self, dt_ms: f32) -> bool {
        self.cursor.borrow_mut().tick(dt_ms)
    }

    /// Snapshot for the renderer
    pub fn cursor_state(&self) -> CursorState {
        self.cursor.borrow().state().clone()
    }

    /// The overlay left the host tree
    pub fn on_detached(&mut self) {
        self.unbind_tracker();
    }
}

impl Drop for FocusIndicatorLayer {
    fn drop(&mut self) {
        self.unbind_tracker();
    }
}
