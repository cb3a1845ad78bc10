//! Focus tracking
//!
//! [`FocusTracker`] connects host notifications to a [`CursorAnimator`]:
//!
//! - focus changes place the indicator on the new target (animated when no
//!   list is scrolling)
//! - scroll state changes flip the cursor between animated and hard-follow
//! - scroll progress and pre-draw ticks re-glue the indicator to its target
//!   while anything scrolls
//!
//! The tracker is a cheap clonable handle. Host callbacks hold only a weak
//! reference, so dropping every handle stops all tracking and unsubscribes
//! from the host.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use nebula_core::{
    Bounds, ElementId, ElementRef, ListenerId, OverlayRef, ScrollEvent, ScrollState, ScrollableRef,
};

use crate::clip::compute_clip;
use crate::cursor::{CursorAnimator, FollowMode, SharedCursor};
use crate::mapper::map_to_overlay;

/// Called after the tracker accepts a new target, or `None` when focus is
/// cleared
pub type FocusChangeListener = Rc<dyn Fn(Option<&ElementRef>)>;

struct Attachment {
    overlay: OverlayRef,
    cursor: SharedCursor,
    focus_listener: ListenerId,
    pre_draw_listener: ListenerId,
}

struct AttachedScrollable {
    container: ScrollableRef,
    listener: ListenerId,
    state: ScrollState,
}

struct TrackerState {
    attachment: Option<Attachment>,
    current: Option<ElementRef>,
    scrollables: FxHashMap<ElementId, AttachedScrollable>,
    /// True while any attached container is not idle
    scrolling: bool,
    auto_track_enabled: bool,
    clip_enabled: bool,
    on_focus_change: Option<FocusChangeListener>,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            attachment: None,
            current: None,
            scrollables: FxHashMap::default(),
            scrolling: false,
            auto_track_enabled: true,
            clip_enabled: true,
            on_focus_change: None,
        }
    }
}

impl TrackerState {
    fn is_valid_target(&self, target: &ElementRef) -> bool {
        let Some(attachment) = &self.attachment else {
            return false;
        };
        let id = target.element_id();
        if id == attachment.overlay.element_id() || id == attachment.cursor.borrow().element_id() {
            return false;
        }
        target.is_visible() && target.bounds().is_some_and(|b| b.has_area())
    }

    /// Overlay-local origin and box of `target`, if both are laid out
    fn locate(&self, target: &ElementRef) -> Option<(f32, f32, Bounds)> {
        let attachment = self.attachment.as_ref()?;
        let target_box = target.bounds()?;
        let overlay_box = attachment.overlay.bounds()?;
        let origin = map_to_overlay(target_box, overlay_box);
        Some((origin.x, origin.y, target_box))
    }

    fn update_cursor_position(&self, target: &ElementRef, animate: bool) {
        let Some(attachment) = &self.attachment else {
            return;
        };
        let Some((x, y, target_box)) = self.locate(target) else {
            tracing::trace!(element = %target.element_id(), "target not laid out, skipping placement");
            return;
        };

        let mut cursor = attachment.cursor.borrow_mut();
        cursor.move_to(x, y, target_box.width, target_box.height, animate);
        self.update_clip(&mut cursor, target, target_box);
    }

    fn update_cursor_position_hard(&self) {
        let (Some(attachment), Some(target)) = (&self.attachment, &self.current) else {
            return;
        };
        let Some((x, y, target_box)) = self.locate(target) else {
            return;
        };

        let mut cursor = attachment.cursor.borrow_mut();
        cursor.hard_follow_to(x, y);
        self.update_clip(&mut cursor, target, target_box);
    }

    fn update_clip(&self, cursor: &mut CursorAnimator, target: &ElementRef, target_box: Bounds) {
        if !self.clip_enabled {
            return;
        }
        match target.visible_region() {
            None => cursor.hide(),
            Some(region) => {
                cursor.show();
                cursor.set_clip(compute_clip(
                    region,
                    target_box.width,
                    target_box.height,
                    cursor.padding(),
                ));
            }
        }
    }

    /// Recompute the aggregate scroll flag and switch follow modes on an edge
    fn refresh_scrolling(&mut self) {
        let scrolling = self.scrollables.values().any(|s| s.state.is_scrolling());
        if scrolling == self.scrolling {
            return;
        }
        self.scrolling = scrolling;

        let Some(attachment) = &self.attachment else {
            return;
        };
        if scrolling {
            tracing::debug!("scroll started, cursor hard-follows");
            attachment.cursor.borrow_mut().set_follow_mode(FollowMode::HardFollow);
        } else {
            tracing::debug!("scroll settled, cursor animates");
            attachment.cursor.borrow_mut().set_follow_mode(FollowMode::Animated);
            if let Some(target) = self.current.clone() {
                self.update_cursor_position(&target, true);
            }
        }
    }

    /// Drop every host subscription. A cursor left hard-following by an
    /// unfinished scroll goes back to animated.
    fn release_subscriptions(&mut self) {
        for (_, scrollable) in self.scrollables.drain() {
            scrollable.container.remove_scroll_listener(scrollable.listener);
        }
        let was_scrolling = std::mem::replace(&mut self.scrolling, false);
        if let Some(attachment) = self.attachment.take() {
            if was_scrolling {
                attachment.cursor.borrow_mut().set_follow_mode(FollowMode::Animated);
            }
            attachment.overlay.remove_listener(attachment.focus_listener);
            attachment.overlay.remove_listener(attachment.pre_draw_listener);
        }
    }
}

impl Drop for TrackerState {
    fn drop(&mut self) {
        self.release_subscriptions();
    }
}

/// Decides where the focus indicator goes
#[derive(Clone, Default)]
pub struct FocusTracker {
    inner: Rc<RefCell<TrackerState>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn downgrade(&self) -> Weak<RefCell<TrackerState>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<RefCell<TrackerState>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Start tracking focus inside `overlay`, drawing with `cursor`.
    ///
    /// An existing attachment (including its scroll containers) is detached
    /// first.
    pub fn attach(&self, overlay: OverlayRef, cursor: SharedCursor) {
        self.detach();

        let weak = self.downgrade();
        let focus_listener = overlay.add_focus_listener(Box::new(
            move |_previous: Option<&ElementRef>, current: Option<&ElementRef>| {
                if let Some(tracker) = FocusTracker::upgrade(&weak) {
                    tracker.on_host_focus_changed(current.cloned());
                }
            },
        ));

        let weak = self.downgrade();
        let pre_draw_listener = overlay.add_pre_draw_listener(Box::new(move || {
            if let Some(tracker) = FocusTracker::upgrade(&weak) {
                tracker.on_pre_draw();
            }
        }));

        // Nothing is scrolling yet
        cursor.borrow_mut().set_follow_mode(FollowMode::Animated);

        tracing::debug!(
            overlay = %overlay.element_id(),
            cursor = %cursor.borrow().element_id(),
            "tracker attached"
        );
        self.inner.borrow_mut().attachment = Some(Attachment {
            overlay,
            cursor,
            focus_listener,
            pre_draw_listener,
        });
    }

    /// Unsubscribe from everything, forget the current target and reset the
    /// cursor. Safe to call repeatedly.
    pub fn detach(&self) {
        let mut state = self.inner.borrow_mut();
        let cursor = state.attachment.as_ref().map(|a| a.cursor.clone());
        state.release_subscriptions();
        state.current = None;
        drop(state);

        if let Some(cursor) = cursor {
            cursor.borrow_mut().reset();
            tracing::debug!("tracker detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().attachment.is_some()
    }

    /// Follow `container`'s scroll state. Registering the same container twice
    /// is a no-op.
    pub fn attach_scrollable(&self, container: ScrollableRef) {
        let id = container.element_id();
        if self.inner.borrow().scrollables.contains_key(&id) {
            return;
        }

        let weak = self.downgrade();
        let listener = container.add_scroll_listener(Box::new(move |event: &ScrollEvent| {
            let Some(tracker) = FocusTracker::upgrade(&weak) else {
                return;
            };
            match *event {
                ScrollEvent::StateChanged(state) => tracker.on_scroll_state_changed(id, state),
                ScrollEvent::Scrolled { delta_x, delta_y } => tracker.on_scrolled(id, delta_x, delta_y),
            }
        }));

        tracing::debug!(container = %id, "scroll container attached");
        self.inner.borrow_mut().scrollables.insert(
            id,
            AttachedScrollable {
                container,
                listener,
                state: ScrollState::Idle,
            },
        );
    }

    /// Stop following `container`. If it was the last one scrolling, the
    /// cursor returns to animated mode.
    pub fn detach_scrollable(&self, container: ElementId) {
        let mut state = self.inner.borrow_mut();
        if let Some(scrollable) = state.scrollables.remove(&container) {
            scrollable.container.remove_scroll_listener(scrollable.listener);
            state.refresh_scrolling();
        }
    }

    pub fn attached_scrollable_count(&self) -> usize {
        self.inner.borrow().scrollables.len()
    }

    fn on_host_focus_changed(&self, current: Option<ElementRef>) {
        if !self.inner.borrow().auto_track_enabled {
            tracing::trace!("auto-track disabled, ignoring focus change");
            return;
        }
        self.on_focus_changed(current);
    }

    /// Handle a focus change. `None` clears the current target without moving
    /// the indicator. Invalid targets are ignored.
    pub fn on_focus_changed(&self, target: Option<ElementRef>) {
        let notify = {
            let mut state = self.inner.borrow_mut();
            if state.attachment.is_none() {
                return;
            }

            match target {
                None => {
                    state.current = None;
                    state.on_focus_change.clone().map(|listener| (listener, None))
                }
                Some(target) => {
                    if !state.is_valid_target(&target) {
                        tracing::trace!(element = %target.element_id(), "ignoring invalid focus target");
                        return;
                    }
                    state.current = Some(target.clone());
                    let animate = !state.scrolling;
                    state.update_cursor_position(&target, animate);
                    state.on_focus_change.clone().map(|listener| (listener, Some(target)))
                }
            }
        };

        if let Some((listener, target)) = notify {
            listener(target.as_ref());
        }
    }

    /// Handle a scroll state change from `container`. Unknown containers are
    /// ignored.
    pub fn on_scroll_state_changed(&self, container: ElementId, scroll_state: ScrollState) {
        let mut state = self.inner.borrow_mut();
        let Some(scrollable) = state.scrollables.get_mut(&container) else {
            return;
        };
        scrollable.state = scroll_state;
        state.refresh_scrolling();
    }

    /// Content of `container` moved. While scrolling, the indicator is
    /// re-glued to its target.
    pub fn on_scrolled(&self, container: ElementId, delta_x: i32, delta_y: i32) {
        let state = self.inner.borrow();
        if !state.scrolling || !state.scrollables.contains_key(&container) {
            return;
        }
        tracing::trace!(container = %container, delta_x, delta_y, "scroll progress");
        state.update_cursor_position_hard();
    }

    /// Per-frame hook. While scrolling, the indicator is re-glued to its
    /// target.
    pub fn on_pre_draw(&self) {
        let state = self.inner.borrow();
        if state.scrolling {
            state.update_cursor_position_hard();
        }
    }

    /// Move to `target` directly, bypassing auto-track. The focus change
    /// listener is not notified.
    pub fn move_cursor_to(&self, target: ElementRef, animate: bool) {
        let mut state = self.inner.borrow_mut();
        if !state.is_valid_target(&target) {
            return;
        }
        state.current = Some(target.clone());
        let animate = animate && !state.scrolling;
        state.update_cursor_position(&target, animate);
    }

    pub fn hide_cursor(&self) {
        if let Some(attachment) = &self.inner.borrow().attachment {
            attachment.cursor.borrow_mut().hide();
        }
    }

    pub fn show_cursor(&self) {
        if let Some(attachment) = &self.inner.borrow().attachment {
            attachment.cursor.borrow_mut().show();
        }
    }

    /// Forget the current target and reset the cursor, staying attached
    pub fn reset(&self) {
        let mut state = self.inner.borrow_mut();
        state.current = None;
        if let Some(attachment) = &state.attachment {
            attachment.cursor.borrow_mut().reset();
        }
    }

    pub fn current_target(&self) -> Option<ElementRef> {
        self.inner.borrow().current.clone()
    }

    pub fn is_scrolling(&self) -> bool {
        self.inner.borrow().scrolling
    }

    /// Scroll state of one attached container
    pub fn scroll_state(&self, container: ElementId) -> Option<ScrollState> {
        self.inner.borrow().scrollables.get(&container).map(|s| s.state)
    }

    /// Containers currently scrolling
    pub fn scrolling_containers(&self) -> SmallVec<[ElementId; 4]> {
        self.inner
            .borrow()
            .scrollables
            .iter()
            .filter(|(_, s)| s.state.is_scrolling())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn auto_track_enabled(&self) -> bool {
        self.inner.borrow().auto_track_enabled
    }

    /// When disabled, host focus notifications are ignored. Direct calls to
    /// [`Self::on_focus_changed`] and [`Self::move_cursor_to`] still apply.
    pub fn set_auto_track_enabled(&self, enabled: bool) {
        self.inner.borrow_mut().auto_track_enabled = enabled;
    }

    pub fn clip_enabled(&self) -> bool {
        self.inner.borrow().clip_enabled
    }

    /// Disabling also clears any clip currently on the cursor
    pub fn set_clip_enabled(&self, enabled: bool) {
        let mut state = self.inner.borrow_mut();
        state.clip_enabled = enabled;
        if !enabled {
            if let Some(attachment) = &state.attachment {
                attachment.cursor.borrow_mut().set_clip(None);
            }
        }
    }

    pub fn set_on_focus_change(&self, listener: impl Fn(Option<&ElementRef>) + 'static) {
        self.inner.borrow_mut().on_focus_change = Some(Rc::new(listener));
    }

    pub fn clear_on_focus_change(&self) {
        self.inner.borrow_mut().on_focus_change = None;
    }
}
