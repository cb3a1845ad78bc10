//! Integration tests for focus tracking against a simulated host
//!
//! These tests verify that:
//! - Host focus, scroll and pre-draw events drive the cursor end to end
//! - Scroll state flips the cursor between animated and hard-follow
//! - Invalid targets and detached trackers leave the cursor untouched
//! - Clipping follows the target's visible region while it scrolls

use std::cell::Cell;
use std::rc::Rc;

use nebula_core::{
    Bounds, ElementId, ElementRef, EventHub, FocusListener, IntRect, ListenerId, OverlayFrame,
    Point, Positionable, PreDrawListener, ScrollEvent, ScrollListener, ScrollState, Scrollable,
};
use nebula_focus::{
    AnchorScroller, CursorAnimator, FocusTracker, FollowMode, SharedCursor, SnapPreference,
};

// ============================================================================
// Fake host
// ============================================================================

struct FakeElement {
    id: ElementId,
    bounds: Cell<Bounds>,
    visible: Cell<bool>,
    offscreen: Cell<bool>,
    /// Overrides the fully visible region when set
    clipped: Cell<Option<IntRect>>,
}

impl FakeElement {
    fn new(id: u64, bounds: Bounds) -> Rc<Self> {
        Rc::new(Self {
            id: ElementId(id),
            bounds: Cell::new(bounds),
            visible: Cell::new(true),
            offscreen: Cell::new(false),
            clipped: Cell::new(None),
        })
    }

    fn shift(&self, dx: i32, dy: i32) {
        self.bounds.set(self.bounds.get().translate(dx, dy));
    }
}

impl Positionable for FakeElement {
    fn element_id(&self) -> ElementId {
        self.id
    }
    fn bounds(&self) -> Option<Bounds> {
        Some(self.bounds.get())
    }
    fn is_visible(&self) -> bool {
        self.visible.get()
    }
    fn visible_region(&self) -> Option<IntRect> {
        if self.offscreen.get() {
            return None;
        }
        Some(self.clipped.get().unwrap_or_else(|| self.bounds.get().local_rect()))
    }
}

struct FakeOverlay {
    bounds: Bounds,
    hub: EventHub,
}

impl FakeOverlay {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            bounds: Bounds::new(20, 30, 1280, 720),
            hub: EventHub::new(),
        })
    }

    fn focus(&self, target: &Rc<FakeElement>) {
        let target: ElementRef = target.clone();
        self.hub.dispatch_focus_change(None, Some(&target));
    }

    fn frame(&self) {
        self.hub.dispatch_pre_draw();
    }
}

impl Positionable for FakeOverlay {
    fn element_id(&self) -> ElementId {
        ElementId(1)
    }
    fn bounds(&self) -> Option<Bounds> {
        Some(self.bounds)
    }
    fn is_visible(&self) -> bool {
        true
    }
    fn visible_region(&self) -> Option<IntRect> {
        Some(self.bounds.local_rect())
    }
}

impl OverlayFrame for FakeOverlay {
    fn add_focus_listener(&self, listener: FocusListener) -> ListenerId {
        self.hub.add_focus_listener(listener)
    }
    fn add_pre_draw_listener(&self, listener: PreDrawListener) -> ListenerId {
        self.hub.add_pre_draw_listener(listener)
    }
    fn remove_listener(&self, id: ListenerId) {
        self.hub.remove_listener(id);
    }
}

struct FakeList {
    id: ElementId,
    hub: EventHub,
    items: Vec<Rc<FakeElement>>,
}

impl FakeList {
    fn new(id: u64, items: Vec<Rc<FakeElement>>) -> Rc<Self> {
        Rc::new(Self {
            id: ElementId(id),
            hub: EventHub::new(),
            items,
        })
    }

    fn set_state(&self, state: ScrollState) {
        self.hub.dispatch_scroll(ScrollEvent::StateChanged(state));
    }

    /// Scroll content up by `dy` and report it
    fn scroll_by(&self, dy: i32) {
        for item in &self.items {
            item.shift(0, -dy);
        }
        self.hub.dispatch_scroll(ScrollEvent::Scrolled {
            delta_x: 0,
            delta_y: dy,
        });
    }
}

impl Positionable for FakeList {
    fn element_id(&self) -> ElementId {
        self.id
    }
    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(20, 30, 400, 720))
    }
    fn is_visible(&self) -> bool {
        true
    }
    fn visible_region(&self) -> Option<IntRect> {
        Some(IntRect::new(0, 0, 400, 720))
    }
}

impl Scrollable for FakeList {
    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId {
        self.hub.add_scroll_listener(listener)
    }
    fn remove_scroll_listener(&self, id: ListenerId) {
        self.hub.remove_listener(id);
    }
}

struct Harness {
    overlay: Rc<FakeOverlay>,
    cursor: SharedCursor,
    tracker: FocusTracker,
}

fn harness() -> Harness {
    let overlay = FakeOverlay::new();
    let cursor = CursorAnimator::new(ElementId(2)).shared();
    let tracker = FocusTracker::new();
    tracker.attach(overlay.clone(), cursor.clone());
    Harness {
        overlay,
        cursor,
        tracker,
    }
}

fn settle(cursor: &SharedCursor) {
    for _ in 0..600 {
        if !cursor.borrow_mut().tick(16.0) {
            break;
        }
    }
}

fn position(cursor: &SharedCursor) -> Point {
    cursor.borrow().state().position
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_first_placement_is_not_animated() {
    let h = harness();
    let button = FakeElement::new(10, Bounds::new(120, 130, 200, 60));

    h.overlay.focus(&button);

    let cursor = h.cursor.borrow();
    let state = cursor.state();
    assert!(state.initialized);
    assert!(state.is_shown());
    assert_eq!(state.position, Point::new(100.0, 100.0));
    assert_eq!((state.width, state.height), (200, 60));
    assert!(!cursor.is_animating());
}

#[test]
fn test_second_focus_animates_between_targets() {
    let h = harness();
    let first = FakeElement::new(10, Bounds::new(120, 130, 200, 60));
    let second = FakeElement::new(11, Bounds::new(120, 330, 240, 60));

    h.overlay.focus(&first);
    h.overlay.focus(&second);
    assert_eq!(position(&h.cursor), Point::new(100.0, 100.0));
    assert!(h.cursor.borrow().is_animating());

    settle(&h.cursor);
    let state = h.cursor.borrow().state().clone();
    assert_eq!(state.position, Point::new(100.0, 300.0));
    assert_eq!(state.width, 240);
    assert_eq!(
        h.tracker.current_target().map(|t| t.element_id()),
        Some(ElementId(11))
    );
}

#[test]
fn test_scroll_state_drives_follow_mode() {
    let h = harness();
    let item = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    let list = FakeList::new(50, vec![item.clone()]);
    h.tracker.attach_scrollable(list.clone());
    h.overlay.focus(&item);
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::Animated);

    list.set_state(ScrollState::Dragging);
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::HardFollow);

    // Item moves and grows while the list scrolls
    list.scroll_by(100);
    item.bounds.set(Bounds::new(40, 300, 360, 80));
    h.overlay.frame();
    assert_eq!(position(&h.cursor), Point::new(20.0, 270.0));
    assert_eq!(h.cursor.borrow().state().width, 300);

    // Back to idle: one animated placement picks up the new size
    list.set_state(ScrollState::Idle);
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::Animated);
    assert!(h.cursor.borrow().is_animating());
    settle(&h.cursor);
    assert_eq!(h.cursor.borrow().state().width, 360);

    // A redundant idle report starts nothing
    list.set_state(ScrollState::Idle);
    assert!(!h.cursor.borrow().is_animating());
}

#[test]
fn test_scroll_progress_hard_follows_target() {
    let h = harness();
    let items: Vec<_> = (0..4)
        .map(|i| FakeElement::new(10 + i, Bounds::new(40, 100 + 100 * i as i32, 300, 80)))
        .collect();
    let list = FakeList::new(50, items.clone());
    h.tracker.attach_scrollable(list.clone());
    h.overlay.focus(&items[2]);
    assert_eq!(position(&h.cursor), Point::new(20.0, 270.0));

    list.set_state(ScrollState::Settling);
    list.scroll_by(40);
    assert_eq!(position(&h.cursor), Point::new(20.0, 230.0));
    list.scroll_by(25);
    assert_eq!(position(&h.cursor), Point::new(20.0, 205.0));

    // Ticks have no effect while hard-following
    assert!(!h.cursor.borrow_mut().tick(16.0));
}

#[test]
fn test_scroll_progress_ignored_when_idle() {
    let h = harness();
    let item = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    let list = FakeList::new(50, vec![item.clone()]);
    h.tracker.attach_scrollable(list.clone());
    h.overlay.focus(&item);

    list.scroll_by(100);
    h.overlay.frame();
    assert_eq!(position(&h.cursor), Point::new(20.0, 370.0));
}

#[test]
fn test_focus_during_scroll_is_immediate() {
    let h = harness();
    let first = FakeElement::new(10, Bounds::new(40, 100, 300, 80));
    let second = FakeElement::new(11, Bounds::new(40, 200, 300, 80));
    let list = FakeList::new(50, vec![first.clone(), second.clone()]);
    h.tracker.attach_scrollable(list.clone());

    h.overlay.focus(&first);
    list.set_state(ScrollState::Dragging);
    h.overlay.focus(&second);

    assert_eq!(position(&h.cursor), Point::new(20.0, 170.0));
    assert!(!h.cursor.borrow().is_animating());
}

#[test]
fn test_any_scrolling_container_keeps_hard_follow() {
    let h = harness();
    let left = FakeList::new(50, Vec::new());
    let right = FakeList::new(51, Vec::new());
    h.tracker.attach_scrollable(left.clone());
    h.tracker.attach_scrollable(right.clone());

    left.set_state(ScrollState::Dragging);
    right.set_state(ScrollState::Settling);
    left.set_state(ScrollState::Idle);
    assert!(h.tracker.is_scrolling());
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::HardFollow);

    right.set_state(ScrollState::Idle);
    assert!(!h.tracker.is_scrolling());
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::Animated);
}

#[test]
fn test_detaching_scrolling_container_restores_animation() {
    let h = harness();
    let list = FakeList::new(50, Vec::new());
    h.tracker.attach_scrollable(list.clone());
    list.set_state(ScrollState::Dragging);

    h.tracker.detach_scrollable(list.id);
    assert!(list.hub.is_empty());
    assert!(!h.tracker.is_scrolling());
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::Animated);
}

#[test]
fn test_zero_width_target_is_rejected() {
    let h = harness();
    let good = FakeElement::new(10, Bounds::new(120, 130, 200, 60));
    let empty = FakeElement::new(11, Bounds::new(500, 500, 0, 60));

    h.overlay.focus(&good);
    let before = h.cursor.borrow().state().clone();

    h.overlay.focus(&empty);
    assert_eq!(*h.cursor.borrow().state(), before);
    assert_eq!(
        h.tracker.current_target().map(|t| t.element_id()),
        Some(ElementId(10))
    );
}

#[test]
fn test_detach_is_idempotent_and_stops_updates() {
    let h = harness();
    let item = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    let list = FakeList::new(50, vec![item.clone()]);
    h.tracker.attach_scrollable(list.clone());
    h.overlay.focus(&item);

    h.tracker.detach();
    h.tracker.detach();
    assert!(h.overlay.hub.is_empty());
    assert!(list.hub.is_empty());
    assert!(h.tracker.current_target().is_none());
    assert!(!h.cursor.borrow().state().initialized);

    let other = FakeElement::new(11, Bounds::new(0, 0, 50, 50));
    h.overlay.focus(&other);
    list.set_state(ScrollState::Dragging);
    h.tracker.on_focus_changed(Some(other));
    assert!(!h.cursor.borrow().state().initialized);
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::Animated);
}

#[test]
fn test_detach_mid_drag_then_reattach_animates() {
    let h = harness();
    let first = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    let second = FakeElement::new(11, Bounds::new(40, 500, 300, 80));
    let list = FakeList::new(50, vec![first.clone(), second.clone()]);
    h.tracker.attach_scrollable(list.clone());
    h.overlay.focus(&first);
    list.set_state(ScrollState::Dragging);
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::HardFollow);

    // Detached before the list ever reports idle
    h.tracker.detach();
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::Animated);

    h.tracker.attach(h.overlay.clone(), h.cursor.clone());
    h.overlay.focus(&first);
    h.overlay.focus(&second);
    assert!(h.cursor.borrow().is_animating());
    assert_eq!(position(&h.cursor), Point::new(20.0, 370.0));

    settle(&h.cursor);
    assert_eq!(position(&h.cursor), Point::new(20.0, 470.0));
}

#[test]
fn test_idle_without_target_starts_nothing() {
    let h = harness();
    let list = FakeList::new(50, Vec::new());
    h.tracker.attach_scrollable(list.clone());

    list.set_state(ScrollState::Dragging);
    assert_eq!(h.cursor.borrow().follow_mode(), FollowMode::HardFollow);
    list.set_state(ScrollState::Idle);

    let cursor = h.cursor.borrow();
    assert_eq!(cursor.follow_mode(), FollowMode::Animated);
    assert!(!cursor.is_animating());
    assert!(!cursor.state().initialized);
    assert!(h.tracker.current_target().is_none());
}

#[test]
fn test_auto_track_disabled_ignores_host_focus() {
    let h = harness();
    h.tracker.set_auto_track_enabled(false);
    let button = FakeElement::new(10, Bounds::new(120, 130, 200, 60));

    h.overlay.focus(&button);
    assert!(h.tracker.current_target().is_none());

    // Direct calls still apply
    h.tracker.move_cursor_to(button.clone(), true);
    assert_eq!(position(&h.cursor), Point::new(100.0, 100.0));
}

#[test]
fn test_focus_listener_called_after_placement() {
    let h = harness();
    let calls = Rc::new(Cell::new(0));
    let cursor = h.cursor.clone();
    let seen = calls.clone();
    h.tracker.set_on_focus_change(move |target| {
        // The cursor is free to inspect from inside the listener
        assert!(cursor.borrow().state().initialized);
        assert_eq!(target.map(|t| t.element_id()), Some(ElementId(10)));
        seen.set(seen.get() + 1);
    });

    h.overlay.focus(&FakeElement::new(10, Bounds::new(120, 130, 200, 60)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_clip_follows_visible_region() {
    let h = harness();
    h.cursor.borrow_mut().set_uniform_padding(5);
    let item = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    let list = FakeList::new(50, vec![item.clone()]);
    h.tracker.attach_scrollable(list.clone());

    h.overlay.focus(&item);
    assert_eq!(h.cursor.borrow().state().clip, None);

    list.set_state(ScrollState::Dragging);

    // Bottom half scrolled under the list's edge
    item.clipped.set(Some(IntRect::new(0, 0, 300, 40)));
    list.scroll_by(10);
    let state = h.cursor.borrow().state().clone();
    assert!(state.is_shown());
    assert_eq!(state.clip, Some(IntRect::new(5, 5, 305, 45)));

    // Gone entirely
    item.offscreen.set(true);
    list.scroll_by(10);
    assert!(!h.cursor.borrow().state().is_shown());

    // Back in view
    item.offscreen.set(false);
    item.clipped.set(None);
    list.scroll_by(-20);
    let state = h.cursor.borrow().state().clone();
    assert!(state.is_shown());
    assert_eq!(state.clip, None);
}

#[test]
fn test_clip_disabled_skips_visibility_updates() {
    let h = harness();
    h.tracker.set_clip_enabled(false);
    let item = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    item.clipped.set(Some(IntRect::new(0, 0, 300, 40)));

    h.overlay.focus(&item);
    let state = h.cursor.borrow().state().clone();
    assert!(state.is_shown());
    assert_eq!(state.clip, None);
}

#[test]
fn test_hide_show_and_reset() {
    let h = harness();
    let item = FakeElement::new(10, Bounds::new(40, 400, 300, 80));
    h.overlay.focus(&item);

    h.tracker.hide_cursor();
    assert!(!h.cursor.borrow().state().is_shown());
    h.tracker.show_cursor();
    assert!(h.cursor.borrow().state().is_shown());

    h.tracker.reset();
    assert!(h.tracker.current_target().is_none());
    assert!(h.tracker.is_attached());
    h.tracker.show_cursor();
    assert!(!h.cursor.borrow().state().is_shown());
}

#[test]
fn test_anchor_plan_puts_item_on_keyline() {
    let scroller = AnchorScroller::default();
    let item = FakeElement::new(10, Bounds::new(0, 5000, 300, 100));

    let view = item.bounds.get();
    let plan = scroller.plan(view.y, view.y + view.height, 0, 1000, SnapPreference::Any, 160.0);
    item.shift(0, -plan.distance);

    assert_eq!(item.bounds.get().y, 350);
    assert!(plan.duration_ms > 0);
}
