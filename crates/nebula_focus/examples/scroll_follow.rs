//! Scroll Follow Demo
//!
//! A headless list of rows inside an overlay. Focus walks down the list, the
//! list is dragged and flung, and the indicator's state is logged every few
//! frames:
//! - Animated moves between rows
//! - Hard-follow while the list scrolls, with clipping at the list edge
//! - An anchor scroll that parks the focused row on the keyline
//!
//! Run with: cargo run -p nebula_focus --example scroll_follow [nebula.toml]
//! Set RUST_LOG=nebula_focus=trace for per-frame detail.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};
use nebula_core::{FocusListener, PreDrawListener, ScrollListener};
use nebula_focus::prelude::*;
use tracing_subscriber::EnvFilter;

const ROW_HEIGHT: i32 = 72;
const LIST_TOP: i32 = 40;
const LIST_HEIGHT: i32 = 600;
const FRAME_MS: f32 = 16.0;

struct Row {
    id: ElementId,
    top: Cell<i32>,
}

impl Positionable for Row {
    fn element_id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(40, self.top.get(), 320, ROW_HEIGHT - 8))
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Rows are clipped by the list's top and bottom edges
    fn visible_region(&self) -> Option<IntRect> {
        let top = self.top.get();
        let bottom = top + ROW_HEIGHT - 8;
        let list_bottom = LIST_TOP + LIST_HEIGHT;
        if bottom <= LIST_TOP || top >= list_bottom {
            return None;
        }
        Some(IntRect::new(
            0,
            (LIST_TOP - top).max(0),
            320,
            (list_bottom - top).min(ROW_HEIGHT - 8),
        ))
    }
}

struct Window {
    hub: EventHub,
}

impl Positionable for Window {
    fn element_id(&self) -> ElementId {
        ElementId(1)
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(0, 0, 400, 720))
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn visible_region(&self) -> Option<IntRect> {
        Some(IntRect::new(0, 0, 400, 720))
    }
}

impl OverlayFrame for Window {
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

struct List {
    hub: EventHub,
    rows: Vec<Rc<Row>>,
}

impl List {
    fn scroll_by(&self, dy: i32) {
        for row in &self.rows {
            row.top.set(row.top.get() - dy);
        }
        self.hub.dispatch_scroll(ScrollEvent::Scrolled {
            delta_x: 0,
            delta_y: dy,
        });
    }
}

impl Positionable for List {
    fn element_id(&self) -> ElementId {
        ElementId(3)
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(0, LIST_TOP, 400, LIST_HEIGHT))
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn visible_region(&self) -> Option<IntRect> {
        Some(IntRect::new(0, 0, 400, LIST_HEIGHT))
    }
}

impl Scrollable for List {
    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId {
        self.hub.add_scroll_listener(listener)
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        self.hub.remove_listener(id);
    }
}

fn focus(window: &Window, row: &Rc<Row>) {
    let target: ElementRef = row.clone();
    window.hub.dispatch_focus_change(None, Some(&target));
}

/// Run frames until the cursor settles, logging every fourth one
fn run_frames(window: &Window, layer: &FocusIndicatorLayer, label: &str) {
    for frame in 0..120 {
        window.hub.dispatch_pre_draw();
        let animating = layer.tick(FRAME_MS);
        if frame % 4 == 0 || !animating {
            log_state(layer, label, frame);
        }
        if !animating {
            break;
        }
    }
}

fn log_state(layer: &FocusIndicatorLayer, label: &str, frame: usize) {
    let state = layer.cursor_state();
    tracing::info!(
        label,
        frame,
        x = state.position.x,
        y = state.position.y,
        width = state.width,
        height = state.height,
        shown = state.is_shown(),
        clip = ?state.clip,
        "cursor"
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => FocusConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => FocusConfig::default(),
    };

    let window = Rc::new(Window { hub: EventHub::new() });
    let rows: Vec<Rc<Row>> = (0..40)
        .map(|i| {
            Rc::new(Row {
                id: ElementId(100 + i as u64),
                top: Cell::new(LIST_TOP + i * ROW_HEIGHT),
            })
        })
        .collect();
    let list = Rc::new(List {
        hub: EventHub::new(),
        rows: rows.clone(),
    });

    let mut layer = FocusIndicatorLayer::from_config(window.clone(), ElementId(2), &config);
    let tracker = layer
        .tracker()
        .cloned()
        .context("layer has no tracker bound")?;
    tracker.attach_scrollable(list.clone());
    tracker.set_on_focus_change(|target| {
        tracing::info!(element = ?target.map(|t| t.element_id()), "focus changed");
    });

    // Walk focus down the first rows
    for row in rows.iter().take(4) {
        focus(&window, row);
        run_frames(&window, &layer, "focus");
    }

    // Drag the list; the cursor sticks to row 3 and gets clipped at the top
    list.hub.dispatch_scroll(ScrollEvent::StateChanged(ScrollState::Dragging));
    for _ in 0..12 {
        list.scroll_by(20);
        window.hub.dispatch_pre_draw();
        log_state(&layer, "drag", 0);
    }
    list.hub.dispatch_scroll(ScrollEvent::StateChanged(ScrollState::Idle));
    run_frames(&window, &layer, "settle");

    // Jump far down and anchor the focused row on the keyline
    let target = &rows[30];
    let scroller = config.build_anchor_scroller();
    let top = target.top.get() - LIST_TOP;
    let plan = scroller.plan(top, top + ROW_HEIGHT, 0, LIST_HEIGHT, SnapPreference::Any, 160.0);
    tracing::info!(distance = plan.distance, duration_ms = plan.duration_ms, "anchor scroll");

    list.hub.dispatch_scroll(ScrollEvent::StateChanged(ScrollState::Settling));
    let steps = (plan.duration_ms as f32 / FRAME_MS).ceil().max(1.0) as i32;
    let mut scrolled = 0;
    for step in 1..=steps {
        let next = plan.distance * step / steps;
        list.scroll_by(next - scrolled);
        scrolled = next;
        window.hub.dispatch_pre_draw();
    }
    focus(&window, target);
    list.hub.dispatch_scroll(ScrollEvent::StateChanged(ScrollState::Idle));
    run_frames(&window, &layer, "anchored");

    layer.on_detached();
    tracing::info!(attached = tracker.is_attached(), "layer detached");
    Ok(())
}
