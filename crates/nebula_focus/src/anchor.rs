//! Keyline anchor scrolling
//!
//! When focus moves through a long list, the list should scroll so the
//! focused item sits on a fixed *keyline*: a fraction of the viewport's
//! extent, measured from its start edge. All functions here are pure; a host
//! smooth-scroller asks [`AnchorScroller`] for a distance and a duration and
//! runs the scroll itself.
//!
//! Distances follow the scroll-delta sign convention: a positive result scrolls
//! forward, moving content toward the start edge.

use serde::{Deserialize, Serialize};

/// Item start lands at 35% of the viewport
pub const KEYLINE_DEFAULT: f32 = 0.35;
pub const KEYLINE_CENTER: f32 = 0.5;
pub const KEYLINE_TOP: f32 = 0.0;

/// Scroll speed: milliseconds to travel one inch
pub const DEFAULT_MILLIS_PER_INCH: f32 = 25.0;

pub const DEFAULT_MAX_SCROLL_DURATION_MS: u32 = 200;

/// Share of the linear scroll time spent decelerating
const DECELERATION_TIME_RATIO: f32 = 0.3356;

/// Result of [`dt_to_fit`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DtToFit {
    /// Scroll by exactly this much
    Anchored(i32),
    /// Anchoring is off; use the plain "make it visible" distance
    UseDefault,
}

impl DtToFit {
    /// The anchored distance, or `fallback()` when anchoring is off
    pub fn or_else(self, fallback: impl FnOnce() -> i32) -> i32 {
        match self {
            DtToFit::Anchored(distance) => distance,
            DtToFit::UseDefault => fallback(),
        }
    }
}

/// Which edge the default fit snaps to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SnapPreference {
    Start,
    End,
    /// Whichever edge needs the least movement, or none if already visible
    #[default]
    Any,
}

/// Distance that puts the item starting at `view_start` onto the keyline of
/// the box `[box_start, box_end)`.
///
/// `view_end` is accepted for symmetry with [`default_dt_to_fit`] and does not
/// affect the result.
pub fn dt_to_fit(
    view_start: i32,
    _view_end: i32,
    box_start: i32,
    box_end: i32,
    keyline_fraction: f32,
    keyline_offset: i32,
    enabled: bool,
) -> DtToFit {
    if !enabled {
        return DtToFit::UseDefault;
    }
    let box_extent = box_end - box_start;
    let keyline = ((box_extent as f32) * keyline_fraction).floor() as i32 + keyline_offset;
    DtToFit::Anchored(view_start - box_start - keyline)
}

/// Smallest scroll that brings `[view_start, view_end)` inside the box
pub fn default_dt_to_fit(view_start: i32, view_end: i32, box_start: i32, box_end: i32, snap: SnapPreference) -> i32 {
    match snap {
        SnapPreference::Start => view_start - box_start,
        SnapPreference::End => view_end - box_end,
        SnapPreference::Any => {
            if view_start < box_start {
                view_start - box_start
            } else if view_end > box_end {
                view_end - box_end
            } else {
                0
            }
        }
    }
}

/// Milliseconds per pixel for a display with `units_per_inch` pixels per inch
pub fn speed_per_unit_distance(millis_per_inch: f32, units_per_inch: f32) -> f32 {
    millis_per_inch / units_per_inch.max(f32::EPSILON)
}

/// Linear time to cover `dx` pixels at `speed` ms/px
pub fn time_for_scrolling(dx: i32, speed: f32) -> u32 {
    ((dx.unsigned_abs() as f32) * speed).ceil() as u32
}

/// Time for the decelerating tail of a scroll whose linear time is
/// `scroll_time_ms`
pub fn time_for_deceleration(scroll_time_ms: u32) -> u32 {
    ((scroll_time_ms as f32) / DECELERATION_TIME_RATIO).ceil() as u32
}

pub fn capped_duration(raw_ms: u32, max_ms: u32) -> u32 {
    raw_ms.min(max_ms)
}

/// Scroll distance that puts a child at `target_start` (container-relative)
/// onto the keyline of a container with the given padding
pub fn distance_to_keyline(
    container_extent: i32,
    padding_start: i32,
    padding_end: i32,
    target_start: i32,
    keyline_fraction: f32,
) -> i32 {
    let usable = container_extent - padding_start - padding_end;
    let keyline = padding_start + ((usable as f32) * keyline_fraction).floor() as i32;
    target_start - keyline
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub enabled: bool,
    pub keyline_fraction: f32,
    /// Added to the keyline, in pixels
    pub keyline_offset: i32,
    pub max_scroll_duration_ms: u32,
    pub millis_per_inch: f32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keyline_fraction: KEYLINE_DEFAULT,
            keyline_offset: 0,
            max_scroll_duration_ms: DEFAULT_MAX_SCROLL_DURATION_MS,
            millis_per_inch: DEFAULT_MILLIS_PER_INCH,
        }
    }
}

/// A planned smooth scroll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollPlan {
    pub distance: i32,
    pub duration_ms: u32,
}

#[derive(Clone, Debug, Default)]
pub struct AnchorScroller {
    config: AnchorConfig,
}

impl AnchorScroller {
    pub fn new(config: AnchorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Clamped to `[0, 1]`
    pub fn set_keyline_fraction(&mut self, fraction: f32) {
        let clamped = fraction.clamp(0.0, 1.0);
        if clamped != fraction {
            tracing::warn!(fraction, clamped, "keyline fraction out of range");
        }
        self.config.keyline_fraction = clamped;
    }

    pub fn set_keyline_offset(&mut self, offset: i32) {
        self.config.keyline_offset = offset;
    }

    pub fn dt_to_fit(&self, view_start: i32, view_end: i32, box_start: i32, box_end: i32) -> DtToFit {
        dt_to_fit(
            view_start,
            view_end,
            box_start,
            box_end,
            self.config.keyline_fraction,
            self.config.keyline_offset,
            self.config.enabled,
        )
    }

    pub fn speed_per_unit_distance(&self, units_per_inch: f32) -> f32 {
        speed_per_unit_distance(self.config.millis_per_inch, units_per_inch)
    }

    /// Linear scroll time for `dx`, capped at the configured maximum
    pub fn time_for_scrolling(&self, dx: i32, units_per_inch: f32) -> u32 {
        let raw = time_for_scrolling(dx, self.speed_per_unit_distance(units_per_inch));
        capped_duration(raw, self.config.max_scroll_duration_ms)
    }

    /// Distance and duration to bring the item `[view_start, view_end)` into
    /// place inside `[box_start, box_end)`
    pub fn plan(
        &self,
        view_start: i32,
        view_end: i32,
        box_start: i32,
        box_end: i32,
        snap: SnapPreference,
        units_per_inch: f32,
    ) -> ScrollPlan {
        let distance = self
            .dt_to_fit(view_start, view_end, box_start, box_end)
            .or_else(|| default_dt_to_fit(view_start, view_end, box_start, box_end, snap));
        let duration_ms = time_for_deceleration(self.time_for_scrolling(distance, units_per_inch));

        tracing::debug!(distance, duration_ms, "anchor scroll planned");
        ScrollPlan {
            distance,
            duration_ms,
        }
    }

    pub fn distance_to_keyline(
        &self,
        container_extent: i32,
        padding_start: i32,
        padding_end: i32,
        target_start: i32,
    ) -> i32 {
        distance_to_keyline(
            container_extent,
            padding_start,
            padding_end,
            target_start,
            self.config.keyline_fraction,
        ) - self.config.keyline_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dt_to_fit_default_keyline() {
        let dt = dt_to_fit(500, 700, 0, 1000, KEYLINE_DEFAULT, 0, true);
        assert_eq!(dt, DtToFit::Anchored(150));
    }

    #[test]
    fn test_dt_to_fit_center_and_top() {
        assert_eq!(dt_to_fit(100, 200, 0, 1000, KEYLINE_CENTER, 0, true), DtToFit::Anchored(-400));
        assert_eq!(dt_to_fit(100, 200, 0, 1000, KEYLINE_TOP, 0, true), DtToFit::Anchored(100));
        assert_eq!(dt_to_fit(100, 200, 0, 1000, KEYLINE_TOP, 24, true), DtToFit::Anchored(76));
    }

    #[test]
    fn test_dt_to_fit_disabled_uses_default() {
        let dt = dt_to_fit(500, 700, 0, 1000, KEYLINE_DEFAULT, 0, false);
        assert_eq!(dt, DtToFit::UseDefault);
        assert_eq!(dt.or_else(|| 42), 42);
    }

    #[test]
    fn test_default_dt_to_fit() {
        assert_eq!(default_dt_to_fit(-40, 60, 0, 1000, SnapPreference::Any), -40);
        assert_eq!(default_dt_to_fit(950, 1050, 0, 1000, SnapPreference::Any), 50);
        assert_eq!(default_dt_to_fit(100, 200, 0, 1000, SnapPreference::Any), 0);
        assert_eq!(default_dt_to_fit(100, 200, 0, 1000, SnapPreference::Start), 100);
        assert_eq!(default_dt_to_fit(100, 200, 0, 1000, SnapPreference::End), -800);
    }

    #[test]
    fn test_speed_and_duration_cap() {
        let speed = speed_per_unit_distance(DEFAULT_MILLIS_PER_INCH, 160.0);
        assert!((speed - 0.15625).abs() < 1e-6);

        assert_eq!(time_for_scrolling(-320, speed), 50);
        assert_eq!(capped_duration(5000, 200), 200);
        assert_eq!(capped_duration(50, 200), 50);
    }

    #[test]
    fn test_plan_caps_then_decelerates() {
        let scroller = AnchorScroller::default();
        let plan = scroller.plan(5000, 5100, 0, 1000, SnapPreference::Any, 160.0);
        assert_eq!(plan.distance, 5000 - 350);
        assert_eq!(plan.duration_ms, time_for_deceleration(200));
    }

    #[test]
    fn test_plan_without_anchor_falls_back() {
        let mut scroller = AnchorScroller::default();
        scroller.set_enabled(false);
        let plan = scroller.plan(950, 1050, 0, 1000, SnapPreference::Any, 160.0);
        assert_eq!(plan.distance, 50);
    }

    #[test]
    fn test_distance_to_keyline_with_padding() {
        // Usable extent 900, keyline at 10 + 315
        assert_eq!(distance_to_keyline(1000, 10, 90, 600, KEYLINE_DEFAULT), 275);
        assert_eq!(distance_to_keyline(1000, 0, 0, 350, KEYLINE_DEFAULT), 0);
    }

    #[test]
    fn test_keyline_fraction_is_clamped() {
        let mut scroller = AnchorScroller::default();
        scroller.set_keyline_fraction(1.5);
        assert_eq!(scroller.config().keyline_fraction, 1.0);
        scroller.set_keyline_fraction(-0.2);
        assert_eq!(scroller.config().keyline_fraction, 0.0);
    }
}
