//! The focus indicator itself
//!
//! [`CursorAnimator`] owns the indicator's observable state ([`CursorState`])
//! and the animations that drive it. Position is animated by one spring per
//! axis so a retarget mid-flight keeps the current velocity; size is a fixed
//! duration tween. The host renders whatever [`CursorAnimator::state`] says
//! after each [`CursorAnimator::tick`].
//!
//! Two follow modes exist:
//!
//! - [`FollowMode::Animated`]: `move_to` with `animate = true` starts springs
//! - [`FollowMode::HardFollow`]: every placement is applied immediately, used
//!   while a list scrolls so the indicator stays glued to its target

use std::cell::RefCell;
use std::rc::Rc;

use nebula_animation::spring::{damping_ratio, stiffness};
use nebula_animation::{Easing, SizeTweener, Spring, SpringConfig};
use nebula_core::{ElementId, Insets, IntRect, Point};

/// Shared, mutable handle to a cursor
pub type SharedCursor = Rc<RefCell<CursorAnimator>>;

/// Default size tween duration in milliseconds
pub const DEFAULT_SIZE_DURATION_MS: u32 = 200;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    Shown,
    #[default]
    Hidden,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FollowMode {
    #[default]
    Animated,
    HardFollow,
}

/// What the renderer draws
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CursorState {
    /// Top-left corner in overlay coordinates, padding already applied
    pub position: Point,
    pub width: u32,
    pub height: u32,
    pub visibility: Visibility,
    /// Clip relative to the indicator's own origin, `None` when unclipped
    pub clip: Option<IntRect>,
    /// False until the first placement
    pub initialized: bool,
}

impl CursorState {
    pub fn is_shown(&self) -> bool {
        self.visibility == Visibility::Shown
    }
}

/// Animation parameters for a cursor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    pub stiffness: f32,
    pub damping_ratio: f32,
    pub size_duration_ms: u32,
    pub size_easing: Easing,
}

impl AnimationConfig {
    pub fn spring_config(&self) -> SpringConfig {
        SpringConfig::from_damping_ratio(self.stiffness, self.damping_ratio)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            stiffness: stiffness::MEDIUM,
            damping_ratio: damping_ratio::LOW_BOUNCY,
            size_duration_ms: DEFAULT_SIZE_DURATION_MS,
            size_easing: Easing::AccelerateDecelerate,
        }
    }
}

pub struct CursorAnimator {
    element_id: ElementId,
    padding: Insets,
    config: AnimationConfig,
    spring_x: Spring,
    spring_y: Spring,
    size: SizeTweener,
    follow_mode: FollowMode,
    state: CursorState,
}

impl CursorAnimator {
    /// `element_id` is the indicator's own identity in the host tree. The
    /// tracker uses it to refuse focusing the indicator itself.
    pub fn new(element_id: ElementId) -> Self {
        Self::with_config(element_id, AnimationConfig::default())
    }

    pub fn with_config(element_id: ElementId, config: AnimationConfig) -> Self {
        let spring = config.spring_config();
        Self {
            element_id,
            padding: Insets::ZERO,
            config,
            spring_x: Spring::new(spring, 0.0),
            spring_y: Spring::new(spring, 0.0),
            size: SizeTweener::new(config.size_duration_ms as f32, config.size_easing),
            follow_mode: FollowMode::Animated,
            state: CursorState::default(),
        }
    }

    pub fn shared(self) -> SharedCursor {
        Rc::new(RefCell::new(self))
    }

    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn config(&self) -> AnimationConfig {
        self.config
    }

    pub fn follow_mode(&self) -> FollowMode {
        self.follow_mode
    }

    /// Takes effect on the next placement
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn set_uniform_padding(&mut self, padding: i32) {
        self.padding = Insets::uniform(padding);
    }

    /// Swap spring and tween parameters. Springs in flight keep their value,
    /// velocity and target and continue under the new parameters.
    pub fn set_animation_config(&mut self, config: AnimationConfig) {
        let spring = config.spring_config();
        self.spring_x.set_config(spring);
        self.spring_y.set_config(spring);
        self.size.set_duration_ms(config.size_duration_ms as f32);
        self.size.set_easing(config.size_easing);
        self.config = config;
    }

    pub fn set_spring(&mut self, stiffness: f32, damping_ratio: f32) {
        self.set_animation_config(AnimationConfig {
            stiffness,
            damping_ratio,
            ..self.config
        });
    }

    /// Applies to size tweens started after the call
    pub fn set_size_duration_ms(&mut self, duration_ms: u32) {
        self.set_animation_config(AnimationConfig {
            size_duration_ms: duration_ms,
            ..self.config
        });
    }

    /// Entering hard-follow cancels everything in flight
    pub fn set_follow_mode(&mut self, mode: FollowMode) {
        if self.follow_mode == mode {
            return;
        }
        if mode == FollowMode::HardFollow {
            self.cancel_all_animations();
        }
        tracing::trace!(element = %self.element_id, ?mode, "follow mode changed");
        self.follow_mode = mode;
    }

    /// Place the indicator around a target whose top-left corner is `(x, y)`
    /// in overlay coordinates.
    ///
    /// The first placement, any placement in hard-follow, and any call with
    /// `animate = false` apply immediately. Otherwise the position springs are
    /// retargeted and the size tween restarted for axes that changed.
    pub fn move_to(&mut self, x: f32, y: f32, width: i32, height: i32, animate: bool) {
        let target_x = x - self.padding.left as f32;
        let target_y = y - self.padding.top as f32;
        let target_w = (width + self.padding.horizontal()).max(0) as u32;
        let target_h = (height + self.padding.vertical()).max(0) as u32;

        let immediate = !self.state.initialized || self.follow_mode == FollowMode::HardFollow || !animate;

        if immediate {
            self.cancel_all_animations();
            self.spring_x.snap_to(target_x);
            self.spring_y.snap_to(target_y);
            self.state.position = Point::new(target_x, target_y);
            self.state.width = target_w;
            self.state.height = target_h;
            self.state.initialized = true;
        } else {
            self.spring_x.set_target(target_x);
            self.spring_y.set_target(target_y);
            self.size
                .animate_to((self.state.width, self.state.height), (target_w, target_h));
        }
        self.state.visibility = Visibility::Shown;

        tracing::debug!(
            element = %self.element_id,
            x = target_x,
            y = target_y,
            width = target_w,
            height = target_h,
            immediate,
            "cursor placed"
        );
    }

    /// Jump to the padded position immediately. Size and visibility are left
    /// untouched.
    pub fn hard_follow_to(&mut self, x: f32, y: f32) {
        let target_x = x - self.padding.left as f32;
        let target_y = y - self.padding.top as f32;
        self.spring_x.snap_to(target_x);
        self.spring_y.snap_to(target_y);
        self.state.position = Point::new(target_x, target_y);
    }

    /// Stop every running animation where it currently is
    pub fn cancel_all_animations(&mut self) {
        self.spring_x.halt();
        self.spring_y.halt();
        self.size.cancel();
    }

    /// Back to the pre-first-placement state: hidden, unclipped, and the next
    /// `move_to` applies immediately.
    pub fn reset(&mut self) {
        self.cancel_all_animations();
        self.state.initialized = false;
        self.state.visibility = Visibility::Hidden;
        self.state.clip = None;
        tracing::debug!(element = %self.element_id, "cursor reset");
    }

    pub fn hide(&mut self) {
        self.state.visibility = Visibility::Hidden;
    }

    /// No effect before the first placement
    pub fn show(&mut self) {
        if self.state.initialized {
            self.state.visibility = Visibility::Shown;
        }
    }

    pub fn set_clip(&mut self, clip: Option<IntRect>) {
        self.state.clip = clip;
    }

    pub fn is_animating(&self) -> bool {
        !self.spring_x.is_settled() || !self.spring_y.is_settled() || self.size.is_animating()
    }

    /// Advance animations by `dt_ms` milliseconds. Returns true while anything
    /// is still moving. Ignored in hard-follow.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.follow_mode == FollowMode::HardFollow {
            return false;
        }
        if !self.is_animating() {
            return false;
        }

        let dt = dt_ms / 1000.0;
        self.spring_x.step(dt);
        self.spring_y.step(dt);
        self.state.position = Point::new(self.spring_x.value(), self.spring_y.value());

        let step = self.size.tick(dt_ms);
        if let Some(width) = step.width {
            self.state.width = width;
        }
        if let Some(height) = step.height {
            self.state.height = height;
        }

        let animating = self.is_animating();
        if !animating {
            tracing::trace!(element = %self.element_id, "cursor settled");
        }
        animating
    }
}
