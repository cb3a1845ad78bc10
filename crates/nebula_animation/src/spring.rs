//! Spring physics
//!
//! A damped harmonic oscillator driving one scalar value toward a target:
//!
//! ```text
//! m·x'' = -k·(x - target) - c·x'
//! ```
//!
//! Integrated with classic RK4 in fixed sub-steps, so large frame gaps stay
//! stable even for stiff springs.
//!
//! # Example
//!
//! ```rust
//! use nebula_animation::{Spring, SpringConfig};
//!
//! let mut spring = Spring::new(SpringConfig::default(), 0.0);
//! spring.set_target(100.0);
//! for _ in 0..120 {
//!     spring.step(1.0 / 60.0);
//! }
//! assert!(spring.is_settled());
//! assert_eq!(spring.value(), 100.0);
//! ```

/// Common stiffness values (mass 1)
pub mod stiffness {
    pub const HIGH: f32 = 10_000.0;
    pub const MEDIUM: f32 = 1_500.0;
    pub const LOW: f32 = 200.0;
    pub const VERY_LOW: f32 = 50.0;
}

/// Common damping ratios
pub mod damping_ratio {
    pub const HIGH_BOUNCY: f32 = 0.2;
    pub const MEDIUM_BOUNCY: f32 = 0.5;
    pub const LOW_BOUNCY: f32 = 0.75;
    /// Critically damped
    pub const NO_BOUNCY: f32 = 1.0;
}

/// Largest integration step in seconds
const MAX_STEP: f32 = 1.0 / 240.0;

/// Within this distance of the target (pixels) a slow spring is at rest
const REST_DISPLACEMENT: f32 = 0.1;

/// Below this speed (pixels per second) a spring near its target is at rest
const REST_VELOCITY: f32 = 1.0;

/// Spring parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    /// Damping coefficient `c` (not the ratio)
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Build a unit-mass spring from stiffness and damping ratio ζ.
    ///
    /// ζ = 1 is critically damped, ζ < 1 overshoots, ζ > 1 creeps.
    pub fn from_damping_ratio(stiffness: f32, damping_ratio: f32) -> Self {
        let mass = 1.0;
        Self {
            stiffness,
            damping: 2.0 * damping_ratio * (stiffness * mass).sqrt(),
            mass,
        }
    }

    /// Damping ratio ζ = c / (2·√(k·m))
    pub fn damping_ratio(&self) -> f32 {
        let critical = 2.0 * (self.stiffness * self.mass).sqrt();
        if critical > 0.0 {
            self.damping / critical
        } else {
            0.0
        }
    }

    /// Fast, no overshoot
    pub fn stiff() -> Self {
        Self::from_damping_ratio(stiffness::HIGH, damping_ratio::NO_BOUNCY)
    }

    /// Slow with visible bounce
    pub fn wobbly() -> Self {
        Self::from_damping_ratio(stiffness::LOW, damping_ratio::MEDIUM_BOUNCY)
    }
}

impl Default for SpringConfig {
    /// Medium stiffness, low bounce
    fn default() -> Self {
        Self::from_damping_ratio(stiffness::MEDIUM, damping_ratio::LOW_BOUNCY)
    }
}

/// A single animated scalar
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// A spring resting at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget. Current value and velocity carry over unchanged.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Swap the parameters mid-flight; value, velocity and target carry over.
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }

    /// Jump to `value` and rest there
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Stop where the spring currently is, without moving to the target
    pub fn halt(&mut self) {
        self.snap_to(self.value);
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_DISPLACEMENT && self.velocity.abs() < REST_VELOCITY
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() {
            tracing::warn!(dt, "ignoring non-finite spring step");
            return;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }
        if dt <= 0.0 {
            return;
        }

        let steps = (dt / MAX_STEP).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            self.rk4(h);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (-stiffness * (x - self.target) - damping * v) / mass.max(f32::EPSILON)
    }

    fn rk4(&mut self, h: f32) {
        let (x, v) = (self.value, self.velocity);

        let k1x = v;
        let k1v = self.acceleration(x, v);

        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, k2x);

        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, k3x);

        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, k4x);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}
