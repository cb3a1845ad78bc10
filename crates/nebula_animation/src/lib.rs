//! Nebula Animation
//!
//! Self-contained animation primitives for the focus indicator.
//!
//! # Features
//!
//! - **Stepped Springs**: each spring advances only when handed a time step,
//!   split into fixed sub-steps so long frames stay stable
//! - **Retargetable**: changing a running spring's target keeps its position
//!   and velocity, so the motion never jumps
//! - **Size Tweens**: fixed-duration eased interpolation of width and height
//!
//! Nothing here owns a clock. Callers advance animations with explicit time
//! steps, which keeps every test deterministic.

pub mod easing;
pub mod spring;
pub mod tween;

pub use easing::Easing;
pub use spring::{Spring, SpringConfig};
pub use tween::{SizeStep, SizeTweener, Tween};
